//! Spatial partitioning data structures
//!
//! Provides the uniform grid broad-phase used for overlap queries,
//! box casts and line casts in 2D space.

pub mod raycast_parser;
pub mod spatial_hash;

pub use raycast_parser::{RaycastPolicy, RaycastResultParser};
pub use spatial_hash::{CellCoord, CellRange, SpatialHash};
