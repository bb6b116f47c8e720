//! Debug module for visualization and debugging tools
//!
//! Produces renderer-agnostic 2D primitives for colliders, bounds, grid
//! cells and query results.

pub mod draw;
pub mod collision_debug;

pub use draw::{DebugShape, DebugDrawSystem, DebugShapeId};
pub use collision_debug::{CollisionDebugColors, CollisionDebugVisualizer};
