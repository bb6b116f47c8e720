//! Entity handles consumed by the collision layer.
//!
//! Entity lifecycle and the scene graph live outside this crate; colliders
//! only need a stable, generation-checked handle to the entity that owns them.

pub mod entity;

pub use entity::{Entity, EntityAllocator};
