//! Physics module for 2D collision detection
//!
//! Provides the collider shapes and their narrow-phase tests, the
//! [`PhysicsWorld`] that owns colliders and answers spatial queries, and
//! the trigger and movement helpers built on top of it.

pub mod collider;
pub mod collision;
pub mod collision_layers;
pub mod error;
pub mod mover;
pub mod physics_world;
pub mod trigger_helper;

#[cfg(test)]
mod tests;

pub use collider::{Collider, DirtyFlags};
pub use collision::{
    BoxShape,
    Circle,
    CollisionResult,
    Polygon,
    Ray2D,
    RaycastHit,
    Sector,
    Shape,
    ShapeTransform,
};
pub use collision_layers::CollisionLayers;
pub use error::PhysicsError;
pub use mover::Mover;
pub use physics_world::PhysicsWorld;
pub use trigger_helper::{
    ColliderTriggerHelper,
    Pair,
    TriggerEvent,
    TriggerEventKind,
    TriggerListener,
    TriggerListeners,
    LATE_SORT_ORDER,
};
