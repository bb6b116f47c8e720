//! Specialized collection types

pub use slotmap::{SlotMap, SecondaryMap};

slotmap::new_key_type! {
    /// Generational handle to a collider stored in a [`crate::physics::PhysicsWorld`].
    ///
    /// Handles stay valid until the collider is removed; a removed handle is
    /// detected at lookup time instead of dangling.
    pub struct ColliderHandle;
}

/// Arena owning every collider of a world
pub type ColliderArena<T> = SlotMap<ColliderHandle, T>;
