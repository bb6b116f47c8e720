//! Physics error types

use crate::config::ConfigError;
use crate::foundation::collections::ColliderHandle;

/// Errors surfaced by [`crate::physics::PhysicsWorld`]
#[derive(thiserror::Error, Debug)]
pub enum PhysicsError {
    /// The handle does not refer to a live collider
    #[error("Invalid collider handle: {0:?}")]
    InvalidCollider(ColliderHandle),

    /// The world configuration was rejected
    #[error("Physics configuration error: {0}")]
    Config(#[from] ConfigError),
}
