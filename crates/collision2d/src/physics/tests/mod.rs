//! Cross-cutting physics tests
//!
//! Property checks over many shape placements and end-to-end scenarios
//! through [`crate::physics::PhysicsWorld`].

mod properties;
mod scenarios;
