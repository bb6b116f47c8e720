//! # collision2d
//!
//! 2D collision subsystem for entity-based games.
//!
//! ## Features
//!
//! - **Shapes**: circles, boxes, convex polygons and circular sectors
//! - **Narrow-phase**: boolean overlaps and minimum translation vectors for every shape pair
//! - **Broad-phase**: uniform grid spatial hash with layer filtering
//! - **Queries**: overlap, box cast and grid-marched line casts
//! - **Triggers**: per-entity enter/exit tracking with ordered listeners
//! - **Movement**: move-and-depenetrate helper
//!
//! ## Quick Start
//!
//! ```rust
//! use collision2d::prelude::*;
//!
//! let mut entities = EntityAllocator::new();
//! let mut world = PhysicsWorld::default();
//!
//! let wall = world.add_collider(Collider::rectangle_at(entities.create(), 10.0, -50.0, 10.0, 100.0));
//!
//! let player = entities.create();
//! world.set_entity_transform(player, Transform2D::from_position(Vec2::zeros()));
//! world.add_collider(Collider::circle(player, 4.0));
//!
//! let mut mover = Mover::new(player);
//! let mut listeners = TriggerListeners::new();
//! let (collision, applied) = mover.move_by(&mut world, &mut listeners, Vec2::new(9.0, 0.0));
//!
//! assert_eq!(collision.and_then(|c| c.collider), Some(wall));
//! assert!((applied.x - 6.0).abs() < 1e-4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod debug;
pub mod ecs;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        core::{Config, ConfigError, PhysicsConfig},
        ecs::{Entity, EntityAllocator},
        foundation::{
            collections::ColliderHandle,
            math::{Rect, Transform2D, Vec2},
        },
        physics::{
            Collider, CollisionLayers, CollisionResult, Mover, PhysicsError, PhysicsWorld,
            RaycastHit, Shape, TriggerListener, TriggerListeners,
        },
    };
}
