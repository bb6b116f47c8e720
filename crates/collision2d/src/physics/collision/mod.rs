//! Collision shapes and narrow-phase tests

pub mod box_shape;
pub mod circle;
pub mod polygon;
pub mod primitives;
pub mod sector;
pub mod shape;
pub mod shape_collisions;

pub use box_shape::BoxShape;
pub use circle::Circle;
pub use polygon::Polygon;
pub use primitives::{CollisionResult, RaycastHit, Ray2D};
pub use sector::Sector;
pub use shape::{Shape, ShapeTransform};
