//! Collision shape definitions
//!
//! [`Shape`] is a closed set of variants. Every pairwise routine is reached
//! through an exhaustive `match` on both operands, so adding a variant fails
//! to compile until every combination has a narrow-phase answer.

use crate::foundation::math::{Rect, Transform2D, Vec2};
use crate::physics::collision::box_shape::BoxShape;
use crate::physics::collision::circle::Circle;
use crate::physics::collision::polygon::Polygon;
use crate::physics::collision::primitives::{CollisionResult, RaycastHit};
use crate::physics::collision::sector::Sector;
use crate::physics::collision::shape_collisions as collisions;

/// Everything a shape needs from its owning collider to place itself in
/// the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeTransform {
    /// Entity transform
    pub transform: Transform2D,
    /// Collider offset from the entity origin
    pub local_offset: Vec2,
    /// Whether the shape follows the entity's scale and rotation
    pub scale_and_rotate: bool,
}

impl ShapeTransform {
    /// Bundle an entity transform with a collider offset
    pub fn new(transform: Transform2D, local_offset: Vec2, scale_and_rotate: bool) -> Self {
        Self {
            transform,
            local_offset,
            scale_and_rotate,
        }
    }

    /// Collider offset after scale and rotation, relative to the entity origin
    pub fn world_offset(&self) -> Vec2 {
        if self.scale_and_rotate {
            self.transform.transform_offset(self.local_offset)
        } else {
            self.local_offset
        }
    }
}

/// Collision shape
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Circle around its position
    Circle(Circle),
    /// Box, axis aligned until rotated
    Box(BoxShape),
    /// Convex polygon
    Polygon(Polygon),
    /// Circular sector with its apex at its position
    Sector(Sector),
}

impl Shape {
    /// World position of the shape (center, or apex for sectors)
    pub fn position(&self) -> Vec2 {
        match self {
            Shape::Circle(circle) => circle.position,
            Shape::Box(shape) => shape.position(),
            Shape::Polygon(polygon) => polygon.position,
            Shape::Sector(sector) => sector.position,
        }
    }

    /// Offset from the entity origin after scale and rotation
    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Circle(circle) => circle.center,
            Shape::Box(shape) => shape.polygon.center,
            Shape::Polygon(polygon) => polygon.center,
            Shape::Sector(sector) => sector.center,
        }
    }

    /// Cached world-space bounds
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Circle(circle) => circle.bounds,
            Shape::Box(shape) => shape.bounds(),
            Shape::Polygon(polygon) => polygon.bounds,
            Shape::Sector(sector) => sector.bounds,
        }
    }

    /// Move the shape to a world position
    pub fn set_position(&mut self, position: Vec2) {
        match self {
            Shape::Circle(circle) => circle.set_position(position),
            Shape::Box(shape) => shape.set_position(position),
            Shape::Polygon(polygon) => polygon.set_position(position),
            Shape::Sector(sector) => sector.set_position(position),
        }
    }

    /// Copy of the shape moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Shape {
        let mut moved = self.clone();
        moved.set_position(self.position() + delta);
        moved
    }

    /// Recompute world placement and bounds from the owning transform
    pub fn recalculate_bounds(&mut self, transform: &ShapeTransform) {
        match self {
            Shape::Circle(circle) => circle.recalculate_bounds(transform),
            Shape::Box(shape) => shape.recalculate_bounds(transform),
            Shape::Polygon(polygon) => polygon.recalculate_bounds(transform),
            Shape::Sector(sector) => sector.recalculate_bounds(transform),
        }
    }

    /// Boolean overlap test; agrees with [`Self::collides_with_shape`]
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Circle(first), Shape::Circle(second)) => {
                collisions::circle_overlaps_circle(first, second)
            }
            (Shape::Circle(circle), Shape::Box(shape)) | (Shape::Box(shape), Shape::Circle(circle)) => {
                if shape.is_unrotated() {
                    collisions::rect_to_circle(&shape.bounds(), circle.position, circle.radius)
                } else {
                    collisions::circle_to_polygon(circle, &shape.polygon).is_some()
                }
            }
            (Shape::Circle(circle), Shape::Polygon(polygon))
            | (Shape::Polygon(polygon), Shape::Circle(circle)) => {
                collisions::circle_to_polygon(circle, polygon).is_some()
            }
            (Shape::Box(first), Shape::Box(second)) => {
                if first.is_unrotated() && second.is_unrotated() {
                    first.bounds().intersects(&second.bounds())
                } else {
                    collisions::polygon_to_polygon(&first.polygon, &second.polygon).is_some()
                }
            }
            (Shape::Box(shape), Shape::Polygon(polygon))
            | (Shape::Polygon(polygon), Shape::Box(shape)) => {
                collisions::polygon_to_polygon(&shape.polygon, polygon).is_some()
            }
            (Shape::Polygon(first), Shape::Polygon(second)) => {
                collisions::polygon_to_polygon(first, second).is_some()
            }
            (Shape::Sector(sector), Shape::Circle(circle))
            | (Shape::Circle(circle), Shape::Sector(sector)) => {
                collisions::sector_to_circle(sector, circle).is_some()
            }
            (Shape::Sector(sector), Shape::Box(shape))
            | (Shape::Box(shape), Shape::Sector(sector)) => {
                collisions::sector_to_polygon(sector, &shape.polygon).is_some()
            }
            (Shape::Sector(sector), Shape::Polygon(polygon))
            | (Shape::Polygon(polygon), Shape::Sector(sector)) => {
                collisions::sector_to_polygon(sector, polygon).is_some()
            }
            (Shape::Sector(first), Shape::Sector(second)) => {
                collisions::sector_to_sector(first, second).is_some()
            }
        }
    }

    /// Narrow-phase test producing a contact.
    ///
    /// The result normal points from `other` toward `self`; subtracting the
    /// translation from `self` separates the shapes.
    pub fn collides_with_shape(&self, other: &Shape) -> Option<CollisionResult> {
        match (self, other) {
            (Shape::Circle(first), Shape::Circle(second)) => {
                collisions::circle_to_circle(first, second)
            }
            (Shape::Circle(circle), Shape::Box(shape)) => collisions::circle_to_box(circle, shape),
            (Shape::Circle(circle), Shape::Polygon(polygon)) => {
                collisions::circle_to_polygon(circle, polygon)
            }
            (Shape::Circle(circle), Shape::Sector(sector)) => {
                collisions::sector_to_circle(sector, circle).map(CollisionResult::inverted)
            }
            (Shape::Box(shape), Shape::Circle(circle)) => {
                collisions::circle_to_box(circle, shape).map(CollisionResult::inverted)
            }
            (Shape::Box(first), Shape::Box(second)) => collisions::box_to_box(first, second),
            (Shape::Box(shape), Shape::Polygon(polygon)) => {
                collisions::polygon_to_polygon(&shape.polygon, polygon)
            }
            (Shape::Box(shape), Shape::Sector(sector)) => {
                collisions::sector_to_polygon(sector, &shape.polygon).map(CollisionResult::inverted)
            }
            (Shape::Polygon(polygon), Shape::Circle(circle)) => {
                collisions::circle_to_polygon(circle, polygon).map(CollisionResult::inverted)
            }
            (Shape::Polygon(polygon), Shape::Box(shape)) => {
                collisions::polygon_to_polygon(polygon, &shape.polygon)
            }
            (Shape::Polygon(first), Shape::Polygon(second)) => {
                collisions::polygon_to_polygon(first, second)
            }
            (Shape::Polygon(polygon), Shape::Sector(sector)) => {
                collisions::sector_to_polygon(sector, polygon).map(CollisionResult::inverted)
            }
            (Shape::Sector(sector), Shape::Circle(circle)) => {
                collisions::sector_to_circle(sector, circle)
            }
            (Shape::Sector(sector), Shape::Box(shape)) => {
                collisions::sector_to_polygon(sector, &shape.polygon)
            }
            (Shape::Sector(sector), Shape::Polygon(polygon)) => {
                collisions::sector_to_polygon(sector, polygon)
            }
            (Shape::Sector(first), Shape::Sector(second)) => {
                collisions::sector_to_sector(first, second)
            }
        }
    }

    /// Segment test from `start` to `end`
    pub fn collides_with_line(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        match self {
            Shape::Circle(circle) => collisions::line_to_circle(start, end, circle),
            Shape::Box(shape) => collisions::line_to_polygon(start, end, &shape.polygon),
            Shape::Polygon(polygon) => collisions::line_to_polygon(start, end, polygon),
            Shape::Sector(sector) => collisions::line_to_sector(start, end, sector),
        }
    }

    /// Whether `point` lies inside the shape
    pub fn contains_point(&self, point: Vec2) -> bool {
        match self {
            Shape::Circle(circle) => circle.contains_point(point),
            Shape::Box(shape) => shape.contains_point(point),
            Shape::Polygon(polygon) => polygon.contains_point(point),
            Shape::Sector(sector) => sector.contains_point(point),
        }
    }

    /// Treats `point` as a shape of its own and tests it against this one.
    ///
    /// Subtracting the translation from the point moves it out of the shape.
    pub fn point_collides_with_shape(&self, point: Vec2) -> Option<CollisionResult> {
        match self {
            Shape::Circle(circle) => collisions::point_to_circle(point, circle),
            Shape::Box(shape) => collisions::point_to_box(point, shape),
            Shape::Polygon(polygon) => collisions::point_to_polygon(point, polygon),
            Shape::Sector(sector) => collisions::point_to_sector(point, sector),
        }
    }

    /// World-space support point along `direction`
    pub fn get_furthest_point(&self, direction: Vec2) -> Vec2 {
        match self {
            Shape::Circle(circle) => circle.get_furthest_point(direction),
            Shape::Box(shape) => shape.polygon.get_furthest_point(direction),
            Shape::Polygon(polygon) => polygon.get_furthest_point(direction),
            Shape::Sector(sector) => sector.get_furthest_point(direction),
        }
    }

    /// World-space projection onto a unit `axis`
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        match self {
            Shape::Circle(circle) => circle.project(axis),
            Shape::Box(shape) => shape.polygon.project(axis),
            Shape::Polygon(polygon) => polygon.project(axis),
            Shape::Sector(sector) => sector.project(axis),
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<BoxShape> for Shape {
    fn from(shape: BoxShape) -> Self {
        Shape::Box(shape)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}

impl From<Sector> for Shape {
    fn from(sector: Sector) -> Self {
        Shape::Sector(sector)
    }
}
