//! Circle shape

use crate::foundation::math::{utils, Rect, Vec2};
use crate::physics::collision::shape::ShapeTransform;

/// A circle centered on its world position
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Current radius, after scaling
    pub radius: f32,
    original_radius: f32,
    /// Offset from the entity origin after scale and rotation
    pub center: Vec2,
    /// World-space center
    pub position: Vec2,
    /// Cached world-space bounds
    pub bounds: Rect,
}

impl Circle {
    /// Creates a circle of `radius` at the origin
    pub fn new(radius: f32) -> Self {
        let mut circle = Self {
            radius,
            original_radius: radius,
            center: Vec2::zeros(),
            position: Vec2::zeros(),
            bounds: Rect::default(),
        };
        circle.update_bounds();
        circle
    }

    /// Creates a circle of `radius` centered on `position`
    pub fn at(position: Vec2, radius: f32) -> Self {
        let mut circle = Self::new(radius);
        circle.set_position(position);
        circle
    }

    /// Radius before any transform scale
    pub fn original_radius(&self) -> f32 {
        self.original_radius
    }

    /// Change the unscaled radius
    pub fn set_radius(&mut self, radius: f32) {
        self.original_radius = radius;
        self.radius = radius;
        self.update_bounds();
    }

    /// Move the circle, keeping bounds in sync
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_bounds();
    }

    /// Recompute position, radius and bounds from the owning transform
    pub fn recalculate_bounds(&mut self, transform: &ShapeTransform) {
        self.center = transform.world_offset();
        self.radius = if transform.scale_and_rotate {
            self.original_radius * transform.transform.max_scale()
        } else {
            self.original_radius
        };
        self.position = transform.transform.position + self.center;
        self.update_bounds();
    }

    fn update_bounds(&mut self) {
        self.bounds = Rect::from_center_size(
            self.position,
            Vec2::new(self.radius * 2.0, self.radius * 2.0),
        );
    }

    /// Closed containment test
    pub fn contains_point(&self, point: Vec2) -> bool {
        (point - self.position).norm_squared() <= self.radius * self.radius
    }

    /// Projection of the circle onto `axis` (unit length)
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let center = self.position.dot(&axis);
        (center - self.radius, center + self.radius)
    }

    /// Point on the circle furthest along `direction`
    pub fn get_furthest_point(&self, direction: Vec2) -> Vec2 {
        self.position + utils::normalize_or(direction, Vec2::new(1.0, 0.0)) * self.radius
    }
}
