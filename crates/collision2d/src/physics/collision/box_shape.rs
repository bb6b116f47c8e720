//! Box shape
//!
//! A box is a four-point polygon that caches only its two unique edge
//! normals. While unrotated its bounds are the box itself, which lets the
//! narrow phase use rectangle math instead of separating axes.

use crate::foundation::math::{Rect, Vec2};
use crate::physics::collision::polygon::Polygon;
use crate::physics::collision::shape::ShapeTransform;

/// An oriented box
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    /// Unscaled width
    pub width: f32,
    /// Unscaled height
    pub height: f32,
    /// Polygon holding the current corner points
    pub polygon: Polygon,
}

impl BoxShape {
    /// Creates a box centered on the origin
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            polygon: Polygon::build(Self::build_box(width, height), true),
        }
    }

    /// Creates an unrotated box covering `rect`
    pub fn from_rect(rect: &Rect) -> Self {
        let mut shape = Self::new(rect.width, rect.height);
        shape.set_position(rect.center());
        shape
    }

    /// Corner points of a `width` by `height` box centered on the origin
    pub fn build_box(width: f32, height: f32) -> Vec<Vec2> {
        let half_width = width * 0.5;
        let half_height = height * 0.5;

        vec![
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, -half_height),
            Vec2::new(half_width, half_height),
            Vec2::new(-half_width, half_height),
        ]
    }

    /// Resize the box, keeping its position
    pub fn update_box(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.polygon.set_points(Self::build_box(width, height));
    }

    /// World-space center
    pub fn position(&self) -> Vec2 {
        self.polygon.position
    }

    /// Cached world-space bounds
    pub fn bounds(&self) -> Rect {
        self.polygon.bounds
    }

    /// Whether the box is axis aligned
    pub fn is_unrotated(&self) -> bool {
        self.polygon.is_unrotated()
    }

    /// Move the box, keeping bounds in sync
    pub fn set_position(&mut self, position: Vec2) {
        self.polygon.set_position(position);
    }

    /// Recompute corners and bounds from the owning transform
    pub fn recalculate_bounds(&mut self, transform: &ShapeTransform) {
        self.polygon.recalculate_bounds(transform);
    }

    /// Containment test; unrotated boxes use their bounds
    pub fn contains_point(&self, point: Vec2) -> bool {
        if self.is_unrotated() {
            self.bounds().contains_point(point)
        } else {
            self.polygon.contains_point(point)
        }
    }
}
