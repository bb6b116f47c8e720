//! Primitive collision values
//!
//! Rays and the transient result values produced by narrow-phase tests and
//! line casts. None of these are persisted between calls.

use crate::foundation::collections::ColliderHandle;
use crate::foundation::math::Vec2;

/// A line segment used for line casts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray2D {
    /// Start of the segment
    pub start: Vec2,
    /// End of the segment
    pub end: Vec2,
    /// `end - start`, deliberately not normalized so fractions stay in `[0, 1]`
    pub direction: Vec2,
}

impl Ray2D {
    /// Creates a segment from `start` to `end`
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            direction: end - start,
        }
    }

    /// Point at `fraction` along the segment
    pub fn point_at(&self, fraction: f32) -> Vec2 {
        self.start + self.direction * fraction
    }

    /// Segment length
    pub fn length(&self) -> f32 {
        self.direction.norm()
    }
}

/// Result of a narrow-phase test between two shapes.
///
/// For `first.collides_with_shape(second)` the `normal` points from `second`
/// toward `first` and `min_translation = -normal * depth`. Subtracting the
/// translation from `first` (or adding it to `second`) separates the shapes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResult {
    /// Collider that was hit, filled in by collider-level queries
    pub collider: Option<ColliderHandle>,
    /// Contact normal
    pub normal: Vec2,
    /// Minimum translation vector
    pub min_translation: Vec2,
    /// Approximate contact point in world space
    pub point: Vec2,
}

impl CollisionResult {
    /// Creates a result with no collider attached
    pub fn new(normal: Vec2, min_translation: Vec2, point: Vec2) -> Self {
        Self {
            collider: None,
            normal,
            min_translation,
            point,
        }
    }

    /// Attach the collider that was hit
    pub fn with_collider(mut self, collider: ColliderHandle) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Penetration depth along the normal
    pub fn depth(&self) -> f32 {
        self.min_translation.norm()
    }

    /// Same contact seen from the other shape
    pub fn inverted(mut self) -> Self {
        self.normal = -self.normal;
        self.min_translation = -self.min_translation;
        self
    }

    /// Rewrites the translation so a mover standing on a slope is pushed
    /// straight up instead of sliding sideways.
    ///
    /// Only applies when the horizontal movement does not already push into
    /// the surface and the surface is not a vertical wall.
    pub fn remove_horizontal_translation(&mut self, delta_movement: Vec2) {
        let moving_against_normal = sign(self.normal.x) != sign(delta_movement.x);
        if moving_against_normal || (delta_movement.x == 0.0 && self.normal.x != 0.0) {
            if self.normal.y == 0.0 {
                return;
            }

            let response_distance = self.min_translation.norm();
            let fix = response_distance / self.normal.y;

            if self.normal.x.abs() != 1.0 && fix.abs() < (delta_movement.y * 3.0).abs() {
                self.min_translation = Vec2::new(0.0, -fix);
            }
        }
    }
}

/// Sign that maps zero to zero
fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Result of a line cast against a collider
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RaycastHit {
    /// Collider that was hit, filled in by the spatial hash
    pub collider: Option<ColliderHandle>,
    /// Fraction along the ray where the hit occurred, in `[0, 1]`
    pub fraction: f32,
    /// World distance from the ray start to the hit point
    pub distance: f32,
    /// Hit point in world space
    pub point: Vec2,
    /// Surface normal at the hit point
    pub normal: Vec2,
    /// Point the ray started from
    pub centroid: Vec2,
}

impl RaycastHit {
    /// Creates a hit with no collider attached
    pub fn new(fraction: f32, distance: f32, point: Vec2, normal: Vec2) -> Self {
        Self {
            collider: None,
            fraction,
            distance,
            point,
            normal,
            centroid: Vec2::zeros(),
        }
    }

    /// Attach the collider that was hit
    pub fn with_collider(mut self, collider: ColliderHandle) -> Self {
        self.collider = Some(collider);
        self
    }
}
