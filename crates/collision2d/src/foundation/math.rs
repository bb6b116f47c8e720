//! Math utilities and types
//!
//! Provides the 2D vector, rectangle and transform types the collision
//! subsystem is written against.

pub use nalgebra::{Rotation2, Vector2, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// RGBA color / 4D vector type
pub type Vec4 = Vector4<f32>;

/// Axis-aligned rectangle described by its minimum corner and size.
///
/// `top` is the minimum y and `bottom` the maximum y, matching a y-down
/// screen convention, but nothing in the math depends on the orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Minimum x
    pub x: f32,
    /// Minimum y
    pub y: f32,
    /// Extent along x
    pub width: f32,
    /// Extent along y
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its minimum corner and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle spanning two corners
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Create a rectangle centered on `center` with the given size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x * 0.5, center.y - size.y * 0.5, size.x, size.y)
    }

    /// Smallest rectangle containing every point
    pub fn encompassing_points(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        let (min, max) = points.iter().skip(1).fold((*first, *first), |(min, max), p| {
            (
                Vec2::new(min.x.min(p.x), min.y.min(p.y)),
                Vec2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Self::from_min_max(min, max)
    }

    /// Left edge (minimum x)
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge (maximum x)
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge (minimum y)
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge (maximum y)
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Minimum corner
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maximum corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Size as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Closed containment test (edges count as inside)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    /// Smallest rectangle containing both rectangles
    pub fn union(&self, other: &Rect) -> Rect {
        let min = Vec2::new(self.x.min(other.x), self.y.min(other.y));
        let max = Vec2::new(self.right().max(other.right()), self.bottom().max(other.bottom()));
        Rect::from_min_max(min, max)
    }

    /// Copy of this rectangle moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Bounds covering this rectangle before and after moving by `delta`
    pub fn swept(&self, delta: Vec2) -> Rect {
        Rect::new(
            if delta.x > 0.0 { self.x } else { self.x + delta.x },
            if delta.y > 0.0 { self.y } else { self.y + delta.y },
            self.width + delta.x.abs(),
            self.height + delta.y.abs(),
        )
    }

    /// Closest point on the rectangle border to `point`, plus the outward
    /// normal of the edge it lies on.
    ///
    /// Points strictly inside are pushed to the nearest edge.
    pub fn closest_point_on_border(&self, point: Vec2) -> (Vec2, Vec2) {
        let mut result = Vec2::new(
            point.x.clamp(self.left(), self.right()),
            point.y.clamp(self.top(), self.bottom()),
        );
        let mut normal = Vec2::zeros();

        let strictly_inside = result.x > self.left()
            && result.x < self.right()
            && result.y > self.top()
            && result.y < self.bottom();

        if strictly_inside {
            let dist_left = result.x - self.left();
            let dist_right = self.right() - result.x;
            let dist_top = result.y - self.top();
            let dist_bottom = self.bottom() - result.y;
            let min = dist_left.min(dist_right).min(dist_top).min(dist_bottom);

            if min == dist_top {
                result.y = self.top();
                normal.y = -1.0;
            } else if min == dist_bottom {
                result.y = self.bottom();
                normal.y = 1.0;
            } else if min == dist_left {
                result.x = self.left();
                normal.x = -1.0;
            } else {
                result.x = self.right();
                normal.x = 1.0;
            }
        } else {
            if result.x == self.left() {
                normal.x = -1.0;
            } else if result.x == self.right() {
                normal.x = 1.0;
            }
            if result.y == self.top() {
                normal.y = -1.0;
            } else if result.y == self.bottom() {
                normal.y = 1.0;
            }
            normal = utils::normalize_or(normal, Vec2::new(0.0, -1.0));
        }

        (result, normal)
    }

    /// Point on the rectangle border closest to the origin.
    ///
    /// Used on Minkowski difference rectangles, where that point is the
    /// minimum translation vector.
    pub fn closest_point_on_bounds_to_origin(&self) -> Vec2 {
        let max = self.max();
        let mut min_dist = self.x.abs();
        let mut bounds_point = Vec2::new(self.x, 0.0);

        if max.x.abs() < min_dist {
            min_dist = max.x.abs();
            bounds_point = Vec2::new(max.x, 0.0);
        }

        if max.y.abs() < min_dist {
            min_dist = max.y.abs();
            bounds_point = Vec2::new(0.0, max.y);
        }

        if self.y.abs() < min_dist {
            bounds_point = Vec2::new(0.0, self.y);
        }

        bounds_point
    }

    /// Slab test of a ray against this rectangle.
    ///
    /// `direction` is not normalized: the returned value is the entry
    /// fraction along it (0 when the ray starts inside).
    pub fn ray_intersects(&self, start: Vec2, direction: Vec2) -> Option<f32> {
        let mut distance = 0.0_f32;
        let mut max_value = f32::MAX;

        for axis in 0..2 {
            let (origin, dir, min, max) = if axis == 0 {
                (start.x, direction.x, self.left(), self.right())
            } else {
                (start.y, direction.y, self.top(), self.bottom())
            };

            if dir.abs() < constants::EPSILON {
                if origin < min || origin > max {
                    return None;
                }
            } else {
                let inverse = 1.0 / dir;
                let mut near = (min - origin) * inverse;
                let mut far = (max - origin) * inverse;
                if near > far {
                    std::mem::swap(&mut near, &mut far);
                }

                distance = distance.max(near);
                max_value = max_value.min(far);
                if distance > max_value {
                    return None;
                }
            }
        }

        Some(distance)
    }
}

/// Entity transform as seen by the collision layer: position, rotation in
/// radians and per-axis scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// World position
    pub position: Vec2,

    /// Rotation in radians
    pub rotation: f32,

    /// Scale factors
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set rotation (radians)
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set scale
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Largest of the two scale factors
    pub fn max_scale(&self) -> f32 {
        self.scale.x.max(self.scale.y)
    }

    /// Scale then rotate a local offset into world orientation (no translation)
    pub fn transform_offset(&self, offset: Vec2) -> Vec2 {
        Rotation2::new(self.rotation) * offset.component_mul(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Tolerance used for degenerate-geometry checks
    pub const EPSILON: f32 = 1e-6;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec2};

    /// Move `start` toward `end` by at most `shift`, never overshooting
    pub fn approach(start: i32, end: i32, shift: i32) -> i32 {
        if start < end {
            (start + shift).min(end)
        } else {
            (start - shift).max(end)
        }
    }

    /// Wrap an angle into `[0, TAU)`
    pub fn wrap_angle(angle: f32) -> f32 {
        let wrapped = angle.rem_euclid(constants::TAU);
        if wrapped >= constants::TAU {
            0.0
        } else {
            wrapped
        }
    }

    /// Unit vector for an angle in radians
    pub fn angle_to_vector(angle: f32) -> Vec2 {
        Vec2::new(angle.cos(), angle.sin())
    }

    /// Normalize `v`, or return `fallback` when `v` is too short to have a direction
    pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
        v.try_normalize(constants::EPSILON).unwrap_or(fallback)
    }

    /// Perpendicular of the segment `first -> second` (rotated +90 degrees)
    pub fn perpendicular(first: Vec2, second: Vec2) -> Vec2 {
        Vec2::new(-(second.y - first.y), second.x - first.x)
    }

    /// 2D cross product (z component of the 3D cross product)
    pub fn cross(a: Vec2, b: Vec2) -> f32 {
        a.x * b.y - a.y * b.x
    }

    /// Closest point to `point` on the segment `a -> b`
    pub fn closest_point_on_segment(a: Vec2, b: Vec2, point: Vec2) -> Vec2 {
        let v = b - a;
        let length_squared = v.norm_squared();
        if length_squared < constants::EPSILON {
            return a;
        }

        let t = ((point - a).dot(&v) / length_squared).clamp(0.0, 1.0);
        a + v * t
    }
}
