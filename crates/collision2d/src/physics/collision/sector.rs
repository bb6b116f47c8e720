//! Circular sector shape
//!
//! A sector is the slice of a circle between `start_angle` and
//! `start_angle + span`, swept counterclockwise (toward increasing angles)
//! around its apex. The apex sits at the shape position.

use crate::foundation::math::{constants, utils, Rect, Vec2};
use crate::physics::collision::shape::ShapeTransform;

/// Tolerance for angular comparisons, in radians
const ANGLE_EPSILON: f32 = 1e-5;

/// A circular sector ("pie slice")
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    /// Current radius, after scaling
    pub radius: f32,
    original_radius: f32,
    /// Current start angle in radians, after rotation
    pub start_angle: f32,
    original_start_angle: f32,
    /// Angular span in radians, within `(0, TAU]`
    pub span: f32,
    /// Offset from the entity origin after scale and rotation
    pub center: Vec2,
    /// World-space apex
    pub position: Vec2,
    /// Cached world-space bounds
    pub bounds: Rect,
}

impl Sector {
    /// Creates a sector with its apex at the origin
    pub fn new(radius: f32, start_angle: f32, span: f32) -> Self {
        let mut sector = Self {
            radius,
            original_radius: radius,
            start_angle,
            original_start_angle: start_angle,
            span: span.clamp(0.0, constants::TAU),
            center: Vec2::zeros(),
            position: Vec2::zeros(),
            bounds: Rect::default(),
        };
        sector.update_bounds();
        sector
    }

    /// Creates a sector with its apex at `position`
    pub fn at(position: Vec2, radius: f32, start_angle: f32, span: f32) -> Self {
        let mut sector = Self::new(radius, start_angle, span);
        sector.set_position(position);
        sector
    }

    /// Angle where the sweep ends
    pub fn end_angle(&self) -> f32 {
        self.start_angle + self.span
    }

    /// Whether the sector covers the whole circle
    pub fn is_full_circle(&self) -> bool {
        self.span >= constants::TAU - ANGLE_EPSILON
    }

    /// World-space end of the start edge
    pub fn start_point(&self) -> Vec2 {
        self.position + utils::angle_to_vector(self.start_angle) * self.radius
    }

    /// World-space end of the end edge
    pub fn end_point(&self) -> Vec2 {
        self.position + utils::angle_to_vector(self.end_angle()) * self.radius
    }

    /// Whether a direction angle lies within the sweep
    pub fn contains_angle(&self, angle: f32) -> bool {
        if self.is_full_circle() {
            return true;
        }

        let relative = utils::wrap_angle(angle - self.start_angle);
        relative <= self.span + ANGLE_EPSILON || relative >= constants::TAU - ANGLE_EPSILON
    }

    /// Closed containment test
    pub fn contains_point(&self, point: Vec2) -> bool {
        let offset = point - self.position;
        let distance_squared = offset.norm_squared();
        if distance_squared > self.radius * self.radius {
            return false;
        }

        distance_squared < constants::EPSILON || self.contains_angle(offset.y.atan2(offset.x))
    }

    /// Outward normals of the start and end edges
    pub fn edge_normals(&self) -> [Vec2; 2] {
        let (start_sin, start_cos) = self.start_angle.sin_cos();
        let (end_sin, end_cos) = self.end_angle().sin_cos();
        [
            Vec2::new(start_sin, -start_cos),
            Vec2::new(-end_sin, end_cos),
        ]
    }

    /// The two straight edges as `(apex, rim point, outward normal)`
    pub fn radial_segments(&self) -> [(Vec2, Vec2, Vec2); 2] {
        let [start_normal, end_normal] = self.edge_normals();
        [
            (self.position, self.start_point(), start_normal),
            (self.position, self.end_point(), end_normal),
        ]
    }

    /// Closest point on the sector outline to `point`, with the outward
    /// normal of the outline there
    pub fn closest_point_on_boundary(&self, point: Vec2) -> (Vec2, Vec2) {
        let mut best: Option<(Vec2, Vec2, f32)> = None;
        let mut consider = |candidate: Vec2, normal: Vec2| {
            let distance_squared = (point - candidate).norm_squared();
            if best.map_or(true, |(_, _, d)| distance_squared < d) {
                best = Some((candidate, normal, distance_squared));
            }
        };

        if !self.is_full_circle() {
            for (apex, rim, normal) in self.radial_segments() {
                consider(utils::closest_point_on_segment(apex, rim, point), normal);
            }
        }

        let offset = point - self.position;
        let distance = offset.norm();
        if distance > constants::EPSILON && self.contains_angle(offset.y.atan2(offset.x)) {
            let direction = offset / distance;
            consider(self.position + direction * self.radius, direction);
        }

        match best {
            Some((candidate, normal, _)) => (candidate, normal),
            None => (
                self.start_point(),
                utils::angle_to_vector(self.start_angle),
            ),
        }
    }

    /// World-space projection onto `axis` (unit length)
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let apex = self.position.dot(&axis);
        let mut min = apex;
        let mut max = apex;

        for rim in [self.start_point(), self.end_point()] {
            let d = rim.dot(&axis);
            min = min.min(d);
            max = max.max(d);
        }

        if self.contains_angle(axis.y.atan2(axis.x)) {
            max = max.max(apex + self.radius);
        }
        if self.contains_angle((-axis.y).atan2(-axis.x)) {
            min = min.min(apex - self.radius);
        }

        (min, max)
    }

    /// World-space point of the sector furthest along `direction`
    pub fn get_furthest_point(&self, direction: Vec2) -> Vec2 {
        let direction = utils::normalize_or(direction, utils::angle_to_vector(self.start_angle));
        if self.contains_angle(direction.y.atan2(direction.x)) {
            return self.position + direction * self.radius;
        }

        [self.start_point(), self.end_point()]
            .into_iter()
            .fold(self.position, |best, candidate| {
                if candidate.dot(&direction) > best.dot(&direction) {
                    candidate
                } else {
                    best
                }
            })
    }

    /// Fractions along `start -> end` where the segment crosses the arc
    pub fn arc_crossings(&self, start: Vec2, end: Vec2) -> [Option<f32>; 2] {
        let direction = end - start;
        let from_center = start - self.position;

        let a = direction.dot(&direction);
        if a < constants::EPSILON {
            return [None, None];
        }
        let b = 2.0 * from_center.dot(&direction);
        let c = from_center.dot(&from_center) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return [None, None];
        }

        let root = discriminant.sqrt();
        [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)].map(|t| {
            let on_segment = (0.0..=1.0).contains(&t);
            let offset = start + direction * t - self.position;
            (on_segment && self.contains_angle(offset.y.atan2(offset.x))).then_some(t)
        })
    }

    /// Whether the arcs of two sectors cross
    pub fn arc_intersects_arc(&self, other: &Sector) -> bool {
        let between = other.position - self.position;
        let distance = between.norm();

        if distance < constants::EPSILON {
            return (self.radius - other.radius).abs() < constants::EPSILON
                && (self.contains_angle(other.start_angle) || other.contains_angle(self.start_angle));
        }
        if distance > self.radius + other.radius || distance < (self.radius - other.radius).abs() {
            return false;
        }

        let along = (self.radius * self.radius - other.radius * other.radius + distance * distance)
            / (2.0 * distance);
        let height = (self.radius * self.radius - along * along).max(0.0).sqrt();
        let midpoint = self.position + between * (along / distance);
        let perpendicular = Vec2::new(-between.y, between.x) / distance;

        [midpoint + perpendicular * height, midpoint - perpendicular * height]
            .into_iter()
            .any(|p| {
                let from_self = p - self.position;
                let from_other = p - other.position;
                self.contains_angle(from_self.y.atan2(from_self.x))
                    && other.contains_angle(from_other.y.atan2(from_other.x))
            })
    }

    /// Move the apex, keeping bounds in sync
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_bounds();
    }

    /// Recompute apex, radius, start angle and bounds from the owning transform
    pub fn recalculate_bounds(&mut self, transform: &ShapeTransform) {
        self.center = transform.world_offset();
        if transform.scale_and_rotate {
            self.radius = self.original_radius * transform.transform.max_scale();
            self.start_angle = self.original_start_angle + transform.transform.rotation;
        } else {
            self.radius = self.original_radius;
            self.start_angle = self.original_start_angle;
        }

        self.position = transform.transform.position + self.center;
        self.update_bounds();
    }

    fn update_bounds(&mut self) {
        let mut points = vec![self.position, self.start_point(), self.end_point()];
        for quadrant in 0..4 {
            let angle = quadrant as f32 * constants::HALF_PI;
            if self.contains_angle(angle) {
                points.push(self.position + utils::angle_to_vector(angle) * self.radius);
            }
        }

        self.bounds = Rect::encompassing_points(&points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform2D;
    use approx::assert_relative_eq;

    /// Quarter circle covering the +x/+y quadrant
    fn quarter() -> Sector {
        Sector::new(10.0, 0.0, constants::HALF_PI)
    }

    #[test]
    fn test_contains_point() {
        let sector = quarter();

        assert!(sector.contains_point(Vec2::new(5.0, 5.0)));
        assert!(sector.contains_point(Vec2::zeros()));
        assert!(sector.contains_point(Vec2::new(10.0, 0.0)));
        assert!(!sector.contains_point(Vec2::new(-1.0, 1.0)));
        assert!(!sector.contains_point(Vec2::new(8.0, 8.0)));
    }

    #[test]
    fn test_angle_wraps_across_zero() {
        let sector = Sector::new(10.0, -constants::HALF_PI * 0.5, constants::HALF_PI);

        assert!(sector.contains_point(Vec2::new(5.0, -2.0)));
        assert!(sector.contains_point(Vec2::new(5.0, 2.0)));
        assert!(!sector.contains_point(Vec2::new(-5.0, 0.0)));
    }

    #[test]
    fn test_bounds_cover_arc_extremes() {
        let sector = quarter();

        assert_relative_eq!(sector.bounds.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(sector.bounds.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(sector.bounds.width, 10.0, epsilon = 1e-5);
        assert_relative_eq!(sector.bounds.height, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_edge_normals_face_away_from_sweep() {
        let [start_normal, end_normal] = quarter().edge_normals();

        assert_relative_eq!(start_normal, Vec2::new(0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(end_normal, Vec2::new(-1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_closest_point_on_boundary() {
        let sector = quarter();

        let (point, normal) = sector.closest_point_on_boundary(Vec2::new(5.0, 1.0));
        assert_relative_eq!(point, Vec2::new(5.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(normal, Vec2::new(0.0, -1.0), epsilon = 1e-5);

        let (point, normal) = sector.closest_point_on_boundary(Vec2::new(12.0, 12.0));
        let diagonal = Vec2::new(1.0, 1.0).normalize();
        assert_relative_eq!(point, diagonal * 10.0, epsilon = 1e-4);
        assert_relative_eq!(normal, diagonal, epsilon = 1e-5);
    }

    #[test]
    fn test_projection_uses_arc_extremes() {
        let sector = quarter();

        let (min, max) = sector.project(Vec2::new(1.0, 0.0));
        assert_relative_eq!(min, 0.0, epsilon = 1e-5);
        assert_relative_eq!(max, 10.0, epsilon = 1e-5);

        let diagonal = Vec2::new(1.0, 1.0).normalize();
        let (_, max) = sector.project(diagonal);
        assert_relative_eq!(max, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_moves_start_angle() {
        let mut sector = quarter();
        let transform = ShapeTransform::new(
            Transform2D::from_position(Vec2::new(3.0, 4.0)).with_rotation(constants::PI),
            Vec2::zeros(),
            true,
        );
        sector.recalculate_bounds(&transform);

        assert_relative_eq!(sector.start_angle, constants::PI);
        assert!(sector.contains_point(Vec2::new(-2.0, 2.0)));
        assert!(!sector.contains_point(Vec2::new(8.0, 8.0)));
    }

    #[test]
    fn test_arc_crossings() {
        let sector = quarter();
        let [first, second] = sector.arc_crossings(Vec2::new(0.0, 5.0), Vec2::new(20.0, 5.0));

        let t = first.or(second).unwrap();
        let x = 20.0 * t;
        assert_relative_eq!(x, 75.0_f32.sqrt(), epsilon = 1e-4);
    }
}
