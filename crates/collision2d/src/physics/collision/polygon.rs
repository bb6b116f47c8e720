//! Convex polygon shape
//!
//! Points are stored relative to the shape position. Edge normals are kept
//! oriented away from the polygon centroid so every routine that reads them
//! can treat them as outward facing. Concave point lists are accepted but the
//! separating axis routines only give exact answers for convex polygons.

use crate::foundation::math::{constants, utils, Rect, Rotation2, Vec2};
use crate::physics::collision::shape::ShapeTransform;

/// A convex polygon
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
    original_points: Vec<Vec2>,
    polygon_center: Vec2,
    edge_normals: Vec<Vec2>,
    is_box: bool,
    is_unrotated: bool,
    /// Offset from the entity origin after scale and rotation
    pub center: Vec2,
    /// World position the points are relative to
    pub position: Vec2,
    /// Cached world-space bounds
    pub bounds: Rect,
}

impl Polygon {
    /// Creates a polygon from points relative to its position
    pub fn new(points: Vec<Vec2>) -> Self {
        Self::build(points, false)
    }

    /// Creates a regular polygon with `vertex_count` vertices on a circle of `radius`
    pub fn regular(vertex_count: usize, radius: f32) -> Self {
        Self::new(Self::build_symmetrical_polygon(vertex_count, radius))
    }

    pub(crate) fn build(points: Vec<Vec2>, is_box: bool) -> Self {
        let mut polygon = Self {
            points: Vec::new(),
            original_points: Vec::new(),
            polygon_center: Vec2::zeros(),
            edge_normals: Vec::new(),
            is_box,
            is_unrotated: true,
            center: Vec2::zeros(),
            position: Vec2::zeros(),
            bounds: Rect::default(),
        };
        polygon.set_points(points);
        polygon
    }

    /// Points of a regular polygon centered on the origin
    pub fn build_symmetrical_polygon(vertex_count: usize, radius: f32) -> Vec<Vec2> {
        (0..vertex_count)
            .map(|i| {
                let angle = constants::TAU * (i as f32 / vertex_count as f32);
                utils::angle_to_vector(angle) * radius
            })
            .collect()
    }

    /// Arithmetic mean of the points
    pub fn find_polygon_center(points: &[Vec2]) -> Vec2 {
        if points.is_empty() {
            return Vec2::zeros();
        }
        points.iter().fold(Vec2::zeros(), |acc, p| acc + p) / points.len() as f32
    }

    /// Recenters `points` on their centroid, returning the centroid
    pub fn recenter_polygon_points(points: &mut [Vec2]) -> Vec2 {
        let center = Self::find_polygon_center(points);
        for point in points.iter_mut() {
            *point -= center;
        }
        center
    }

    /// Replace the point list
    pub fn set_points(&mut self, points: Vec<Vec2>) {
        self.polygon_center = Self::find_polygon_center(&points);
        self.original_points.clone_from(&points);
        self.points = points;
        self.is_unrotated = true;
        self.rebuild_edge_normals();
        self.update_bounds();
    }

    /// Current points, relative to [`Self::position`]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Current points in world space
    pub fn world_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(move |p| p + self.position)
    }

    /// Outward edge normals; a box only reports its two unique axes
    pub fn edge_normals(&self) -> &[Vec2] {
        &self.edge_normals
    }

    /// Whether this polygon backs a box
    pub fn is_box(&self) -> bool {
        self.is_box
    }

    /// Whether the points are in their original orientation
    pub fn is_unrotated(&self) -> bool {
        self.is_unrotated
    }

    /// Move the polygon, keeping bounds in sync
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_bounds();
    }

    /// Recompute points, position and bounds from the owning transform.
    ///
    /// Points are scaled and rotated about the polygon centroid; the
    /// collider offset orbits the entity origin.
    pub fn recalculate_bounds(&mut self, transform: &ShapeTransform) {
        self.center = transform.world_offset();

        if transform.scale_and_rotate {
            let rotation = Rotation2::new(transform.transform.rotation);
            let scale = transform.transform.scale;
            let pivot = self.polygon_center;

            self.points = self
                .original_points
                .iter()
                .map(|p| pivot + rotation * (p - pivot).component_mul(&scale))
                .collect();
            self.is_unrotated = transform.transform.rotation == 0.0;
        } else {
            self.points.clone_from(&self.original_points);
            self.is_unrotated = true;
        }
        self.rebuild_edge_normals();

        self.position = transform.transform.position + self.center;
        self.update_bounds();
    }

    fn update_bounds(&mut self) {
        self.bounds = Rect::encompassing_points(&self.points).translated(self.position);
    }

    fn rebuild_edge_normals(&mut self) {
        let count = self.points.len();
        if count < 2 {
            self.edge_normals.clear();
            return;
        }

        let total = if self.is_box { 2 } else { count };
        let centroid = Self::find_polygon_center(&self.points);
        self.edge_normals = (0..total)
            .map(|i| outward_normal(self.points[i], self.points[(i + 1) % count], centroid))
            .collect();
    }

    /// Crossing-number containment test
    pub fn contains_point(&self, point: Vec2) -> bool {
        let point = point - self.position;
        let count = self.points.len();
        let mut is_inside = false;

        let mut j = count.wrapping_sub(1);
        for i in 0..count {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > point.y) != (pj.y > point.y)
                && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
            {
                is_inside = !is_inside;
            }
            j = i;
        }

        is_inside
    }

    /// World-space projection onto `axis`
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let offset = self.position.dot(&axis);
        let (min, max) = self
            .points
            .iter()
            .map(|p| p.dot(&axis))
            .fold((f32::MAX, f32::MIN), |(min, max), d| (min.min(d), max.max(d)));
        (min + offset, max + offset)
    }

    /// World-space vertex furthest along `direction`
    pub fn get_furthest_point(&self, direction: Vec2) -> Vec2 {
        let mut furthest = self.points.first().copied().unwrap_or_else(Vec2::zeros);
        let mut max_dot = furthest.dot(&direction);

        for point in self.points.iter().skip(1) {
            let dot = point.dot(&direction);
            if dot > max_dot {
                max_dot = dot;
                furthest = *point;
            }
        }

        furthest + self.position
    }

    /// Closest point on the polygon outline to `point`.
    ///
    /// Both `point` and the returned point are relative to the polygon
    /// position. Also returns the squared distance and the outward normal
    /// of the closest edge.
    pub fn closest_point_on_polygon_to_point(points: &[Vec2], point: Vec2) -> (Vec2, f32, Vec2) {
        let count = points.len();
        let centroid = Self::find_polygon_center(points);
        let mut distance_squared = f32::MAX;
        let mut closest_point = Vec2::zeros();
        let mut edge_normal = Vec2::new(0.0, -1.0);

        for i in 0..count {
            let first = points[i];
            let second = points[(i + 1) % count];
            let candidate = utils::closest_point_on_segment(first, second, point);
            let candidate_distance = (point - candidate).norm_squared();

            if candidate_distance < distance_squared {
                distance_squared = candidate_distance;
                closest_point = candidate;
                edge_normal = outward_normal(first, second, centroid);
            }
        }

        (closest_point, distance_squared, edge_normal)
    }
}

/// Unit normal of `first -> second` pointing away from `centroid`
pub(crate) fn outward_normal(first: Vec2, second: Vec2, centroid: Vec2) -> Vec2 {
    let normal = utils::normalize_or(utils::perpendicular(first, second), Vec2::new(0.0, -1.0));
    let midpoint = (first + second) * 0.5;
    if normal.dot(&(midpoint - centroid)) < 0.0 {
        -normal
    } else {
        normal
    }
}
