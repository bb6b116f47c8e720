//! Segment narrow-phase routines used by line casts

use crate::foundation::math::{constants, utils, Vec2};
use crate::physics::collision::circle::Circle;
use crate::physics::collision::polygon::{outward_normal, Polygon};
use crate::physics::collision::primitives::RaycastHit;
use crate::physics::collision::sector::Sector;

/// Parametric intersection of segments `a1 -> a2` and `b1 -> b2`.
///
/// Returns the fractions along each segment. Parallel segments never
/// intersect.
pub(crate) fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<(f32, f32)> {
    let b = a2 - a1;
    let d = b2 - b1;
    let b_dot_d_perp = utils::cross(b, d);
    if b_dot_d_perp.abs() < constants::EPSILON {
        return None;
    }

    let c = b1 - a1;
    let t = utils::cross(c, d) / b_dot_d_perp;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let u = utils::cross(c, b) / b_dot_d_perp;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some((t, u))
}

/// Segment against polygon; reports the first edge crossed
pub fn line_to_polygon(start: Vec2, end: Vec2, polygon: &Polygon) -> Option<RaycastHit> {
    let points: Vec<Vec2> = polygon.world_points().collect();
    let count = points.len();
    if count < 2 {
        return None;
    }
    let centroid = Polygon::find_polygon_center(&points);

    let mut best: Option<(f32, Vec2)> = None;
    let mut j = count - 1;
    for i in 0..count {
        let edge_start = points[j];
        let edge_end = points[i];
        if let Some((fraction, _)) = segment_intersection(start, end, edge_start, edge_end) {
            if best.map_or(true, |(f, _)| fraction < f) {
                best = Some((fraction, outward_normal(edge_start, edge_end, centroid)));
            }
        }
        j = i;
    }

    let (fraction, normal) = best?;
    let point = start + (end - start) * fraction;
    Some(RaycastHit::new(fraction, (point - start).norm(), point, normal))
}

/// Segment against circle; a segment starting inside hits at fraction 0
pub fn line_to_circle(start: Vec2, end: Vec2, circle: &Circle) -> Option<RaycastHit> {
    let length = (end - start).norm();
    if length < constants::EPSILON {
        return None;
    }

    let direction = (end - start) / length;
    let from_center = start - circle.position;
    let b = from_center.dot(&direction);
    let c = from_center.dot(&from_center) - circle.radius * circle.radius;

    // starts outside and points away
    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let distance = (-b - discriminant.sqrt()).max(0.0);
    if distance > length {
        return None;
    }

    let point = start + direction * distance;
    let normal = utils::normalize_or(point - circle.position, -direction);
    Some(RaycastHit::new(distance / length, distance, point, normal))
}

/// Segment against sector; reports the first straight edge or arc crossing
pub fn line_to_sector(start: Vec2, end: Vec2, sector: &Sector) -> Option<RaycastHit> {
    let direction = end - start;
    let mut best: Option<(f32, Vec2)> = None;
    let mut consider = |fraction: f32, normal: Vec2| {
        if best.map_or(true, |(f, _)| fraction < f) {
            best = Some((fraction, normal));
        }
    };

    if !sector.is_full_circle() {
        for (apex, rim, normal) in sector.radial_segments() {
            if let Some((fraction, _)) = segment_intersection(start, end, apex, rim) {
                consider(fraction, normal);
            }
        }
    }

    for fraction in sector.arc_crossings(start, end).into_iter().flatten() {
        let point = start + direction * fraction;
        consider(fraction, utils::normalize_or(point - sector.position, -direction));
    }

    let (fraction, normal) = best?;
    let point = start + direction * fraction;
    Some(RaycastHit::new(fraction, direction.norm() * fraction, point, normal))
}
