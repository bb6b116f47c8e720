//! Point narrow-phase routines
//!
//! The point plays the role of the first shape: its result normal points
//! out of the other shape and subtracting the translation from the point
//! moves it onto the outline.

use crate::foundation::math::{utils, Vec2};
use crate::physics::collision::box_shape::BoxShape;
use crate::physics::collision::circle::Circle;
use crate::physics::collision::polygon::Polygon;
use crate::physics::collision::primitives::CollisionResult;
use crate::physics::collision::sector::Sector;

/// Point against circle
pub fn point_to_circle(point: Vec2, circle: &Circle) -> Option<CollisionResult> {
    let offset = point - circle.position;
    let distance_squared = offset.norm_squared();
    if distance_squared >= circle.radius * circle.radius {
        return None;
    }

    let normal = utils::normalize_or(offset, Vec2::new(1.0, 0.0));
    let depth = circle.radius - distance_squared.sqrt();
    Some(CollisionResult::new(
        normal,
        -normal * depth,
        circle.position + normal * circle.radius,
    ))
}

/// Point against box
pub fn point_to_box(point: Vec2, shape: &BoxShape) -> Option<CollisionResult> {
    if !shape.is_unrotated() {
        return point_to_polygon(point, &shape.polygon);
    }
    if !shape.contains_point(point) {
        return None;
    }

    let (closest, normal) = shape.bounds().closest_point_on_border(point);
    Some(CollisionResult::new(normal, point - closest, closest))
}

/// Point against polygon
pub fn point_to_polygon(point: Vec2, polygon: &Polygon) -> Option<CollisionResult> {
    if !polygon.contains_point(point) {
        return None;
    }

    let (closest, distance_squared, normal) =
        Polygon::closest_point_on_polygon_to_point(polygon.points(), point - polygon.position);
    Some(CollisionResult::new(
        normal,
        -normal * distance_squared.sqrt(),
        closest + polygon.position,
    ))
}

/// Point against sector
pub fn point_to_sector(point: Vec2, sector: &Sector) -> Option<CollisionResult> {
    if !sector.contains_point(point) {
        return None;
    }

    let (closest, normal) = sector.closest_point_on_boundary(point);
    Some(CollisionResult::new(normal, point - closest, closest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_to_circle() {
        let circle = Circle::at(Vec2::zeros(), 10.0);
        let point = Vec2::new(0.0, 7.0);
        let result = point_to_circle(point, &circle).unwrap();

        assert_relative_eq!(result.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(point - result.min_translation, Vec2::new(0.0, 10.0), epsilon = 1e-5);
        assert!(point_to_circle(Vec2::new(0.0, 11.0), &circle).is_none());
    }

    #[test]
    fn test_point_to_polygon_moves_point_out() {
        let mut polygon = Polygon::regular(4, 10.0);
        polygon.set_position(Vec2::new(50.0, 50.0));
        let point = Vec2::new(52.0, 50.0);
        let result = point_to_polygon(point, &polygon).unwrap();

        let escaped = point - result.min_translation * 1.01;
        assert!(!polygon.contains_point(escaped));
    }

    #[test]
    fn test_point_to_sector() {
        let sector = Sector::at(Vec2::zeros(), 10.0, 0.0, constants::HALF_PI);
        let point = Vec2::new(5.0, 1.0);
        let result = point_to_sector(point, &sector).unwrap();

        assert_relative_eq!(result.normal, Vec2::new(0.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(point - result.min_translation, Vec2::new(5.0, 0.0), epsilon = 1e-5);
        assert!(point_to_sector(Vec2::new(-5.0, 1.0), &sector).is_none());
    }
}
