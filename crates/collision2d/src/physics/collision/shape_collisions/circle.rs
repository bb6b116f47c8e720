//! Circle narrow-phase routines

use crate::foundation::math::{utils, Rect, Vec2};
use crate::physics::collision::box_shape::BoxShape;
use crate::physics::collision::circle::Circle;
use crate::physics::collision::polygon::Polygon;
use crate::physics::collision::primitives::CollisionResult;

/// Boolean circle overlap
pub fn circle_overlaps_circle(first: &Circle, second: &Circle) -> bool {
    let sum_of_radii = first.radius + second.radius;
    (first.position - second.position).norm_squared() < sum_of_radii * sum_of_radii
}

/// Circle against circle
pub fn circle_to_circle(first: &Circle, second: &Circle) -> Option<CollisionResult> {
    let distance_squared = (first.position - second.position).norm_squared();
    let sum_of_radii = first.radius + second.radius;
    if distance_squared >= sum_of_radii * sum_of_radii {
        return None;
    }

    let normal = utils::normalize_or(first.position - second.position, Vec2::new(1.0, 0.0));
    let depth = sum_of_radii - distance_squared.sqrt();
    let point = second.position + normal * second.radius;

    Some(CollisionResult::new(normal, -normal * depth, point))
}

/// Boolean test of a rectangle against a circle
pub fn rect_to_circle(rect: &Rect, center: Vec2, radius: f32) -> bool {
    if rect.contains_point(center) {
        return true;
    }

    let closest = Vec2::new(
        center.x.clamp(rect.left(), rect.right()),
        center.y.clamp(rect.top(), rect.bottom()),
    );
    (center - closest).norm_squared() < radius * radius
}

/// Circle against box. Unrotated boxes are handled with rectangle math,
/// rotated ones fall back to the polygon routine.
pub fn circle_to_box(circle: &Circle, shape: &BoxShape) -> Option<CollisionResult> {
    if !shape.is_unrotated() {
        return circle_to_polygon(circle, &shape.polygon);
    }

    let bounds = shape.bounds();
    let (closest, normal) = bounds.closest_point_on_border(circle.position);

    if bounds.contains_point(circle.position) {
        let safe_place = closest + normal * circle.radius;
        return Some(CollisionResult::new(normal, circle.position - safe_place, closest));
    }

    let offset = circle.position - closest;
    let distance_squared = offset.norm_squared();
    if distance_squared >= circle.radius * circle.radius {
        return None;
    }

    let distance = distance_squared.sqrt();
    let normal = utils::normalize_or(offset, normal);
    let depth = circle.radius - distance;

    Some(CollisionResult::new(normal, -normal * depth, closest))
}

/// Circle against polygon.
///
/// A circle whose center is inside the polygon is pushed out through the
/// closest edge, far enough to clear the whole circle.
pub fn circle_to_polygon(circle: &Circle, polygon: &Polygon) -> Option<CollisionResult> {
    let local_center = circle.position - polygon.position;
    let (closest, distance_squared, edge_normal) =
        Polygon::closest_point_on_polygon_to_point(polygon.points(), local_center);

    let center_inside = polygon.contains_point(circle.position);
    if distance_squared >= circle.radius * circle.radius && !center_inside {
        return None;
    }

    let distance = distance_squared.sqrt();
    let (normal, depth) = if center_inside {
        (edge_normal, distance + circle.radius)
    } else if distance_squared == 0.0 {
        // center exactly on an edge
        (edge_normal, circle.radius)
    } else {
        ((local_center - closest) / distance, circle.radius - distance)
    };

    Some(CollisionResult::new(normal, -normal * depth, closest + polygon.position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(position: Vec2, half: f32) -> Polygon {
        let mut polygon = Polygon::new(vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]);
        polygon.set_position(position);
        polygon
    }

    #[test]
    fn test_circle_circle_touching_is_not_a_collision() {
        let first = Circle::at(Vec2::zeros(), 5.0);
        let second = Circle::at(Vec2::new(10.0, 0.0), 5.0);

        assert!(!circle_overlaps_circle(&first, &second));
        assert!(circle_to_circle(&first, &second).is_none());
    }

    #[test]
    fn test_coincident_circles_use_fallback_normal() {
        let first = Circle::at(Vec2::zeros(), 2.0);
        let second = Circle::at(Vec2::zeros(), 3.0);
        let result = circle_to_circle(&first, &second).unwrap();

        assert_relative_eq!(result.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(result.depth(), 5.0);
    }

    #[test]
    fn test_circle_to_box_outside() {
        let shape = BoxShape::from_rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
        let circle = Circle::at(Vec2::new(13.0, 5.0), 4.0);
        let result = circle_to_box(&circle, &shape).unwrap();

        assert_relative_eq!(result.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(result.min_translation, Vec2::new(-1.0, 0.0));
        assert_relative_eq!(result.point, Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_circle_to_box_contained() {
        let shape = BoxShape::from_rect(&Rect::new(0.0, 0.0, 10.0, 10.0));
        let circle = Circle::at(Vec2::new(8.0, 5.0), 1.0);
        let result = circle_to_box(&circle, &shape).unwrap();

        // pushed out through the right edge: 2 to reach it plus the radius
        assert_relative_eq!(circle.position - result.min_translation, Vec2::new(11.0, 5.0));
    }

    #[test]
    fn test_circle_to_polygon_contained_clears_radius() {
        let polygon = square(Vec2::zeros(), 5.0);
        let circle = Circle::at(Vec2::new(3.0, 0.0), 1.0);
        let result = circle_to_polygon(&circle, &polygon).unwrap();

        assert_relative_eq!(result.normal, Vec2::new(1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(result.depth(), 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_circle_to_polygon_center_on_edge() {
        let polygon = square(Vec2::zeros(), 5.0);
        let circle = Circle::at(Vec2::new(5.0, 1.0), 2.0);
        let result = circle_to_polygon(&circle, &polygon).unwrap();

        assert!(result.normal.x.is_finite() && result.normal.y.is_finite());
        assert!(result.depth() >= 2.0 - 1e-5);
    }

    #[test]
    fn test_rect_to_circle_is_strict() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        assert!(rect_to_circle(&rect, Vec2::new(12.0, 5.0), 3.0));
        assert!(!rect_to_circle(&rect, Vec2::new(13.0, 5.0), 3.0));
        assert!(rect_to_circle(&rect, Vec2::new(5.0, 5.0), 0.5));
    }
}
