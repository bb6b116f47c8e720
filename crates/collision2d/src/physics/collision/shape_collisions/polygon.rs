//! Polygon and box narrow-phase routines

use crate::foundation::math::{Rect, Vec2};
use crate::physics::collision::box_shape::BoxShape;
use crate::physics::collision::polygon::Polygon;
use crate::physics::collision::primitives::CollisionResult;

/// Separating axis test over `axes` (unit length).
///
/// `offset` is the vector from the second shape toward the first and only
/// breaks ties. Returns the normal the first shape should be pushed along
/// and the push depth, or `None` as soon as an axis separates the shapes.
pub(crate) fn separating_axis_test<I, F, S>(
    axes: I,
    offset: Vec2,
    project_first: F,
    project_second: S,
) -> Option<(Vec2, f32)>
where
    I: IntoIterator<Item = Vec2>,
    F: Fn(Vec2) -> (f32, f32),
    S: Fn(Vec2) -> (f32, f32),
{
    let mut best: Option<(Vec2, f32)> = None;

    for axis in axes {
        let (min_a, max_a) = project_first(axis);
        let (min_b, max_b) = project_second(axis);

        let push_forward = max_b - min_a;
        let push_backward = max_a - min_b;
        if push_forward <= 0.0 || push_backward <= 0.0 {
            return None;
        }

        let forward = push_forward < push_backward
            || (push_forward == push_backward && axis.dot(&offset) >= 0.0);
        let (normal, depth) = if forward {
            (axis, push_forward)
        } else {
            (-axis, push_backward)
        };

        if best.map_or(true, |(_, min_depth)| depth < min_depth) {
            best = Some((normal, depth));
        }
    }

    best
}

/// Polygon against polygon using separating axes.
///
/// Boxes contribute their two unique axes only.
pub fn polygon_to_polygon(first: &Polygon, second: &Polygon) -> Option<CollisionResult> {
    let axes = first
        .edge_normals()
        .iter()
        .chain(second.edge_normals())
        .copied();

    let (normal, depth) = separating_axis_test(
        axes,
        first.position - second.position,
        |axis| first.project(axis),
        |axis| second.project(axis),
    )?;

    Some(CollisionResult::new(
        normal,
        -normal * depth,
        second.get_furthest_point(normal),
    ))
}

/// Minkowski difference of two axis-aligned boxes
pub fn minkowski_difference(first: &BoxShape, second: &BoxShape) -> Rect {
    let first_bounds = first.bounds();
    let second_bounds = second.bounds();
    let top_left = first_bounds.min() - second_bounds.max();
    let full_size = first_bounds.size() + second_bounds.size();

    Rect::new(top_left.x, top_left.y, full_size.x, full_size.y)
}

/// Box against box.
///
/// Two unrotated boxes take the Minkowski difference fast path; anything
/// rotated falls back to polygon separating axes.
pub fn box_to_box(first: &BoxShape, second: &BoxShape) -> Option<CollisionResult> {
    if !(first.is_unrotated() && second.is_unrotated()) {
        return polygon_to_polygon(&first.polygon, &second.polygon);
    }

    let difference = minkowski_difference(first, second);
    if !difference.contains_point(Vec2::zeros()) {
        return None;
    }

    let min_translation = difference.closest_point_on_bounds_to_origin();
    if min_translation == Vec2::zeros() {
        return None;
    }

    let normal = -min_translation.normalize();
    let overlap = Rect::from_min_max(
        Vec2::new(
            first.bounds().left().max(second.bounds().left()),
            first.bounds().top().max(second.bounds().top()),
        ),
        Vec2::new(
            first.bounds().right().min(second.bounds().right()),
            first.bounds().bottom().min(second.bounds().bottom()),
        ),
    );

    Some(CollisionResult::new(normal, min_translation, overlap.center()))
}
