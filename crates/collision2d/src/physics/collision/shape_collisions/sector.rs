//! Sector narrow-phase routines
//!
//! Overlap is decided exactly from containment and outline crossings. The
//! translation comes from separating axes over the sector's true projection,
//! which for sectors wider than a half circle behaves like its convex hull.

use crate::foundation::math::{constants, utils, Vec2};
use crate::physics::collision::circle::Circle;
use crate::physics::collision::polygon::Polygon;
use crate::physics::collision::primitives::CollisionResult;
use crate::physics::collision::sector::Sector;
use crate::physics::collision::shape_collisions::line::segment_intersection;
use crate::physics::collision::shape_collisions::polygon::separating_axis_test;

/// Sector against circle
pub fn sector_to_circle(sector: &Sector, circle: &Circle) -> Option<CollisionResult> {
    if sector.span > constants::PI {
        return reflex_sector_to_circle(sector, circle);
    }

    let (closest, edge_normal) = sector.closest_point_on_boundary(circle.position);
    let offset = circle.position - closest;

    if sector.contains_point(circle.position) {
        // the circle escapes through the nearest outline point
        let depth = offset.norm() + circle.radius;
        return Some(CollisionResult::new(-edge_normal, edge_normal * depth, closest));
    }

    let distance_squared = offset.norm_squared();
    if distance_squared >= circle.radius * circle.radius {
        return None;
    }

    let outward = utils::normalize_or(offset, edge_normal);
    let depth = circle.radius - distance_squared.sqrt();
    Some(CollisionResult::new(-outward, outward * depth, closest))
}

/// Sector wider than a half circle against circle, pushed apart along
/// separating axes over the sector's full projection
fn reflex_sector_to_circle(sector: &Sector, circle: &Circle) -> Option<CollisionResult> {
    let (closest, _) = sector.closest_point_on_boundary(circle.position);
    let touching = (circle.position - closest).norm_squared() < circle.radius * circle.radius;
    if !touching && !sector.contains_point(circle.position) {
        return None;
    }

    let mut axes: Vec<Vec2> = sector.edge_normals().to_vec();
    axes.extend(
        (sector.end_point() - sector.start_point())
            .try_normalize(constants::EPSILON)
            .map(|chord| Vec2::new(-chord.y, chord.x)),
    );
    axes.extend(
        [sector.position, sector.start_point(), sector.end_point()]
            .into_iter()
            .filter_map(|from| (circle.position - from).try_normalize(constants::EPSILON)),
    );

    let (normal, depth) = separating_axis_test(
        axes,
        sector.position - circle.position,
        |axis| sector.project(axis),
        |axis| circle.project(axis),
    )?;

    Some(CollisionResult::new(
        normal,
        -normal * depth,
        circle.get_furthest_point(normal),
    ))
}

/// Exact overlap of a sector and a polygon
pub fn sector_overlaps_polygon(sector: &Sector, polygon: &Polygon) -> bool {
    let vertices: Vec<Vec2> = polygon.world_points().collect();
    if vertices.iter().any(|v| sector.contains_point(*v)) {
        return true;
    }
    if polygon.contains_point(sector.position) {
        return true;
    }

    let count = vertices.len();
    (0..count).any(|i| {
        let edge_start = vertices[i];
        let edge_end = vertices[(i + 1) % count];

        let crosses_edge = sector
            .radial_segments()
            .into_iter()
            .any(|(apex, rim, _)| segment_intersection(edge_start, edge_end, apex, rim).is_some());

        crosses_edge || sector.arc_crossings(edge_start, edge_end).iter().any(Option::is_some)
    })
}

/// Sector against polygon (or a box's polygon)
pub fn sector_to_polygon(sector: &Sector, polygon: &Polygon) -> Option<CollisionResult> {
    if !sector_overlaps_polygon(sector, polygon) {
        return None;
    }

    let mut axes: Vec<Vec2> = polygon.edge_normals().to_vec();
    axes.extend(sector.edge_normals());
    axes.extend(
        polygon
            .world_points()
            .filter_map(|v| (v - sector.position).try_normalize(constants::EPSILON)),
    );

    let polygon_center = polygon.position + Polygon::find_polygon_center(polygon.points());
    let (normal, depth) = separating_axis_test(
        axes,
        sector.position - polygon_center,
        |axis| sector.project(axis),
        |axis| polygon.project(axis),
    )?;

    Some(CollisionResult::new(
        normal,
        -normal * depth,
        polygon.get_furthest_point(normal),
    ))
}

/// Exact overlap of two sectors
pub fn sector_overlaps_sector(first: &Sector, second: &Sector) -> bool {
    if first.contains_point(second.position) || second.contains_point(first.position) {
        return true;
    }

    let first_edges = first.radial_segments();
    let second_edges = second.radial_segments();

    for (a_start, a_end, _) in first_edges {
        for (b_start, b_end, _) in second_edges {
            if segment_intersection(a_start, a_end, b_start, b_end).is_some() {
                return true;
            }
        }
        if second.arc_crossings(a_start, a_end).iter().any(Option::is_some) {
            return true;
        }
    }

    for (b_start, b_end, _) in second_edges {
        if first.arc_crossings(b_start, b_end).iter().any(Option::is_some) {
            return true;
        }
    }

    first.arc_intersects_arc(second)
}

/// Sector against sector
pub fn sector_to_sector(first: &Sector, second: &Sector) -> Option<CollisionResult> {
    if !sector_overlaps_sector(first, second) {
        return None;
    }

    let mut axes: Vec<Vec2> = Vec::with_capacity(9);
    axes.extend(first.edge_normals());
    axes.extend(second.edge_normals());

    let pairs = [
        (first.position, second.position),
        (first.position, second.start_point()),
        (first.position, second.end_point()),
        (second.position, first.start_point()),
        (second.position, first.end_point()),
    ];
    axes.extend(
        pairs
            .into_iter()
            .filter_map(|(from, to)| (to - from).try_normalize(constants::EPSILON)),
    );

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
