//! Per-linecast hit collection
//!
//! The spatial hash walks the grid cell by cell and hands each visited
//! cell to a [`RaycastResultParser`], which filters, tests and orders the
//! colliders it has not seen yet during this cast.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::foundation::collections::{ColliderArena, ColliderHandle};
use crate::physics::collider::Collider;
use crate::physics::collision::{Ray2D, RaycastHit};
use crate::physics::collision_layers::CollisionLayers;

/// World-level switches that decide which colliders a line cast may report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RaycastPolicy {
    /// Report trigger colliders
    pub hit_triggers: bool,
    /// Report colliders that contain the ray start
    pub start_in_colliders: bool,
}

/// Stateful helper for one line cast
pub struct RaycastResultParser<'a> {
    ray: Ray2D,
    capacity: usize,
    hits: Vec<(RaycastHit, i32)>,
    checked_colliders: HashSet<ColliderHandle>,
    layer_mask: u32,
    ignored_colliders: Option<&'a HashSet<ColliderHandle>>,
    policy: RaycastPolicy,
}

impl<'a> RaycastResultParser<'a> {
    /// Start a cast that keeps at most `capacity` hits
    pub fn new(
        ray: Ray2D,
        capacity: usize,
        layer_mask: u32,
        ignored_colliders: Option<&'a HashSet<ColliderHandle>>,
        policy: RaycastPolicy,
    ) -> Self {
        Self {
            ray,
            capacity,
            hits: Vec::with_capacity(capacity),
            checked_colliders: HashSet::new(),
            layer_mask,
            ignored_colliders,
            policy,
        }
    }

    /// The ray being cast
    pub fn ray(&self) -> &Ray2D {
        &self.ray
    }

    /// Test every collider of a cell that this cast has not checked yet
    pub fn check_ray_intersection(&mut self, cell: &[ColliderHandle], colliders: &ColliderArena<Collider>) {
        let mut found = false;

        for &handle in cell {
            if !self.checked_colliders.insert(handle) {
                continue;
            }

            let Some(collider) = colliders.get(handle) else {
                log::warn!("Linecast skipped stale collider handle {handle:?}");
                continue;
            };

            if collider.is_trigger && !self.policy.hit_triggers {
                continue;
            }
            if !CollisionLayers::is_flag_set(self.layer_mask, collider.physics_layer) {
                continue;
            }
            if self.ignored_colliders.is_some_and(|ignored| ignored.contains(&handle)) {
                continue;
            }

            // cheap rejection on the bounds before the exact shape test
            match collider.cached_bounds().ray_intersects(self.ray.start, self.ray.direction) {
                Some(fraction) if fraction <= 1.0 => {}
                _ => continue,
            }

            let Some(hit) = collider.shape().collides_with_line(self.ray.start, self.ray.end) else {
                continue;
            };

            if !self.policy.start_in_colliders && collider.shape().contains_point(self.ray.start) {
                continue;
            }

            let mut hit = hit.with_collider(handle);
            hit.centroid = self.ray.start;
            self.hits.push((hit, collider.cast_sort_order));
            found = true;
        }

        if found {
            self.hits.sort_by(compare_hits);
            self.hits.truncate(self.capacity);
        }
    }

    /// Whether the buffer is full
    pub fn is_full(&self) -> bool {
        self.hits.len() >= self.capacity
    }

    /// Whether no cell entered at `next_entry_fraction` or later can beat
    /// the hits already kept
    pub fn can_stop(&self, next_entry_fraction: f32) -> bool {
        self.is_full()
            && self
                .hits
                .last()
                .is_some_and(|(worst, _)| worst.fraction <= next_entry_fraction)
    }

    /// Copy the ordered hits into `out`, returning how many were written
    pub fn finish(self, out: &mut [RaycastHit]) -> usize {
        let count = self.hits.len().min(out.len());
        for (slot, (hit, _)) in out.iter_mut().zip(self.hits) {
            *slot = hit;
        }
        count
    }
}

/// Order by fraction, then by cast sort order
fn compare_hits(a: &(RaycastHit, i32), b: &(RaycastHit, i32)) -> Ordering {
    a.0.fraction.total_cmp(&b.0.fraction).then(a.1.cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityAllocator;
    use crate::foundation::math::{Transform2D, Vec2};
    use approx::assert_relative_eq;

    fn arena_with_boxes(positions: &[(f32, i32)]) -> (ColliderArena<Collider>, Vec<ColliderHandle>) {
        let mut entities = EntityAllocator::new();
        let mut arena = ColliderArena::with_key();
        let handles = positions
            .iter()
            .map(|&(x, order)| {
                let mut collider = Collider::rectangle(entities.create(), 2.0, 2.0)
                    .with_cast_sort_order(order)
                    .with_transform(Transform2D::from_position(Vec2::new(x, 0.0)));
                collider.bounds();
                arena.insert(collider)
            })
            .collect();
        (arena, handles)
    }

    #[test]
    fn test_hits_sorted_and_truncated() {
        let (arena, handles) = arena_with_boxes(&[(30.0, 0), (10.0, 0), (20.0, 0)]);
        let ray = Ray2D::new(Vec2::zeros(), Vec2::new(100.0, 0.0));
        let mut parser = RaycastResultParser::new(ray, 2, CollisionLayers::ALL, None, RaycastPolicy::default());

        parser.check_ray_intersection(&handles, &arena);
        assert!(parser.is_full());
        assert!(parser.can_stop(0.5));
        assert!(!parser.can_stop(0.1));

        let mut out = [RaycastHit::default(); 4];
        let count = parser.finish(&mut out);
        assert_eq!(count, 2);
        assert_eq!(out[0].collider, Some(handles[1]));
        assert_eq!(out[1].collider, Some(handles[2]));
        assert_relative_eq!(out[0].point, Vec2::new(9.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_sort_order_breaks_ties() {
        let (arena, handles) = arena_with_boxes(&[(10.0, 5), (10.0, -1)]);
        let ray = Ray2D::new(Vec2::zeros(), Vec2::new(100.0, 0.0));
        let mut parser = RaycastResultParser::new(ray, 2, CollisionLayers::ALL, None, RaycastPolicy::default());

        parser.check_ray_intersection(&handles, &arena);
        let mut out = [RaycastHit::default(); 2];
        parser.finish(&mut out);
        assert_eq!(out[0].collider, Some(handles[1]));
    }

    #[test]
    fn test_colliders_checked_once_and_filtered() {
        let (arena, handles) = arena_with_boxes(&[(10.0, 0), (20.0, 0)]);
        let ignored: HashSet<ColliderHandle> = [handles[0]].into_iter().collect();
        let ray = Ray2D::new(Vec2::zeros(), Vec2::new(100.0, 0.0));
        let mut parser =
            RaycastResultParser::new(ray, 4, CollisionLayers::ALL, Some(&ignored), RaycastPolicy::default());

        parser.check_ray_intersection(&handles, &arena);
        parser.check_ray_intersection(&handles, &arena);
        let mut out = [RaycastHit::default(); 4];
        assert_eq!(parser.finish(&mut out), 1);
        assert_eq!(out[0].collider, Some(handles[1]));
    }

    #[test]
    fn test_start_inside_is_skipped_unless_allowed() {
        let (arena, handles) = arena_with_boxes(&[(0.0, 0)]);
        let ray = Ray2D::new(Vec2::zeros(), Vec2::new(100.0, 0.0));

        let mut parser = RaycastResultParser::new(ray, 1, CollisionLayers::ALL, None, RaycastPolicy::default());
        parser.check_ray_intersection(&handles, &arena);
        assert!(!parser.is_full());

        let policy = RaycastPolicy {
            start_in_colliders: true,
            ..RaycastPolicy::default()
        };
        let mut parser = RaycastResultParser::new(ray, 1, CollisionLayers::ALL, None, policy);
        parser.check_ray_intersection(&handles, &arena);
        assert!(parser.is_full());
    }
}
