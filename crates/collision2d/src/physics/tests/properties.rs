//! Property tests for the narrow-phase, the spatial hash and linecasts
//!
//! Placements come from a fixed-seed generator so failures reproduce.

use std::collections::HashSet;

use crate::core::config::PhysicsConfig;
use crate::ecs::{Entity, EntityAllocator};
use crate::foundation::collections::ColliderHandle;
use crate::foundation::math::{Rect, Transform2D, Vec2};
use crate::physics::{Collider, CollisionLayers, PhysicsWorld, Polygon, RaycastHit, Shape};
use crate::spatial::SpatialHash;

/// Linear congruential generator, enough to scatter test shapes
struct Lcg(u32);

impl Lcg {
    fn next_unit(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 >> 8) as f32 / (1_u32 << 24) as f32
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_unit()
    }
}

fn placed(collider: Collider) -> Shape {
    let mut collider = collider;
    collider.recalculate_bounds();
    collider.shape().clone()
}

/// One of each solid shape kind, centered on `position`
fn solid_shapes(entity: Entity, position: Vec2) -> Vec<Shape> {
    let at = Transform2D::from_position(position);
    vec![
        placed(Collider::circle(entity, 3.0).with_transform(at)),
        placed(Collider::rectangle(entity, 4.0, 6.0).with_transform(at)),
        placed(Collider::rectangle(entity, 5.0, 3.0).with_transform(at.with_rotation(0.6))),
        placed(Collider::new(entity, Polygon::regular(5, 4.0)).with_transform(at)),
        placed(
            Collider::polygon(
                entity,
                vec![Vec2::new(0.0, -3.0), Vec2::new(3.5, 2.0), Vec2::new(-2.5, 2.5)],
            )
            .with_transform(at),
        ),
    ]
}

fn sector_shapes(entity: Entity, position: Vec2) -> Vec<Shape> {
    let at = Transform2D::from_position(position);
    vec![
        placed(Collider::sector(entity, 5.0, 0.3, 1.2).with_transform(at)),
        placed(Collider::sector(entity, 4.0, 2.0, 4.0).with_transform(at)),
    ]
}

fn offsets() -> impl Iterator<Item = Vec2> {
    (-5..=5).flat_map(|i| {
        (-5..=5).map(move |j| Vec2::new(i as f32 * 1.37 + 0.11, j as f32 * 1.29 + 0.07))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps_is_symmetric() {
        let mut entities = EntityAllocator::new();
        let entity = entities.create();

        let mut fixed = solid_shapes(entity, Vec2::zeros());
        fixed.extend(sector_shapes(entity, Vec2::zeros()));

        for offset in offsets() {
            let mut moving = solid_shapes(entity, offset);
            moving.extend(sector_shapes(entity, offset));

            for a in &fixed {
                for b in &moving {
                    assert_eq!(
                        a.overlaps(b),
                        b.overlaps(a),
                        "asymmetric overlap between {a:?} and {b:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_overlaps_agrees_with_collides_with_shape() {
        let mut entities = EntityAllocator::new();
        let entity = entities.create();
        let fixed = solid_shapes(entity, Vec2::zeros());

        for offset in offsets() {
            for a in &fixed {
                for b in &solid_shapes(entity, offset) {
                    assert_eq!(a.overlaps(b), a.collides_with_shape(b).is_some());
                }
            }
        }
    }

    #[test]
    fn test_minimum_translation_separates() {
        let mut entities = EntityAllocator::new();
        let entity = entities.create();

        let mut fixed = solid_shapes(entity, Vec2::zeros());
        fixed.extend(sector_shapes(entity, Vec2::zeros()));

        let mut checked = 0;
        let mut checked_sectors = 0;
        for offset in offsets() {
            let mut moving = solid_shapes(entity, offset);
            moving.extend(sector_shapes(entity, offset));

            for a in &moving {
                for b in &fixed {
                    let Some(result) = a.collides_with_shape(b) else {
                        continue;
                    };
                    if result.depth() < 0.05 {
                        continue;
                    }

                    let moved = a.translated(-result.min_translation * 1.01);
                    assert!(
                        !moved.overlaps(b),
                        "still overlapping after applying {:?} to {a:?} against {b:?}",
                        result.min_translation
                    );
                    checked += 1;
                    if matches!(a, Shape::Sector(_)) || matches!(b, Shape::Sector(_)) {
                        checked_sectors += 1;
                    }
                }
            }
        }

        assert!(checked > 100);
        assert!(checked_sectors > 50);
    }

    #[test]
    fn test_hash_round_trip() {
        let mut rng = Lcg(7);
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::new(PhysicsConfig::default().with_cell_size(16.0)).unwrap();

        let handles: Vec<ColliderHandle> = (0..60)
            .map(|_| {
                let position = Vec2::new(rng.range(-200.0, 200.0), rng.range(-200.0, 200.0));
                let collider = Collider::rectangle(entities.create(), rng.range(1.0, 40.0), rng.range(1.0, 40.0))
                    .with_transform(Transform2D::from_position(position));
                world.add_collider(collider)
            })
            .collect();

        // every registered collider sits in exactly the cells its bounds cover
        let hash = world.spatial_hash();
        for &handle in &handles {
            let bounds = world.collider(handle).unwrap().registered_physics_bounds();
            let range = hash.cell_range(&bounds);
            for (cell, contents) in hash.cells() {
                assert_eq!(range.contains(cell), contents.contains(&handle));
            }
        }

        for &handle in &handles {
            world.remove_collider(handle).unwrap();
        }
        assert_eq!(world.spatial_hash().cell_count(), 0);
    }

    #[test]
    fn test_broadphase_is_sound() {
        let mut rng = Lcg(99);
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::new(PhysicsConfig::default().with_cell_size(25.0)).unwrap();

        for _ in 0..80 {
            let position = Vec2::new(rng.range(-150.0, 150.0), rng.range(-150.0, 150.0));
            world.add_collider(
                Collider::circle(entities.create(), rng.range(1.0, 20.0))
                    .with_transform(Transform2D::from_position(position)),
            );
        }

        for _ in 0..30 {
            let query = Rect::new(
                rng.range(-180.0, 150.0),
                rng.range(-180.0, 150.0),
                rng.range(1.0, 60.0),
                rng.range(1.0, 60.0),
            );

            let found = world.boxcast_broadphase(&query, CollisionLayers::ALL);
            let expected: HashSet<ColliderHandle> = world
                .colliders()
                .filter(|(_, collider)| query.intersects(&collider.cached_bounds()))
                .map(|(handle, _)| handle)
                .collect();

            assert_eq!(found, expected);
        }
    }

    #[test]
    fn test_broadphase_honours_layers() {
        let mut rng = Lcg(3);
        let mut entities = EntityAllocator::new();
        let mut hash = SpatialHash::new(20.0);
        let mut colliders = crate::foundation::collections::ColliderArena::with_key();

        let layers = [CollisionLayers::PLAYER, CollisionLayers::ENEMY, CollisionLayers::PICKUP];
        for index in 0..45 {
            let position = Vec2::new(rng.range(-50.0, 50.0), rng.range(-50.0, 50.0));
            let collider = Collider::circle(entities.create(), 4.0)
                .with_physics_layer(layers[index % layers.len()])
                .with_transform(Transform2D::from_position(position));
            let handle = colliders.insert(collider);
            hash.register(handle, &mut colliders[handle]);
        }

        let everything = Rect::new(-100.0, -100.0, 200.0, 200.0);
        let mask = CollisionLayers::PLAYER | CollisionLayers::PICKUP;
        let found = hash.aabb_broadphase(&colliders, &everything, None, mask);

        assert_eq!(found.len(), 30);
        for handle in found {
            assert_ne!(colliders[handle].physics_layer, CollisionLayers::ENEMY);
        }
    }

    #[test]
    fn test_linecast_all_is_sorted_by_distance() {
        let mut rng = Lcg(42);
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::new(PhysicsConfig::default().with_cell_size(30.0)).unwrap();

        for _ in 0..50 {
            let position = Vec2::new(rng.range(-150.0, 150.0), rng.range(-150.0, 150.0));
            let entity = entities.create();
            let collider = if rng.next_unit() < 0.5 {
                Collider::circle(entity, rng.range(2.0, 12.0))
            } else {
                Collider::rectangle(entity, rng.range(2.0, 20.0), rng.range(2.0, 20.0))
            };
            world.add_collider(collider.with_transform(Transform2D::from_position(position)));
        }

        let mut total_hits = 0;
        for _ in 0..20 {
            let start = Vec2::new(-250.0, rng.range(-150.0, 150.0));
            let end = Vec2::new(250.0, rng.range(-150.0, 150.0));

            let mut hits = [RaycastHit::default(); 16];
            let count = world.linecast_all(start, end, &mut hits, CollisionLayers::ALL);
            total_hits += count;

            for window in hits[..count].windows(2) {
                assert!(window[0].distance <= window[1].distance);
            }

            let distinct: HashSet<_> = hits[..count].iter().map(|hit| hit.collider).collect();
            assert_eq!(distinct.len(), count);
        }

        assert!(total_hits > 0);
    }
}
