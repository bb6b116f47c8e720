//! End-to-end scenarios through the physics world

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::config::PhysicsConfig;
use crate::ecs::EntityAllocator;
use crate::foundation::collections::ColliderHandle;
use crate::foundation::math::{Rect, Transform2D, Vec2};
use crate::physics::{
    Collider,
    ColliderTriggerHelper,
    CollisionLayers,
    Mover,
    PhysicsWorld,
    RaycastHit,
    TriggerEventKind,
    TriggerListener,
    TriggerListeners,
};
use approx::assert_relative_eq;

#[derive(Default)]
struct Counts {
    enters: usize,
    exits: usize,
}

struct CountingListener(Rc<RefCell<Counts>>);

impl TriggerListener for CountingListener {
    fn on_trigger_enter(&mut self, _other: ColliderHandle, _local: ColliderHandle) {
        self.0.borrow_mut().enters += 1;
    }

    fn on_trigger_exit(&mut self, _other: ColliderHandle, _local: ColliderHandle) {
        self.0.borrow_mut().exits += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::default();
        let first = world.add_collider(Collider::rectangle_at(entities.create(), 0.0, 0.0, 10.0, 10.0));
        let second = world.add_collider(Collider::rectangle_at(entities.create(), 5.0, 5.0, 10.0, 10.0));

        let result = world.collides_with_non_motion(first, second).unwrap().unwrap();
        assert_relative_eq!(result.min_translation.norm(), 5.0, epsilon = 1e-4);
        assert_eq!(result.collider, Some(second));
    }

    #[test]
    fn test_overlapping_circles() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::default();
        let first = world.add_collider(Collider::circle(entities.create(), 5.0));
        let second = world.add_collider(
            Collider::circle(entities.create(), 4.0)
                .with_transform(Transform2D::from_position(Vec2::new(8.0, 0.0))),
        );

        let result = world.collides_with_non_motion(first, second).unwrap().unwrap();
        assert_relative_eq!(result.min_translation.norm(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(result.min_translation.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(result.normal, Vec2::new(-1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_linecast_through_single_box() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::default();
        let handle = world.add_collider(Collider::rectangle(entities.create(), 10.0, 10.0));

        let start = Vec2::new(-100.0, 0.0);
        let end = Vec2::new(100.0, 0.0);

        let hit = world.linecast(start, end, CollisionLayers::ALL).unwrap();
        assert_eq!(hit.collider, Some(handle));
        assert_relative_eq!(hit.point, Vec2::new(-5.0, 0.0), epsilon = 1e-4);
        assert_relative_eq!(hit.distance, 95.0, epsilon = 1e-3);

        let mut hits = [RaycastHit::default(); 8];
        assert_eq!(world.linecast_all(start, end, &mut hits, CollisionLayers::ALL), 1);
    }

    #[test]
    fn test_trigger_enter_exit_over_six_frames() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::new(PhysicsConfig::default().with_cell_size(32.0)).unwrap();

        let zone = entities.create();
        world.add_collider(
            Collider::rectangle(zone, 20.0, 20.0)
                .with_trigger(true)
                .with_transform(Transform2D::from_position(Vec2::new(100.0, 0.0))),
        );

        let player = entities.create();
        world.set_entity_transform(player, Transform2D::from_position(Vec2::zeros()));
        world.add_collider(Collider::circle(player, 4.0));

        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut listeners = TriggerListeners::new();
        listeners.add(player, Box::new(CountingListener(Rc::clone(&counts))));

        let mut helper = ColliderTriggerHelper::new(player);
        // frames 1-5 overlapping while drifting inside the zone, 6 apart
        let path = [100.0, 101.0, 102.0, 101.0, 100.0, 200.0];
        let mut frames = Vec::new();

        for x in path {
            world.set_entity_transform(player, Transform2D::from_position(Vec2::new(x, 0.0)));
            let events = helper.update(&world, &mut listeners);
            frames.push(events.into_iter().map(|event| event.kind).collect::<Vec<_>>());
        }

        assert_eq!(frames[0], vec![TriggerEventKind::Enter]);
        assert!(frames[1..5].iter().all(Vec::is_empty));
        assert_eq!(frames[5], vec![TriggerEventKind::Exit]);
        assert_eq!(counts.borrow().enters, 1);
        assert_eq!(counts.borrow().exits, 1);
    }

    #[test]
    fn test_mover_slides_along_floor() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::new(PhysicsConfig::default().with_cell_size(50.0)).unwrap();
        world.add_collider(Collider::rectangle_at(entities.create(), -100.0, 10.0, 200.0, 20.0));

        let player = entities.create();
        world.set_entity_transform(player, Transform2D::from_position(Vec2::new(0.0, 4.0)));
        world.add_collider(Collider::rectangle(player, 10.0, 10.0));

        let mut mover = Mover::new(player);
        let mut listeners = TriggerListeners::new();
        let step = world.gravity() * 0.05 + Vec2::new(3.0, 0.0);
        let (collision, applied) = mover.move_by(&mut world, &mut listeners, step);

        assert!(collision.is_some());
        assert_relative_eq!(applied, Vec2::new(3.0, 1.0), epsilon = 1e-4);
        assert_relative_eq!(
            world.entity_transform(player).unwrap().position,
            Vec2::new(3.0, 5.0),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_overlap_queries_respect_layers() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::default();
        let enemy = world.add_collider(
            Collider::circle(entities.create(), 6.0).with_physics_layer(CollisionLayers::ENEMY),
        );
        world.add_collider(Collider::circle(entities.create(), 6.0).with_physics_layer(CollisionLayers::PICKUP));

        let area = Rect::new(-2.0, -2.0, 4.0, 4.0);
        assert_eq!(world.overlap_rectangle(&area, CollisionLayers::ENEMY), Some(enemy));

        let mut results = [ColliderHandle::default(); 4];
        assert_eq!(world.overlap_rectangle_all(&area, &mut results, CollisionLayers::ALL), 2);
        assert_eq!(world.overlap_circle(Vec2::new(20.0, 0.0), 3.0, CollisionLayers::ALL), None);
    }
}
