//! Move-and-depenetrate helper
//!
//! A mover owns an entity's trigger tracking. Moving takes the requested
//! motion, removes every penetration against solid neighbours from it,
//! applies what is left to the entity transform and then runs the trigger
//! helper so enter/exit events fire for the new position.

use crate::ecs::Entity;
use crate::foundation::math::{Transform2D, Vec2};
use crate::physics::collision::CollisionResult;
use crate::physics::physics_world::PhysicsWorld;
use crate::physics::trigger_helper::{ColliderTriggerHelper, TriggerEvent, TriggerListeners};

/// Moves an entity while keeping its solid colliders out of other solids
#[derive(Debug)]
pub struct Mover {
    entity: Entity,
    trigger_helper: ColliderTriggerHelper,
    /// Push out of sloped surfaces vertically instead of along their normal
    pub slope_handling: bool,
}

impl Mover {
    /// Create a mover for `entity`
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            trigger_helper: ColliderTriggerHelper::new(entity),
            slope_handling: false,
        }
    }

    /// Enable or disable vertical slope response
    pub fn with_slope_handling(mut self, enabled: bool) -> Self {
        self.slope_handling = enabled;
        self
    }

    /// Entity being moved
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Adjust `motion` so that none of the entity's solid colliders end up
    /// inside a solid neighbour. Returns the first collision found.
    ///
    /// Triggers are skipped on both sides, and so are other colliders of
    /// the same entity. With slope handling on, a mover standing on a
    /// slope is pushed straight up so it does not slide down it.
    pub fn calculate_movement(&self, world: &PhysicsWorld, motion: &mut Vec2) -> Option<CollisionResult> {
        let mut first_collision = None;

        for &handle in world.colliders_of(self.entity) {
            let Some(collider) = world.collider(handle) else {
                continue;
            };
            if collider.is_trigger || !collider.is_enabled() {
                continue;
            }

            let swept = collider.cached_bounds().swept(*motion);
            for neighbor_handle in world.sorted_neighbors(handle, &swept, collider.collides_with_layers) {
                let Some(neighbor) = world.collider(neighbor_handle) else {
                    continue;
                };
                if neighbor.is_trigger || neighbor.entity() == self.entity {
                    continue;
                }

                if let Some(mut result) = collider.collides_with(neighbor, *motion) {
                    if self.slope_handling {
                        result.remove_horizontal_translation(*motion);
                    }
                    *motion -= result.min_translation;
                    first_collision.get_or_insert(result.with_collider(neighbor_handle));
                }
            }
        }

        first_collision
    }

    /// Move the entity by `motion` and update trigger state
    pub fn apply_movement(
        &mut self,
        world: &mut PhysicsWorld,
        listeners: &mut TriggerListeners,
        motion: Vec2,
    ) -> Vec<TriggerEvent> {
        let mut transform = self.current_transform(world);
        transform.position += motion;
        world.set_entity_transform(self.entity, transform);

        self.trigger_helper.update(world, listeners)
    }

    /// Calculate and apply movement in one step. Returns the first
    /// collision and the motion that was actually applied.
    pub fn move_by(
        &mut self,
        world: &mut PhysicsWorld,
        listeners: &mut TriggerListeners,
        motion: Vec2,
    ) -> (Option<CollisionResult>, Vec2) {
        let mut motion = motion;
        let collision = self.calculate_movement(world, &mut motion);
        self.apply_movement(world, listeners, motion);
        (collision, motion)
    }

    fn current_transform(&self, world: &PhysicsWorld) -> Transform2D {
        world
            .entity_transform(self.entity)
            .or_else(|| {
                world
                    .colliders_of(self.entity)
                    .first()
                    .and_then(|&handle| world.collider(handle))
                    .map(|collider| *collider.transform())
            })
            .unwrap_or_default()
    }
}
