//! Physics world
//!
//! The world owns every collider, the spatial hash they are registered in,
//! and the last transform pushed for each entity. It is an explicit context
//! object: whoever runs the simulation owns one and passes it by reference
//! to anything that needs spatial queries.
//!
//! The collision detection pipeline is the usual two phases: a broad-phase
//! grid lookup narrows the candidates, then the narrow-phase shape tests
//! produce the actual result.

use std::collections::HashSet;

use crate::core::config::PhysicsConfig;
use crate::ecs::Entity;
use crate::foundation::collections::{ColliderArena, ColliderHandle, SecondaryMap};
use crate::foundation::math::{Rect, Transform2D, Vec2};
use crate::physics::collider::Collider;
use crate::physics::collision::{CollisionResult, RaycastHit};
use crate::physics::error::PhysicsError;
use crate::spatial::{RaycastPolicy, SpatialHash};

/// Owner of all colliders and the broad-phase grid
pub struct PhysicsWorld {
    config: PhysicsConfig,
    colliders: ColliderArena<Collider>,
    entity_colliders: SecondaryMap<Entity, Vec<ColliderHandle>>,
    entity_transforms: SecondaryMap<Entity, Transform2D>,
    spatial_hash: SpatialHash,
}

impl PhysicsWorld {
    /// Create an empty world after validating `config`
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: PhysicsConfig) -> Self {
        let spatial_hash = SpatialHash::new(config.spatial_hash_cell_size);
        Self {
            config,
            colliders: ColliderArena::with_key(),
            entity_colliders: SecondaryMap::new(),
            entity_transforms: SecondaryMap::new(),
            spatial_hash,
        }
    }

    /// World configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Gravity constant for movement code
    pub fn gravity(&self) -> Vec2 {
        self.config.gravity()
    }

    /// The broad-phase grid
    pub fn spatial_hash(&self) -> &SpatialHash {
        &self.spatial_hash
    }

    /// Number of colliders in the world, registered or not
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Every collider with its handle
    pub fn colliders(&self) -> impl Iterator<Item = (ColliderHandle, &Collider)> {
        self.colliders.iter()
    }

    /// Look up a collider
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    fn get(&self, handle: ColliderHandle) -> Result<&Collider, PhysicsError> {
        self.colliders.get(handle).ok_or(PhysicsError::InvalidCollider(handle))
    }

    /// Colliders attached to an entity, in insertion order
    pub fn colliders_of(&self, entity: Entity) -> &[ColliderHandle] {
        self.entity_colliders.get(entity).map(Vec::as_slice).unwrap_or_default()
    }

    /// Last transform pushed for an entity
    pub fn entity_transform(&self, entity: Entity) -> Option<Transform2D> {
        self.entity_transforms.get(entity).copied()
    }

    /// Rebuild the spatial hash from scratch, re-registering every enabled
    /// collider under its current bounds
    pub fn reset(&mut self) {
        self.spatial_hash = SpatialHash::new(self.config.spatial_hash_cell_size);

        for (handle, collider) in &mut self.colliders {
            collider.mark_unregistered();
            if collider.is_enabled() {
                self.spatial_hash.register(handle, collider);
            }
        }

        log::debug!("Physics world reset with {} colliders", self.colliders.len());
    }

    /// Drop every collider and entity transform
    pub fn clear(&mut self) {
        self.spatial_hash.clear();
        self.colliders.clear();
        self.entity_colliders.clear();
        self.entity_transforms.clear();
    }

    /// Attach a collider to its entity and register it if enabled.
    ///
    /// If the entity already has a transform the collider is placed with it.
    pub fn add_collider(&mut self, mut collider: Collider) -> ColliderHandle {
        let entity = collider.entity();
        if let Some(transform) = self.entity_transforms.get(entity) {
            collider.set_transform(*transform);
        }
        collider.recalculate_bounds();

        let enabled = collider.is_enabled();
        let handle = self.colliders.insert(collider);

        match self.entity_colliders.entry(entity) {
            Some(entry) => entry.or_default().push(handle),
            None => log::warn!("Collider {handle:?} added for a stale entity {entity:?}"),
        }

        if enabled {
            self.spatial_hash.register(handle, &mut self.colliders[handle]);
        }

        log::debug!("Added collider {handle:?} for entity {entity:?}");
        handle
    }

    /// Detach a collider, unregistering it first
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> Result<Collider, PhysicsError> {
        let mut collider = self
            .colliders
            .remove(handle)
            .ok_or(PhysicsError::InvalidCollider(handle))?;

        if collider.is_registered() {
            self.spatial_hash.remove(handle, &mut collider);
        }

        let entity = collider.entity();
        if let Some(handles) = self.entity_colliders.get_mut(entity) {
            handles.retain(|&h| h != handle);
            if handles.is_empty() {
                self.entity_colliders.remove(entity);
            }
        }

        log::debug!("Removed collider {handle:?} from entity {entity:?}");
        Ok(collider)
    }

    /// Recalculate a collider's bounds and move it to the cells they cover
    pub fn update_collider(&mut self, handle: ColliderHandle) -> Result<(), PhysicsError> {
        let collider = self
            .colliders
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidCollider(handle))?;

        collider.recalculate_bounds();
        if collider.is_registered() {
            self.spatial_hash.update(handle, collider);
        } else if collider.is_enabled() {
            self.spatial_hash.register(handle, collider);
        }
        Ok(())
    }

    /// Enable or disable a collider; disabled colliders leave the grid
    pub fn set_collider_enabled(&mut self, handle: ColliderHandle, enabled: bool) -> Result<(), PhysicsError> {
        let collider = self
            .colliders
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidCollider(handle))?;

        if collider.is_enabled() == enabled {
            return Ok(());
        }
        collider.set_enabled(enabled);

        if enabled {
            collider.recalculate_bounds();
            self.spatial_hash.register(handle, collider);
        } else if collider.is_registered() {
            self.spatial_hash.remove(handle, collider);
        }
        Ok(())
    }

    /// Mutate a collider in place. Bounds and registration are refreshed
    /// afterwards if the change touched its placement or geometry.
    pub fn with_collider_mut<R>(
        &mut self,
        handle: ColliderHandle,
        f: impl FnOnce(&mut Collider) -> R,
    ) -> Result<R, PhysicsError> {
        let collider = self
            .colliders
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidCollider(handle))?;

        let result = f(collider);
        if !collider.dirty_flags().is_empty() {
            collider.recalculate_bounds();
            if collider.is_registered() {
                self.spatial_hash.update(handle, collider);
            }
        }
        Ok(result)
    }

    /// Push a new entity transform to every collider of the entity.
    ///
    /// Colliders whose placement changed are re-registered.
    pub fn set_entity_transform(&mut self, entity: Entity, transform: Transform2D) {
        self.entity_transforms.insert(entity, transform);

        let Some(handles) = self.entity_colliders.get(entity) else {
            return;
        };

        for &handle in handles {
            let Some(collider) = self.colliders.get_mut(handle) else {
                log::error!("Entity {entity:?} lists missing collider {handle:?}");
                continue;
            };

            collider.set_transform(transform);
            if collider.dirty_flags().is_empty() {
                continue;
            }

            collider.recalculate_bounds();
            if collider.is_registered() {
                self.spatial_hash.update(handle, collider);
            }
        }
    }

    fn raycast_policy(&self) -> RaycastPolicy {
        RaycastPolicy {
            hit_triggers: self.config.raycasts_hit_triggers,
            start_in_colliders: self.config.raycasts_start_in_colliders,
        }
    }

    /// Mask used by the `*_default` queries
    pub fn default_layer_mask(&self) -> u32 {
        self.config.default_layer_mask
    }

    /// Change the mask used by the `*_default` queries
    pub fn set_default_layer_mask(&mut self, layer_mask: u32) {
        self.config.default_layer_mask = layer_mask;
    }

    /// [`Self::overlap_circle`] with the default layer mask
    pub fn overlap_circle_default(&self, center: Vec2, radius: f32) -> Option<ColliderHandle> {
        self.overlap_circle(center, radius, self.default_layer_mask())
    }

    /// [`Self::overlap_rectangle`] with the default layer mask
    pub fn overlap_rectangle_default(&self, rect: &Rect) -> Option<ColliderHandle> {
        self.overlap_rectangle(rect, self.default_layer_mask())
    }

    /// [`Self::boxcast_broadphase`] with the default layer mask
    pub fn boxcast_broadphase_default(&self, rect: &Rect) -> HashSet<ColliderHandle> {
        self.boxcast_broadphase(rect, self.default_layer_mask())
    }

    /// [`Self::linecast`] with the default layer mask
    pub fn linecast_default(&self, start: Vec2, end: Vec2) -> Option<RaycastHit> {
        self.linecast(start, end, self.default_layer_mask())
    }

    /// First collider overlapping the circle
    pub fn overlap_circle(&self, center: Vec2, radius: f32, layer_mask: u32) -> Option<ColliderHandle> {
        let mut result = [ColliderHandle::default(); 1];
        let count = self.overlap_circle_all(center, radius, &mut result, layer_mask);
        (count > 0).then_some(result[0])
    }

    /// Colliders overlapping the circle, written into `results`
    pub fn overlap_circle_all(
        &self,
        center: Vec2,
        radius: f32,
        results: &mut [ColliderHandle],
        layer_mask: u32,
    ) -> usize {
        self.spatial_hash
            .overlap_circle(&self.colliders, center, radius, results, layer_mask)
    }

    /// First collider overlapping the rectangle
    pub fn overlap_rectangle(&self, rect: &Rect, layer_mask: u32) -> Option<ColliderHandle> {
        let mut result = [ColliderHandle::default(); 1];
        let count = self.overlap_rectangle_all(rect, &mut result, layer_mask);
        (count > 0).then_some(result[0])
    }

    /// Colliders overlapping the rectangle, written into `results`
    pub fn overlap_rectangle_all(&self, rect: &Rect, results: &mut [ColliderHandle], layer_mask: u32) -> usize {
        self.spatial_hash
            .overlap_rectangle(&self.colliders, rect, results, layer_mask)
    }

    /// Colliders whose bounds intersect `rect`
    pub fn boxcast_broadphase(&self, rect: &Rect, layer_mask: u32) -> HashSet<ColliderHandle> {
        self.spatial_hash
            .aabb_broadphase(&self.colliders, rect, None, layer_mask)
    }

    /// Colliders whose bounds intersect the collider's own bounds
    pub fn boxcast_broadphase_excluding_self(
        &self,
        handle: ColliderHandle,
        layer_mask: u32,
    ) -> Result<HashSet<ColliderHandle>, PhysicsError> {
        let bounds = self.get(handle)?.cached_bounds();
        Ok(self
            .spatial_hash
            .aabb_broadphase(&self.colliders, &bounds, Some(handle), layer_mask))
    }

    /// Colliders whose bounds intersect `rect`, leaving out `handle`
    pub fn boxcast_broadphase_excluding_self_rect(
        &self,
        handle: ColliderHandle,
        rect: &Rect,
        layer_mask: u32,
    ) -> Result<HashSet<ColliderHandle>, PhysicsError> {
        self.get(handle)?;
        Ok(self
            .spatial_hash
            .aabb_broadphase(&self.colliders, rect, Some(handle), layer_mask))
    }

    /// Colliders whose bounds intersect the collider's bounds swept by `motion`
    pub fn boxcast_broadphase_excluding_self_swept(
        &self,
        handle: ColliderHandle,
        motion: Vec2,
        layer_mask: u32,
    ) -> Result<HashSet<ColliderHandle>, PhysicsError> {
        let bounds = self.get(handle)?.cached_bounds().swept(motion);
        Ok(self
            .spatial_hash
            .aabb_broadphase(&self.colliders, &bounds, Some(handle), layer_mask))
    }

    /// Nearest hit along the segment
    pub fn linecast(&self, start: Vec2, end: Vec2, layer_mask: u32) -> Option<RaycastHit> {
        let mut hit = [RaycastHit::default(); 1];
        let count = self.linecast_all(start, end, &mut hit, layer_mask);
        (count > 0).then_some(hit[0])
    }

    /// Nearest hit along the segment, skipping `ignored` colliders
    pub fn linecast_ignoring(
        &self,
        start: Vec2,
        end: Vec2,
        layer_mask: u32,
        ignored: &HashSet<ColliderHandle>,
    ) -> Option<RaycastHit> {
        let mut hit = [RaycastHit::default(); 1];
        let count = self.spatial_hash.linecast(
            &self.colliders,
            start,
            end,
            &mut hit,
            layer_mask,
            Some(ignored),
            self.raycast_policy(),
        );
        (count > 0).then_some(hit[0])
    }

    /// Hits along the segment nearest first, written into `hits`
    pub fn linecast_all(&self, start: Vec2, end: Vec2, hits: &mut [RaycastHit], layer_mask: u32) -> usize {
        self.spatial_hash.linecast(
            &self.colliders,
            start,
            end,
            hits,
            layer_mask,
            None,
            self.raycast_policy(),
        )
    }

    /// Boolean overlap between two colliders
    pub fn overlaps(&self, first: ColliderHandle, second: ColliderHandle) -> Result<bool, PhysicsError> {
        Ok(self.get(first)?.overlaps(self.get(second)?))
    }

    /// Test `first` moved by `motion` against `second`
    pub fn collides_with(
        &self,
        first: ColliderHandle,
        second: ColliderHandle,
        motion: Vec2,
    ) -> Result<Option<CollisionResult>, PhysicsError> {
        let result = self.get(first)?.collides_with(self.get(second)?, motion);
        Ok(result.map(|r| r.with_collider(second)))
    }

    /// Test `first` where it stands against `second`
    pub fn collides_with_non_motion(
        &self,
        first: ColliderHandle,
        second: ColliderHandle,
    ) -> Result<Option<CollisionResult>, PhysicsError> {
        let result = self.get(first)?.collides_with_non_motion(self.get(second)?);
        Ok(result.map(|r| r.with_collider(second)))
    }

    /// Move the collider by `motion` against every non-trigger neighbour it
    /// collides with, taking each minimum translation off `motion`.
    ///
    /// Returns the first collision found. Neighbours are visited in handle
    /// order so the outcome does not depend on hash iteration.
    pub fn collides_with_any(
        &self,
        handle: ColliderHandle,
        motion: &mut Vec2,
    ) -> Result<Option<CollisionResult>, PhysicsError> {
        let collider = self.get(handle)?;
        let swept = collider.cached_bounds().swept(*motion);
        let neighbors = self.sorted_neighbors(handle, &swept, collider.collides_with_layers);

        let mut first_collision = None;
        for neighbor_handle in neighbors {
            let neighbor = &self.colliders[neighbor_handle];
            if neighbor.is_trigger {
                continue;
            }

            if let Some(result) = collider.collides_with(neighbor, *motion) {
                *motion -= result.min_translation;
                first_collision.get_or_insert(result.with_collider(neighbor_handle));
            }
        }

        Ok(first_collision)
    }

    /// First non-trigger neighbour the collider collides with where it stands
    pub fn collides_with_any_non_motion(
        &self,
        handle: ColliderHandle,
    ) -> Result<Option<CollisionResult>, PhysicsError> {
        let collider = self.get(handle)?;
        let bounds = collider.cached_bounds();

        Ok(self
            .sorted_neighbors(handle, &bounds, collider.collides_with_layers)
            .into_iter()
            .filter(|&h| !self.colliders[h].is_trigger)
            .find_map(|h| {
                collider
                    .collides_with_non_motion(&self.colliders[h])
                    .map(|r| r.with_collider(h))
            }))
    }

    pub(crate) fn sorted_neighbors(
        &self,
        handle: ColliderHandle,
        bounds: &Rect,
        layer_mask: u32,
    ) -> Vec<ColliderHandle> {
        let mut neighbors: Vec<ColliderHandle> = self
            .spatial_hash
            .aabb_broadphase(&self.colliders, bounds, Some(handle), layer_mask)
            .into_iter()
            .collect();
        neighbors.sort_unstable();
        neighbors
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::with_valid_config(PhysicsConfig::default())
    }
}
