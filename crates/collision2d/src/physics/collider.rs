//! Collider component
//!
//! A collider attaches exactly one [`Shape`] to an entity. It keeps a copy
//! of the last entity transform it was told about, so bounds can be
//! recalculated lazily when the transform changes, and remembers the bounds
//! it was registered under so the spatial hash can later remove it from
//! exactly those cells.

use bitflags::bitflags;

use crate::ecs::Entity;
use crate::foundation::math::{Rect, Transform2D, Vec2};
use crate::physics::collision::{
    BoxShape, Circle, CollisionResult, Polygon, Sector, Shape, ShapeTransform,
};
use crate::physics::collision_layers::CollisionLayers;

bitflags! {
    /// Parts of the placement that changed since bounds were last recalculated
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DirtyFlags: u8 {
        /// Entity position changed
        const POSITION = 1 << 0;
        /// Entity rotation changed
        const ROTATION = 1 << 1;
        /// Entity scale changed
        const SCALE = 1 << 2;
        /// Local offset or shape geometry changed
        const SHAPE = 1 << 3;
    }
}

/// Collider attached to an entity
#[derive(Debug, Clone)]
pub struct Collider {
    shape: Shape,
    entity: Entity,
    transform: Transform2D,
    local_offset: Vec2,

    /// Single-bit layer this collider lives on
    pub physics_layer: u32,

    /// Layers this collider collides with
    pub collides_with_layers: u32,

    /// Triggers report overlaps but never push anything
    pub is_trigger: bool,

    /// Tie breaker for line cast hits at the same distance (lower wins)
    pub cast_sort_order: i32,

    /// Whether the shape follows the entity's scale and rotation
    pub should_scale_and_rotate_with_transform: bool,

    enabled: bool,
    dirty: DirtyFlags,
    registered_physics_bounds: Rect,
    is_registered: bool,
}

impl Collider {
    /// Create a collider for `entity` with the given shape
    pub fn new(entity: Entity, shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            entity,
            transform: Transform2D::identity(),
            local_offset: Vec2::zeros(),
            physics_layer: CollisionLayers::DEFAULT,
            collides_with_layers: CollisionLayers::ALL,
            is_trigger: false,
            cast_sort_order: 0,
            should_scale_and_rotate_with_transform: true,
            enabled: true,
            dirty: DirtyFlags::all(),
            registered_physics_bounds: Rect::default(),
            is_registered: false,
        }
    }

    /// Circle collider centered on the entity
    pub fn circle(entity: Entity, radius: f32) -> Self {
        Self::new(entity, Circle::new(radius))
    }

    /// Box collider centered on the entity
    pub fn rectangle(entity: Entity, width: f32, height: f32) -> Self {
        Self::new(entity, BoxShape::new(width, height))
    }

    /// Box collider whose top-left corner sits at `(x, y)` relative to the entity
    pub fn rectangle_at(entity: Entity, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::rectangle(entity, width, height)
            .with_local_offset(Vec2::new(x + width * 0.5, y + height * 0.5))
    }

    /// Polygon collider from points relative to the entity.
    ///
    /// The points are recentered on their centroid, which becomes the local
    /// offset. A closing point equal to the first one is dropped.
    pub fn polygon(entity: Entity, mut points: Vec<Vec2>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        let center = Polygon::recenter_polygon_points(&mut points);
        Self::new(entity, Polygon::new(points)).with_local_offset(center)
    }

    /// Sector collider with its apex on the entity
    pub fn sector(entity: Entity, radius: f32, start_angle: f32, span: f32) -> Self {
        Self::new(entity, Sector::new(radius, start_angle, span))
    }

    /// Set the offset from the entity origin
    pub fn with_local_offset(mut self, offset: Vec2) -> Self {
        self.set_local_offset(offset);
        self
    }

    /// Set the physics layer
    pub fn with_physics_layer(mut self, layer: u32) -> Self {
        self.physics_layer = layer;
        self
    }

    /// Set the collides-with mask
    pub fn with_collides_with_layers(mut self, mask: u32) -> Self {
        self.collides_with_layers = mask;
        self
    }

    /// Mark the collider as a trigger
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    /// Set the line cast tie breaker
    pub fn with_cast_sort_order(mut self, order: i32) -> Self {
        self.cast_sort_order = order;
        self
    }

    /// Choose whether the shape follows entity scale and rotation
    pub fn with_scale_and_rotate(mut self, enabled: bool) -> Self {
        self.should_scale_and_rotate_with_transform = enabled;
        self.dirty |= DirtyFlags::SHAPE;
        self
    }

    /// Set the entity transform the collider starts from
    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.set_transform(transform);
        self
    }

    /// Start disabled
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Owning entity
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// The collider's shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mutable access to the shape; bounds are recalculated on next read
    pub fn shape_mut(&mut self) -> &mut Shape {
        self.dirty |= DirtyFlags::SHAPE;
        &mut self.shape
    }

    /// Last entity transform seen
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// Offset from the entity origin
    pub fn local_offset(&self) -> Vec2 {
        self.local_offset
    }

    /// Change the offset from the entity origin
    pub fn set_local_offset(&mut self, offset: Vec2) {
        if self.local_offset != offset {
            self.local_offset = offset;
            self.dirty |= DirtyFlags::SHAPE;
        }
    }

    /// Whether the collider takes part in queries
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the collider is currently in a spatial hash
    pub fn is_registered(&self) -> bool {
        self.is_registered
    }

    /// Bounds the collider was last registered under
    pub fn registered_physics_bounds(&self) -> Rect {
        self.registered_physics_bounds
    }

    pub(crate) fn mark_registered(&mut self, bounds: Rect) {
        self.registered_physics_bounds = bounds;
        self.is_registered = true;
    }

    pub(crate) fn mark_unregistered(&mut self) {
        self.is_registered = false;
    }

    /// Pending transform changes
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Record a new entity transform; only changed parts are marked dirty
    pub fn set_transform(&mut self, transform: Transform2D) {
        if transform.position != self.transform.position {
            self.dirty |= DirtyFlags::POSITION;
        }
        if transform.rotation != self.transform.rotation {
            self.dirty |= DirtyFlags::ROTATION;
        }
        if transform.scale != self.transform.scale {
            self.dirty |= DirtyFlags::SCALE;
        }
        self.transform = transform;
    }

    /// Placement data handed to the shape
    pub fn shape_transform(&self) -> ShapeTransform {
        ShapeTransform::new(
            self.transform,
            self.local_offset,
            self.should_scale_and_rotate_with_transform,
        )
    }

    /// Recompute the shape placement now
    pub fn recalculate_bounds(&mut self) {
        let transform = self.shape_transform();
        self.shape.recalculate_bounds(&transform);
        self.dirty = DirtyFlags::empty();
    }

    /// World bounds, recalculated first if the transform changed
    pub fn bounds(&mut self) -> Rect {
        if !self.dirty.is_empty() {
            self.recalculate_bounds();
        }
        self.shape.bounds()
    }

    /// World bounds as of the last recalculation
    pub fn cached_bounds(&self) -> Rect {
        self.shape.bounds()
    }

    /// World position of the shape
    pub fn absolute_position(&self) -> Vec2 {
        self.shape.position()
    }

    /// Boolean overlap with another collider
    pub fn overlaps(&self, other: &Collider) -> bool {
        self.shape.overlaps(&other.shape)
    }

    /// Test this collider moved by `motion` against `other`.
    ///
    /// Both shapes must be recalculated for their current transforms.
    pub fn collides_with(&self, other: &Collider, motion: Vec2) -> Option<CollisionResult> {
        self.shape.translated(motion).collides_with_shape(&other.shape)
    }

    /// Test this collider where it stands against `other`
    pub fn collides_with_non_motion(&self, other: &Collider) -> Option<CollisionResult> {
        self.shape.collides_with_shape(&other.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityAllocator;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_at_offsets_to_center() {
        let mut entities = EntityAllocator::new();
        let mut collider = Collider::rectangle_at(entities.create(), 10.0, 20.0, 4.0, 6.0)
            .with_transform(Transform2D::from_position(Vec2::new(100.0, 100.0)));

        let bounds = collider.bounds();
        assert_relative_eq!(bounds.x, 110.0);
        assert_relative_eq!(bounds.y, 120.0);
        assert_relative_eq!(collider.absolute_position(), Vec2::new(112.0, 123.0));
    }

    #[test]
    fn test_polygon_recenters_points() {
        let mut entities = EntityAllocator::new();
        let mut collider = Collider::polygon(
            entities.create(),
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(0.0, 10.0),
                Vec2::new(0.0, 0.0),
            ],
        );

        assert_relative_eq!(collider.local_offset(), Vec2::new(5.0, 5.0));
        let Shape::Polygon(polygon) = collider.shape() else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.points().len(), 4);

        let bounds = collider.bounds();
        assert_relative_eq!(bounds.x, 0.0);
        assert_relative_eq!(bounds.width, 10.0);
    }

    #[test]
    fn test_bounds_are_lazy() {
        let mut entities = EntityAllocator::new();
        let mut collider = Collider::circle(entities.create(), 5.0);
        collider.bounds();
        assert!(collider.dirty_flags().is_empty());

        collider.set_transform(Transform2D::from_position(Vec2::new(50.0, 0.0)));
        assert_eq!(collider.dirty_flags(), DirtyFlags::POSITION);
        assert_relative_eq!(collider.cached_bounds().x, -5.0);

        assert_relative_eq!(collider.bounds().x, 45.0);
        assert!(collider.dirty_flags().is_empty());
    }

    #[test]
    fn test_collides_with_motion_leaves_shape_in_place() {
        let mut entities = EntityAllocator::new();
        let mut mover = Collider::circle(entities.create(), 5.0);
        let mut wall = Collider::rectangle(entities.create(), 10.0, 100.0)
            .with_transform(Transform2D::from_position(Vec2::new(20.0, 0.0)));
        mover.bounds();
        wall.bounds();

        assert!(mover.collides_with_non_motion(&wall).is_none());
        let result = mover.collides_with(&wall, Vec2::new(12.0, 0.0)).unwrap();

        // 12 - (15 - 5) = 2 units of penetration pushed back along -x
        assert_relative_eq!(result.min_translation, Vec2::new(2.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(mover.absolute_position(), Vec2::zeros());
    }
}
