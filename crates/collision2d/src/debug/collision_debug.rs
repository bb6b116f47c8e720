//! Collision-specific debug visualization
//!
//! Turns colliders, their bounds, the occupied spatial hash cells and
//! query results into [`DebugShape`]s.

use crate::debug::draw::{DebugDrawSystem, DebugShape};
use crate::foundation::math::{utils, Vec2, Vec4};
use crate::physics::collision::{CollisionResult, RaycastHit, Shape};
use crate::physics::PhysicsWorld;

/// Segments used to draw a sector arc
const ARC_SEGMENTS: usize = 16;

/// Color scheme for collision visualization
#[derive(Clone, Debug)]
pub struct CollisionDebugColors {
    /// Solid collider outlines
    pub collider: Vec4,

    /// Trigger collider outlines
    pub trigger: Vec4,

    /// Disabled collider outlines
    pub disabled: Vec4,

    /// Collider bounds
    pub bounds: Vec4,

    /// Occupied spatial hash cells
    pub grid: Vec4,

    /// Linecast segments and hit markers
    pub raycast: Vec4,

    /// Contact points and translation vectors
    pub contact: Vec4,
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            collider: Vec4::new(0.0, 1.0, 0.0, 1.0),    // Green
            trigger: Vec4::new(1.0, 0.8, 0.0, 1.0),     // Amber
            disabled: Vec4::new(0.5, 0.5, 0.5, 0.5),    // Grey, semi-transparent
            bounds: Vec4::new(0.5, 0.8, 1.0, 0.4),      // Light blue
            grid: Vec4::new(1.0, 1.0, 1.0, 0.15),       // White, faint
            raycast: Vec4::new(1.0, 0.0, 1.0, 1.0),     // Magenta
            contact: Vec4::new(1.0, 0.0, 0.0, 1.0),     // Red
        }
    }
}

/// Collision-specific debug visualizer
///
/// Wraps a [`DebugDrawSystem`]; everything drawn through the visualizer
/// lives for one frame unless a duration is given.
pub struct CollisionDebugVisualizer {
    debug_draw: DebugDrawSystem,
    colors: CollisionDebugColors,

    /// Show collider outlines
    pub show_shapes: bool,

    /// Show collider bounds
    pub show_bounds: bool,

    /// Show occupied spatial hash cells
    pub show_grid: bool,
}

impl CollisionDebugVisualizer {
    /// Create a new collision debug visualizer
    pub fn new() -> Self {
        Self {
            debug_draw: DebugDrawSystem::new(),
            colors: CollisionDebugColors::default(),
            show_shapes: true,
            show_bounds: false,
            show_grid: false,
        }
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Draw every collider of the world, plus bounds and grid cells if enabled
    pub fn draw_world(&mut self, world: &PhysicsWorld) {
        if self.show_grid {
            let hash = world.spatial_hash();
            for (cell, _) in hash.cells() {
                self.debug_draw.draw_rect(hash.cell_rect(cell), self.colors.grid, 0.0);
            }
        }

        for (_, collider) in world.colliders() {
            if self.show_shapes {
                let color = if !collider.is_enabled() {
                    self.colors.disabled
                } else if collider.is_trigger {
                    self.colors.trigger
                } else {
                    self.colors.collider
                };
                self.draw_shape(collider.shape(), color, 0.0);
            }

            if self.show_bounds {
                self.debug_draw.draw_rect(collider.cached_bounds(), self.colors.bounds, 0.0);
            }
        }
    }

    /// Draw the outline of one shape
    pub fn draw_shape(&mut self, shape: &Shape, color: Vec4, duration: f32) {
        match shape {
            Shape::Circle(circle) => {
                self.debug_draw.draw_circle(circle.position, circle.radius, color, duration);
            }
            Shape::Box(shape) => {
                self.debug_draw.draw_polygon(shape.polygon.world_points().collect(), color, duration);
            }
            Shape::Polygon(polygon) => {
                self.debug_draw.draw_polygon(polygon.world_points().collect(), color, duration);
            }
            Shape::Sector(sector) => {
                let mut points = Vec::with_capacity(ARC_SEGMENTS + 2);
                if !sector.is_full_circle() {
                    points.push(sector.position);
                }
                for step in 0..=ARC_SEGMENTS {
                    let angle = sector.start_angle + sector.span * step as f32 / ARC_SEGMENTS as f32;
                    points.push(sector.position + utils::angle_to_vector(angle) * sector.radius);
                }
                self.debug_draw.draw_polygon(points, color, duration);
            }
        }
    }

    /// Draw a linecast segment and a marker plus normal for each hit
    pub fn draw_linecast(&mut self, start: Vec2, end: Vec2, hits: &[RaycastHit], duration: f32) {
        self.debug_draw.draw_line(start, end, self.colors.raycast, duration);

        for hit in hits {
            self.debug_draw.draw_point(hit.point, self.colors.raycast, 4.0, duration);
            self.debug_draw.draw_line(hit.point, hit.point + hit.normal * 8.0, self.colors.raycast, duration);
        }
    }

    /// Draw a contact point and its minimum translation
    pub fn draw_collision(&mut self, result: &CollisionResult, duration: f32) {
        self.debug_draw.draw_point(result.point, self.colors.contact, 4.0, duration);
        self.debug_draw.draw_line(
            result.point,
            result.point - result.min_translation,
            self.colors.contact,
            duration,
        );
    }

    /// Clear all visualization
    pub fn clear(&mut self) {
        self.debug_draw.clear();
    }

    /// Update debug system (expire temporary shapes)
    pub fn update(&mut self, delta_time: f32) {
        self.debug_draw.update(delta_time);
    }

    /// Get all debug shapes for rendering
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        self.debug_draw.get_shapes()
    }

    /// Enable/disable the entire debug system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.debug_draw.enabled = enabled;
    }

    /// Check if debug system is enabled
    pub fn is_enabled(&self) -> bool {
        self.debug_draw.enabled
    }

    /// Get reference to underlying debug draw system
    pub fn debug_draw(&self) -> &DebugDrawSystem {
        &self.debug_draw
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new()
    }
}
