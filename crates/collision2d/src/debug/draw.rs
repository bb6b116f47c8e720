//! Debug drawing primitives and system
//!
//! Shapes are plain data for whatever renderer sits on top. Temporary shapes
//! expire after their duration, persistent shapes stay until removed.

use crate::foundation::math::{Rect, Vec2, Vec4};
use std::collections::HashMap;

/// Unique identifier for persistent debug shapes
pub type DebugShapeId = String;

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        start: Vec2,
        end: Vec2,
        color: Vec4,
        duration: f32,
    },

    /// Circle outline at center with radius
    Circle {
        center: Vec2,
        radius: f32,
        color: Vec4,
        duration: f32,
    },

    /// Axis-aligned rectangle outline
    Rect {
        rect: Rect,
        color: Vec4,
        duration: f32,
    },

    /// Closed outline through world-space points
    Polygon {
        points: Vec<Vec2>,
        color: Vec4,
        duration: f32,
    },

    /// Point at position
    Point {
        position: Vec2,
        color: Vec4,
        size: f32,
        duration: f32,
    },
}

impl DebugShape {
    fn duration_mut(&mut self) -> &mut f32 {
        match self {
            DebugShape::Line { duration, .. }
            | DebugShape::Circle { duration, .. }
            | DebugShape::Rect { duration, .. }
            | DebugShape::Polygon { duration, .. }
            | DebugShape::Point { duration, .. } => duration,
        }
    }

    /// Get remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::Line { duration, .. }
            | DebugShape::Circle { duration, .. }
            | DebugShape::Rect { duration, .. }
            | DebugShape::Polygon { duration, .. }
            | DebugShape::Point { duration, .. } => *duration,
        }
    }

    /// Set duration (returns modified shape)
    pub fn with_duration(mut self, new_duration: f32) -> Self {
        *self.duration_mut() = new_duration;
        self
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let duration = self.duration_mut();
        *duration -= delta_time;
        *duration <= 0.0
    }
}

/// Debug drawing system collecting shapes for a renderer
pub struct DebugDrawSystem {
    /// Temporary shapes that expire after their duration
    temporary_shapes: Vec<DebugShape>,

    /// Persistent shapes that remain until manually removed
    persistent_shapes: HashMap<DebugShapeId, DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            enabled: true,
        }
    }

    /// Queue a temporary shape
    pub fn draw(&mut self, shape: DebugShape) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.push(shape);
    }

    /// Draw a line segment (temporary)
    pub fn draw_line(&mut self, start: Vec2, end: Vec2, color: Vec4, duration: f32) {
        self.draw(DebugShape::Line { start, end, color, duration });
    }

    /// Draw a circle (temporary)
    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Vec4, duration: f32) {
        self.draw(DebugShape::Circle { center, radius, color, duration });
    }

    /// Draw a rectangle (temporary)
    pub fn draw_rect(&mut self, rect: Rect, color: Vec4, duration: f32) {
        self.draw(DebugShape::Rect { rect, color, duration });
    }

    /// Draw a closed polygon outline (temporary)
    pub fn draw_polygon(&mut self, points: Vec<Vec2>, color: Vec4, duration: f32) {
        self.draw(DebugShape::Polygon { points, color, duration });
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec2, color: Vec4, size: f32, duration: f32) {
        self.draw(DebugShape::Point { position, color, size, duration });
    }

    /// Draw a persistent shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if !self.enabled {
            return;
        }

        self.persistent_shapes.insert(id.into(), shape);
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent_shapes.remove(id);
    }

    /// Clear all persistent shapes
    pub fn clear_all_persistent(&mut self) {
        self.persistent_shapes.clear();
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }

        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Get all shapes for rendering (both temporary and persistent)
    pub fn get_shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }

        self.temporary_shapes.iter()
            .chain(self.persistent_shapes.values())
            .collect()
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Clear all shapes (temporary and persistent)
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_shape_expiration() {
        let mut system = DebugDrawSystem::new();

        system.draw_circle(Vec2::zeros(), 1.0, Vec4::new(1.0, 0.0, 0.0, 1.0), 1.0);
        assert_eq!(system.shape_count(), 1);

        system.update(0.5);
        assert_eq!(system.shape_count(), 1);

        // 1.1 seconds total
        system.update(0.6);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_persistent_shapes() {
        let mut system = DebugDrawSystem::new();

        system.draw_persistent(
            "grid_cell",
            DebugShape::Rect {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                color: Vec4::new(1.0, 1.0, 1.0, 1.0),
                duration: f32::INFINITY,
            },
        );
        assert_eq!(system.shape_count(), 1);

        for _ in 0..100 {
            system.update(1.0);
        }
        assert_eq!(system.shape_count(), 1);

        system.clear_persistent("grid_cell");
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_disabled_system_ignores_draws() {
        let mut system = DebugDrawSystem::new();
        system.enabled = false;

        system.draw_point(Vec2::zeros(), Vec4::new(1.0, 1.0, 1.0, 1.0), 2.0, 1.0);
        assert_eq!(system.shape_count(), 0);
        assert!(system.get_shapes().is_empty());

        let shape = DebugShape::Line {
            start: Vec2::zeros(),
            end: Vec2::new(1.0, 0.0),
            color: Vec4::zeros(),
            duration: 0.0,
        };
        assert_eq!(shape.with_duration(3.0).duration(), 3.0);
    }
}
