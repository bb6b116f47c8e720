//! # Physics Configuration
//!
//! Settings that shape a [`crate::physics::PhysicsWorld`]: the spatial hash
//! cell size, the gravity constant handed to movement code, the default layer
//! mask, and the raycast policy flags.
//!
//! Supports the same file formats as every other config (TOML, RON).

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec2;
use crate::physics::collision_layers::CollisionLayers;

/// # Physics World Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Edge length of one spatial hash cell, in world units
    pub spatial_hash_cell_size: f32,
    /// Gravity constant exposed to movement code
    pub gravity: [f32; 2],
    /// Layer mask used by queries that do not pass one explicitly
    pub default_layer_mask: u32,
    /// Whether linecasts report trigger colliders
    pub raycasts_hit_triggers: bool,
    /// Whether linecasts report colliders containing the ray start
    pub raycasts_start_in_colliders: bool,
}

impl PhysicsConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            spatial_hash_cell_size: 100.0,
            gravity: [0.0, 300.0],
            default_layer_mask: CollisionLayers::ALL,
            raycasts_hit_triggers: false,
            raycasts_start_in_colliders: false,
        }
    }

    /// Set the spatial hash cell size
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.spatial_hash_cell_size = cell_size;
        self
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = [gravity.x, gravity.y];
        self
    }

    /// Set the mask used by queries that do not pass one
    pub fn with_default_layer_mask(mut self, layer_mask: u32) -> Self {
        self.default_layer_mask = layer_mask;
        self
    }

    /// Let linecasts report triggers
    pub fn with_raycasts_hit_triggers(mut self, enabled: bool) -> Self {
        self.raycasts_hit_triggers = enabled;
        self
    }

    /// Let linecasts report colliders containing the ray start
    pub fn with_raycasts_start_in_colliders(mut self, enabled: bool) -> Self {
        self.raycasts_start_in_colliders = enabled;
        self
    }

    /// Gravity as a vector
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity[0], self.gravity[1])
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.spatial_hash_cell_size.is_finite() || self.spatial_hash_cell_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "spatial hash cell size must be positive, got {}",
                self.spatial_hash_cell_size
            )));
        }

        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }

        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for PhysicsConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spatial_hash_cell_size, 100.0);
        assert_eq!(config.gravity(), Vec2::new(0.0, 300.0));
    }

    #[test]
    fn test_rejects_non_positive_cell_size() {
        let config = PhysicsConfig::default().with_cell_size(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let text = "spatial_hash_cell_size = 32.0\nraycasts_hit_triggers = true\n";
        let config = PhysicsConfig::from_str_with_format(text, "physics.toml").unwrap();

        assert_eq!(config.spatial_hash_cell_size, 32.0);
        assert!(config.raycasts_hit_triggers);
        assert_eq!(config.default_layer_mask, CollisionLayers::ALL);
    }

    #[test]
    fn test_parse_ron() {
        let text = "(spatial_hash_cell_size: 64.0, gravity: (0.0, 10.0))";
        let config = PhysicsConfig::from_str_with_format(text, "physics.ron").unwrap();

        assert_eq!(config.spatial_hash_cell_size, 64.0);
        assert_eq!(config.gravity(), Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = PhysicsConfig::from_str_with_format("", "physics.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
