//! Collision layer system for filtering collision detection
//!
//! Every collider sits on a single physics layer (one bit) and carries a
//! mask of the layers it collides with. Queries take a layer mask and only
//! consider colliders whose layer bit is set in it.

/// Collision layer definitions as single-bit `u32` flags
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision layer
    pub const NONE: u32 = 0;

    /// All collision layers
    pub const ALL: u32 = u32::MAX;

    /// Layer every collider starts on
    pub const DEFAULT: u32 = 1 << 0;

    /// Player character layer
    pub const PLAYER: u32 = 1 << 1;

    /// Enemy character layer
    pub const ENEMY: u32 = 1 << 2;

    /// Projectiles (bullets, missiles, etc.)
    pub const PROJECTILE: u32 = 1 << 3;

    /// Static environment geometry
    pub const ENVIRONMENT: u32 = 1 << 4;

    /// Trigger volumes (no physical response)
    pub const TRIGGER: u32 = 1 << 5;

    /// Pickups and collectibles
    pub const PICKUP: u32 = 1 << 6;

    /// Layer flag for a zero-based layer index; indices past 31 map to no layer
    pub fn layer(index: u32) -> u32 {
        1_u32.checked_shl(index).unwrap_or(Self::NONE)
    }

    /// Check whether `layer` has any bit in common with `mask`
    pub fn is_flag_set(mask: u32, layer: u32) -> bool {
        (mask & layer) != 0
    }

    /// Check if two colliders should collide based on their layers and masks
    ///
    /// # Arguments
    /// * `layer_a` - Collider A's physics layer
    /// * `mask_a` - Collider A's collides-with mask
    /// * `layer_b` - Collider B's physics layer
    /// * `mask_b` - Collider B's collides-with mask
    ///
    /// # Example
    /// ```
    /// use collision2d::physics::CollisionLayers;
    ///
    /// let player_mask = CollisionLayers::ENEMY | CollisionLayers::ENVIRONMENT;
    /// let enemy_mask = CollisionLayers::PLAYER | CollisionLayers::PROJECTILE;
    ///
    /// assert!(CollisionLayers::should_collide(
    ///     CollisionLayers::PLAYER, player_mask,
    ///     CollisionLayers::ENEMY, enemy_mask,
    /// ));
    /// ```
    pub fn should_collide(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        Self::is_flag_set(mask_b, layer_a) && Self::is_flag_set(mask_a, layer_b)
    }

    /// Helper to create a mask from multiple layers
    ///
    /// # Example
    /// ```
    /// use collision2d::physics::CollisionLayers;
    ///
    /// let mask = CollisionLayers::mask(&[CollisionLayers::PLAYER, CollisionLayers::ENEMY]);
    /// assert_eq!(mask, CollisionLayers::PLAYER | CollisionLayers::ENEMY);
    /// ```
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(0, |acc, &layer| acc | layer)
    }
}
