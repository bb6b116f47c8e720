//! Entity implementation

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Entity identifier (index + generation)
    pub struct Entity;
}

/// Minimal entity allocator.
///
/// The scene layer normally mints entities; this allocator is what tools and
/// tests use when there is no scene around.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    entities: SlotMap<Entity, ()>,
}

impl EntityAllocator {
    /// Create an empty allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity
    pub fn create(&mut self) -> Entity {
        self.entities.insert(())
    }

    /// Destroy an entity; returns false if it was already gone
    pub fn destroy(&mut self, entity: Entity) -> bool {
        self.entities.remove(entity).is_some()
    }

    /// Check whether an entity handle is still alive
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is alive
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
