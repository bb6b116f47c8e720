//! Trigger enter/exit tracking
//!
//! Each tick the helper re-scans the colliders of one entity, collects the
//! overlapping pairs that involve a trigger, and diffs them against the
//! previous tick. New pairs fire an enter on both sides, vanished pairs fire
//! an exit.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::ecs::Entity;
use crate::foundation::collections::{ColliderHandle, SecondaryMap};
use crate::physics::physics_world::PhysicsWorld;

/// Listeners at or above this sort order hear about a tick's events after
/// every other listener did
pub const LATE_SORT_ORDER: i32 = 1000;

/// Receives trigger events for the colliders of one entity
pub trait TriggerListener {
    /// `other` started overlapping `local`, one of this entity's colliders
    fn on_trigger_enter(&mut self, other: ColliderHandle, local: ColliderHandle);

    /// `other` stopped overlapping `local`
    fn on_trigger_exit(&mut self, other: ColliderHandle, local: ColliderHandle);

    /// Notification order; see [`LATE_SORT_ORDER`]
    fn sort_order(&self) -> i32 {
        0
    }
}

/// Trigger listeners per entity
#[derive(Default)]
pub struct TriggerListeners {
    listeners: SecondaryMap<Entity, Vec<Box<dyn TriggerListener>>>,
}

impl TriggerListeners {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener to an entity
    pub fn add(&mut self, entity: Entity, listener: Box<dyn TriggerListener>) {
        let Some(entry) = self.listeners.entry(entity) else {
            log::warn!("Trigger listener added for a stale entity {entity:?}");
            return;
        };

        let list = entry.or_default();
        list.push(listener);
        list.sort_by_key(|listener| listener.sort_order());
    }

    /// Drop every listener of an entity; returns how many there were
    pub fn remove_all(&mut self, entity: Entity) -> usize {
        self.listeners.remove(entity).map_or(0, |list| list.len())
    }

    /// Number of listeners attached to an entity
    pub fn count(&self, entity: Entity) -> usize {
        self.listeners.get(entity).map_or(0, Vec::len)
    }

    /// Deliver events in two passes: regular listeners first, then late ones
    pub fn dispatch(&mut self, events: &[TriggerEvent]) {
        for late in [false, true] {
            for event in events {
                for (entity, other, local) in event.recipients() {
                    let Some(list) = self.listeners.get_mut(entity) else {
                        continue;
                    };

                    for listener in list
                        .iter_mut()
                        .filter(|listener| (listener.sort_order() >= LATE_SORT_ORDER) == late)
                    {
                        match event.kind {
                            TriggerEventKind::Enter => listener.on_trigger_enter(other, local),
                            TriggerEventKind::Exit => listener.on_trigger_exit(other, local),
                        }
                    }
                }
            }
        }
    }
}

/// Two overlapping colliders.
///
/// Equality and hashing ignore the order, so `(a, b)` and `(b, a)` are the
/// same pair. `first` is the collider the pair was discovered from.
#[derive(Debug, Clone, Copy)]
pub struct Pair {
    /// Collider of the scanning entity
    pub first: ColliderHandle,
    /// Entity owning `first`
    pub first_entity: Entity,
    /// Overlapping neighbour
    pub second: ColliderHandle,
    /// Entity owning `second`
    pub second_entity: Entity,
}

impl Pair {
    /// Create a pair
    pub fn new(first: ColliderHandle, first_entity: Entity, second: ColliderHandle, second_entity: Entity) -> Self {
        Self { first, first_entity, second, second_entity }
    }

    fn ordered(&self) -> (ColliderHandle, ColliderHandle) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for Pair {}

impl Hash for Pair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

/// Whether a pair started or stopped overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEventKind {
    /// Pair appeared this tick
    Enter,
    /// Pair disappeared this tick
    Exit,
}

/// One trigger transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Enter or exit
    pub kind: TriggerEventKind,
    /// Colliders involved
    pub pair: Pair,
}

impl TriggerEvent {
    /// `(entity, other, local)` for both sides of the pair
    fn recipients(&self) -> [(Entity, ColliderHandle, ColliderHandle); 2] {
        let pair = &self.pair;
        [
            (pair.first_entity, pair.second, pair.first),
            (pair.second_entity, pair.first, pair.second),
        ]
    }
}

/// Per-entity trigger pair tracking
#[derive(Debug)]
pub struct ColliderTriggerHelper {
    entity: Entity,
    active_triggers: HashSet<Pair>,
    previous_triggers: HashSet<Pair>,
}

impl ColliderTriggerHelper {
    /// Track the colliders of `entity`
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            active_triggers: HashSet::new(),
            previous_triggers: HashSet::new(),
        }
    }

    /// Entity being tracked
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Pairs that were overlapping at the end of the last update
    pub fn tracked_pairs(&self) -> impl Iterator<Item = &Pair> {
        self.previous_triggers.iter()
    }

    /// Scan for trigger overlaps, notify listeners and return the events
    pub fn update(&mut self, world: &PhysicsWorld, listeners: &mut TriggerListeners) -> Vec<TriggerEvent> {
        let mut events = Vec::new();

        for &handle in world.colliders_of(self.entity) {
            let Some(collider) = world.collider(handle) else {
                continue;
            };
            if !collider.is_enabled() {
                continue;
            }

            let bounds = collider.cached_bounds();
            for neighbor_handle in world.sorted_neighbors(handle, &bounds, collider.collides_with_layers) {
                let Some(neighbor) = world.collider(neighbor_handle) else {
                    continue;
                };

                if !(collider.is_trigger || neighbor.is_trigger) || !collider.overlaps(neighbor) {
                    continue;
                }

                let pair = Pair::new(handle, self.entity, neighbor_handle, neighbor.entity());
                let is_new = !self.active_triggers.contains(&pair) && !self.previous_triggers.contains(&pair);
                if is_new {
                    events.push(TriggerEvent { kind: TriggerEventKind::Enter, pair });
                }
                self.active_triggers.insert(pair);
            }
        }

        let mut exited: Vec<Pair> = self
            .previous_triggers
            .difference(&self.active_triggers)
            .copied()
            .collect();
        exited.sort_unstable_by_key(Pair::ordered);
        events.extend(exited.into_iter().map(|pair| TriggerEvent { kind: TriggerEventKind::Exit, pair }));

        self.previous_triggers = std::mem::take(&mut self.active_triggers);

        if !events.is_empty() {
            log::trace!("Entity {:?} produced {} trigger events", self.entity, events.len());
        }

        listeners.dispatch(&events);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityAllocator;
    use crate::foundation::math::{Transform2D, Vec2};
    use crate::physics::collider::Collider;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        order: i32,
        log: Log,
    }

    impl TriggerListener for Recorder {
        fn on_trigger_enter(&mut self, _other: ColliderHandle, _local: ColliderHandle) {
            self.log.borrow_mut().push(format!("{} enter", self.name));
        }

        fn on_trigger_exit(&mut self, _other: ColliderHandle, _local: ColliderHandle) {
            self.log.borrow_mut().push(format!("{} exit", self.name));
        }

        fn sort_order(&self) -> i32 {
            self.order
        }
    }

    fn recorder(name: &'static str, order: i32, log: &Log) -> Box<dyn TriggerListener> {
        Box::new(Recorder { name, order, log: Rc::clone(log) })
    }

    #[test]
    fn test_pair_is_unordered() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::default();
        let (a, b) = (entities.create(), entities.create());
        let first = world.add_collider(Collider::circle(a, 1.0));
        let second = world.add_collider(Collider::circle(b, 1.0));

        let forward = Pair::new(first, a, second, b);
        let backward = Pair::new(second, b, first, a);
        assert_eq!(forward, backward);

        let set: HashSet<Pair> = [forward, backward].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_non_trigger_overlap_is_ignored() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::default();
        let player = entities.create();
        world.add_collider(Collider::circle(player, 5.0));
        world.add_collider(Collider::circle(entities.create(), 5.0));

        let mut helper = ColliderTriggerHelper::new(player);
        let events = helper.update(&world, &mut TriggerListeners::new());
        assert!(events.is_empty());
    }

    #[test]
    fn test_enter_steady_exit() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::default();
        let player = entities.create();
        let zone = entities.create();
        world.add_collider(Collider::circle(player, 2.0));
        world.add_collider(Collider::circle(zone, 5.0).with_trigger(true));

        let log: Log = Rc::default();
        let mut listeners = TriggerListeners::new();
        listeners.add(player, recorder("player", 0, &log));
        listeners.add(zone, recorder("zone", 0, &log));

        let mut helper = ColliderTriggerHelper::new(player);

        let events = helper.update(&world, &mut listeners);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, TriggerEventKind::Enter);
        assert_eq!(*log.borrow(), vec!["player enter", "zone enter"]);

        assert!(helper.update(&world, &mut listeners).is_empty());
        assert_eq!(helper.tracked_pairs().count(), 1);

        world.set_entity_transform(player, Transform2D::from_position(Vec2::new(50.0, 0.0)));
        let events = helper.update(&world, &mut listeners);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, TriggerEventKind::Exit);
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(helper.tracked_pairs().count(), 0);
    }

    #[test]
    fn test_late_listeners_run_after_regular_ones() {
        let mut entities = EntityAllocator::new();
        let mut world = PhysicsWorld::default();
        let player = entities.create();
        let zone = entities.create();
        world.add_collider(Collider::circle(player, 2.0));
        world.add_collider(Collider::circle(zone, 5.0).with_trigger(true));

        let log: Log = Rc::default();
        let mut listeners = TriggerListeners::new();
        listeners.add(player, recorder("late player", LATE_SORT_ORDER, &log));
        listeners.add(player, recorder("player", 0, &log));
        listeners.add(zone, recorder("zone", 0, &log));
        assert_eq!(listeners.count(player), 2);

        ColliderTriggerHelper::new(player).update(&world, &mut listeners);

        assert_eq!(*log.borrow(), vec!["player enter", "zone enter", "late player enter"]);
        assert_eq!(listeners.remove_all(player), 2);
        assert_eq!(listeners.count(player), 0);
    }
}
