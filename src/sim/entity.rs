//! Entity records and the store that owns them

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Collectible flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Plain score bonus
    Star,
    /// Race speed boost
    Boost,
}

/// What an entity is, which decides its collision outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    /// Pursuer (wolf, guard, hare)
    Antagonist,
    /// Ground obstacle - jump over it
    ObstacleLow,
    /// Overhead obstacle - slide under it
    ObstacleHigh,
    Pickup(PickupKind),
    /// Reaching it wins the session
    Goal,
}

impl EntityKind {
    /// Whether world scroll moves this entity
    pub fn scrolls(&self) -> bool {
        matches!(
            self,
            EntityKind::ObstacleLow
                | EntityKind::ObstacleHigh
                | EntityKind::Pickup(_)
                | EntityKind::Goal
        )
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, EntityKind::ObstacleLow | EntityKind::ObstacleHigh)
    }
}

/// A live entity in the field
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    /// Scrolled behind the player without contact (scored once)
    pub passed: bool,
    /// Already caused a stumble (penalized once)
    pub hit: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, rect: Rect) -> Self {
        Self {
            id,
            kind,
            rect,
            vx: 0.0,
            vy: 0.0,
            passed: false,
            hit: false,
        }
    }
}

/// Owns every non-player entity, kept in ascending id order
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    items: Vec<Entity>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert a new entity and return its id
    pub fn spawn(&mut self, kind: EntityKind, rect: Rect) -> u32 {
        debug_assert!(kind != EntityKind::Player, "player lives outside the store");
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.items.push(Entity::new(id, kind, rect));
        id
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.items.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.items.iter_mut().find(|e| e.id == id)
    }

    /// First entity of a kind (the antagonist, the goal)
    pub fn find_kind(&self, kind: EntityKind) -> Option<&Entity> {
        self.items.iter().find(|e| e.kind == kind)
    }

    pub fn find_kind_mut(&mut self, kind: EntityKind) -> Option<&mut Entity> {
        self.items.iter_mut().find(|e| e.kind == kind)
    }

    pub fn remove(&mut self, id: u32) -> Option<Entity> {
        let idx = self.items.iter().position(|e| e.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Count of entities subject to the spawn cap
    pub fn live_count(&self) -> usize {
        self.items.iter().filter(|e| e.kind.scrolls()).count()
    }

    /// Drop scrolling entities whose right edge is left of `edge`
    pub fn cull_behind(&mut self, edge: f32) -> usize {
        let before = self.items.len();
        self.items
            .retain(|e| !e.kind.scrolls() || e.rect.right() > edge);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.next_id = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let mut store = EntityStore::new();
        let a = store.spawn(EntityKind::ObstacleLow, Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = store.spawn(EntityKind::ObstacleHigh, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(b > a);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_cull_keeps_antagonist() {
        let mut store = EntityStore::new();
        store.spawn(EntityKind::Antagonist, Rect::new(-500.0, 0.0, 10.0, 10.0));
        store.spawn(EntityKind::ObstacleLow, Rect::new(-500.0, 0.0, 10.0, 10.0));
        store.spawn(EntityKind::ObstacleLow, Rect::new(100.0, 0.0, 10.0, 10.0));

        assert_eq!(store.cull_behind(-100.0), 1);
        assert!(store.find_kind(EntityKind::Antagonist).is_some());
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = EntityStore::new();
        let id = store.spawn(EntityKind::Goal, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(store.remove(id).is_some());
        assert!(store.remove(id).is_none());
        store.spawn(EntityKind::Goal, Rect::default());
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.spawn(EntityKind::Goal, Rect::default()), 1);
    }
}
