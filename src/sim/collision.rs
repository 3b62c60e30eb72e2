//! Collision detection and outcome policy
//!
//! Only the player is ever tested, against every other live entity.
//! Antagonist-vs-obstacle and pickup-vs-obstacle contacts are not modeled.

use serde::{Deserialize, Serialize};

use super::entity::{EntityKind, EntityStore, PickupKind};
use super::rect::{Rect, overlaps_padded};

/// What touching an obstacle does
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ObstaclePolicy {
    /// Session is lost immediately
    #[default]
    Fatal,
    /// The pursuer gains `push` pixels on the player (once per obstacle)
    Stumble { push: f32 },
}

/// Per-variant collision parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRules {
    /// Inward padding applied to both boxes
    pub padding: f32,
    /// The pursuer catches the player once its right edge is more than this
    /// far past the player's left edge
    pub catch_margin: f32,
    pub obstacle_policy: ObstaclePolicy,
}

/// A single resolved contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    ReachedGoal { id: u32 },
    Caught { id: u32 },
    /// Pickup consumed and removed from the store
    Collected { id: u32, kind: PickupKind },
    Crashed { id: u32 },
    Stumbled { id: u32, push: f32 },
    /// Obstacle went behind the player untouched
    Passed { id: u32 },
}

impl Contact {
    pub fn ends_in_win(&self) -> bool {
        matches!(self, Contact::ReachedGoal { .. })
    }

    pub fn ends_in_loss(&self) -> bool {
        matches!(self, Contact::Caught { .. } | Contact::Crashed { .. })
    }
}

/// Whether the pursuer has caught the player: its leading edge is more than
/// `catch_margin` into the player's box. Shallower overlap is a near miss.
pub fn is_caught(player: &Rect, antagonist: &Rect, rules: &CollisionRules) -> bool {
    antagonist.right() > player.x + rules.catch_margin
}

/// Test the player against every live entity and apply the per-kind policy.
///
/// Flags (`passed`, `hit`) are set here so that running the resolver again on
/// unchanged state yields no new scoring contacts. Consumed pickups are
/// removed.
pub fn resolve(player: &Rect, store: &mut EntityStore, rules: &CollisionRules) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let mut consumed = Vec::new();

    for e in store.iter_mut() {
        let touching = overlaps_padded(player, &e.rect, rules.padding);
        match e.kind {
            EntityKind::Player => {}
            EntityKind::Goal => {
                if touching {
                    contacts.push(Contact::ReachedGoal { id: e.id });
                }
            }
            EntityKind::Antagonist => {
                if is_caught(player, &e.rect, rules) {
                    contacts.push(Contact::Caught { id: e.id });
                }
            }
            EntityKind::Pickup(kind) => {
                if touching {
                    consumed.push(e.id);
                    contacts.push(Contact::Collected { id: e.id, kind });
                }
            }
            EntityKind::ObstacleLow | EntityKind::ObstacleHigh => {
                if touching {
                    match rules.obstacle_policy {
                        ObstaclePolicy::Fatal => contacts.push(Contact::Crashed { id: e.id }),
                        ObstaclePolicy::Stumble { push } => {
                            if !e.hit {
                                e.hit = true;
                                contacts.push(Contact::Stumbled { id: e.id, push });
                            }
                        }
                    }
                } else if !e.passed && !e.hit && e.rect.right() < player.x {
                    e.passed = true;
                    contacts.push(Contact::Passed { id: e.id });
                }
            }
        }
    }

    for id in consumed {
        store.remove(id);
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(policy: ObstaclePolicy) -> CollisionRules {
        CollisionRules {
            padding: 0.0,
            catch_margin: 20.0,
            obstacle_policy: policy,
        }
    }

    fn player() -> Rect {
        Rect::new(150.0, 290.0, 50.0, 90.0)
    }

    #[test]
    fn test_fatal_obstacle() {
        let mut store = EntityStore::new();
        let id = store.spawn(EntityKind::ObstacleLow, Rect::new(170.0, 330.0, 50.0, 50.0));
        let contacts = resolve(&player(), &mut store, &rules(ObstaclePolicy::Fatal));
        assert_eq!(contacts, vec![Contact::Crashed { id }]);
        assert!(contacts[0].ends_in_loss());
    }

    #[test]
    fn test_stumble_applies_once_per_obstacle() {
        let mut store = EntityStore::new();
        let id = store.spawn(EntityKind::ObstacleHigh, Rect::new(160.0, 240.0, 50.0, 60.0));
        let r = rules(ObstaclePolicy::Stumble { push: 100.0 });
        assert_eq!(
            resolve(&player(), &mut store, &r),
            vec![Contact::Stumbled { id, push: 100.0 }]
        );
        assert!(resolve(&player(), &mut store, &r).is_empty());
    }

    #[test]
    fn test_pass_is_scored_once() {
        let mut store = EntityStore::new();
        let id = store.spawn(EntityKind::ObstacleLow, Rect::new(80.0, 330.0, 50.0, 50.0));
        let r = rules(ObstaclePolicy::Fatal);
        assert_eq!(resolve(&player(), &mut store, &r), vec![Contact::Passed { id }]);
        assert!(resolve(&player(), &mut store, &r).is_empty());
    }

    #[test]
    fn test_pickup_is_removed() {
        let mut store = EntityStore::new();
        let id = store.spawn(
            EntityKind::Pickup(PickupKind::Star),
            Rect::new(160.0, 300.0, 30.0, 30.0),
        );
        let contacts = resolve(&player(), &mut store, &rules(ObstaclePolicy::Fatal));
        assert_eq!(
            contacts,
            vec![Contact::Collected {
                id,
                kind: PickupKind::Star
            }]
        );
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_goal_and_catch() {
        let mut store = EntityStore::new();
        let goal = store.spawn(EntityKind::Goal, Rect::new(180.0, 260.0, 120.0, 120.0));
        let r = rules(ObstaclePolicy::Fatal);
        assert_eq!(
            resolve(&player(), &mut store, &r),
            vec![Contact::ReachedGoal { id: goal }]
        );

        let mut store = EntityStore::new();
        let guard = store.spawn(EntityKind::Antagonist, Rect::new(20.0, 290.0, 50.0, 90.0));
        assert!(resolve(&player(), &mut store, &r).is_empty());
        if let Some(g) = store.get_mut(guard) {
            g.rect.x = 121.0;
        }
        assert_eq!(
            resolve(&player(), &mut store, &r),
            vec![Contact::Caught { id: guard }]
        );
    }
}
