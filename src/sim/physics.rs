//! Player movement and world scroll
//!
//! The player's on-screen x is fixed; the world scrolls past it. Vertical
//! motion is constant-acceleration integration in reference-frame units
//! (see [`crate::time_scale`]).

use serde::{Deserialize, Serialize};

use super::entity::EntityStore;
use super::rect::Rect;

/// Movement state of the controlled character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Running,
    Jumping,
    Sliding,
}

/// Movement requests fed into the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerIntent {
    Jump,
    SlideStart,
    SlideEnd,
    /// Touched the ground line
    Land,
}

impl PlayerState {
    /// Transition table. `None` means the intent is ignored in this state,
    /// which is how sliding-while-airborne is ruled out.
    pub fn on(self, intent: PlayerIntent) -> Option<PlayerState> {
        use PlayerIntent::*;
        use PlayerState::*;
        match (self, intent) {
            (Running, Jump) | (Sliding, Jump) => Some(Jumping),
            (Running, SlideStart) => Some(Sliding),
            (Sliding, SlideEnd) => Some(Running),
            (Jumping, Land) => Some(Running),
            _ => None,
        }
    }
}

/// The controlled character. `y` is the foot line.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    pub slide_h: f32,
    pub state: PlayerState,
}

impl Player {
    pub fn new(x: f32, ground_y: f32, w: f32, h: f32, slide_h: f32) -> Self {
        Self {
            x,
            y: ground_y,
            vy: 0.0,
            w,
            h,
            slide_h,
            state: PlayerState::Running,
        }
    }

    /// Current collision box; sliding lowers the top edge only
    pub fn rect(&self) -> Rect {
        let h = match self.state {
            PlayerState::Sliding => self.slide_h,
            _ => self.h,
        };
        Rect::new(self.x, self.y - h, self.w, h)
    }

    /// Feed an intent through the transition table. Returns true when the
    /// state changed. A jump sets the take-off velocity.
    pub fn apply(&mut self, intent: PlayerIntent, jump_velocity: f32) -> bool {
        let Some(next) = self.state.on(intent) else {
            return false;
        };
        if next == PlayerState::Jumping {
            self.vy = jump_velocity;
        }
        self.state = next;
        true
    }

    pub fn is_grounded(&self) -> bool {
        self.state != PlayerState::Jumping
    }
}

/// Integrate gravity for one frame and resolve ground contact.
///
/// Returns true on the frame the player lands.
pub fn step_player(player: &mut Player, ground_y: f32, gravity: f32, ts: f32) -> bool {
    player.vy += gravity * ts;
    player.y += player.vy * ts;

    if player.y >= ground_y {
        player.y = ground_y;
        player.vy = 0.0;
        return player.apply(PlayerIntent::Land, 0.0);
    }
    false
}

/// Forward scroll speed after `elapsed` seconds of play (linear ramp)
pub fn scroll_speed(base: f32, ramp: f32, max: f32, elapsed: f32) -> f32 {
    (base + ramp * elapsed.max(0.0)).min(max.max(base))
}

/// Move every scrolling entity left by `dx`
pub fn scroll_world(store: &mut EntityStore, dx: f32) {
    for e in store.iter_mut().filter(|e| e.kind.scrolls()) {
        e.rect.x -= dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;

    const GROUND: f32 = 380.0;

    fn player() -> Player {
        Player::new(150.0, GROUND, 50.0, 90.0, 45.0)
    }

    #[test]
    fn test_transition_table() {
        use PlayerIntent::*;
        use PlayerState::*;
        assert_eq!(Running.on(Jump), Some(Jumping));
        assert_eq!(Sliding.on(Jump), Some(Jumping));
        assert_eq!(Running.on(SlideStart), Some(Sliding));
        assert_eq!(Jumping.on(SlideStart), None);
        assert_eq!(Jumping.on(Jump), None);
        assert_eq!(Sliding.on(SlideEnd), Some(Running));
        assert_eq!(Running.on(Land), None);
        assert_eq!(Jumping.on(Land), Some(Running));
    }

    #[test]
    fn test_jump_arc_lands_on_ground() {
        let mut p = player();
        assert!(p.apply(PlayerIntent::Jump, -14.0));

        let mut peak = GROUND;
        let mut landed = false;
        for _ in 0..200 {
            landed |= step_player(&mut p, GROUND, 0.6, 1.0);
            peak = peak.min(p.y);
            assert!(p.y <= GROUND);
        }
        assert!(landed);
        assert!(peak < GROUND - 100.0);
        assert_eq!(p.state, PlayerState::Running);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn test_slide_changes_box_not_velocity() {
        let mut p = player();
        let standing = p.rect();
        p.apply(PlayerIntent::SlideStart, -14.0);
        let sliding = p.rect();
        assert_eq!(p.vy, 0.0);
        assert_eq!(sliding.bottom(), standing.bottom());
        assert_eq!(sliding.h, 45.0);
    }

    #[test]
    fn test_jump_cancels_slide() {
        let mut p = player();
        p.apply(PlayerIntent::SlideStart, -14.0);
        assert!(p.apply(PlayerIntent::Jump, -14.0));
        assert_eq!(p.state, PlayerState::Jumping);
        assert_eq!(p.rect().h, 90.0);
    }

    #[test]
    fn test_scroll_speed_ramp_is_capped() {
        assert_eq!(scroll_speed(6.0, 0.1, 8.0, 0.0), 6.0);
        assert!((scroll_speed(6.0, 0.1, 8.0, 10.0) - 7.0).abs() < 1e-5);
        assert_eq!(scroll_speed(6.0, 0.1, 8.0, 100.0), 8.0);
    }

    #[test]
    fn test_scroll_world_skips_antagonist() {
        let mut store = EntityStore::new();
        let guard = store.spawn(EntityKind::Antagonist, Rect::new(20.0, 0.0, 10.0, 10.0));
        let rock = store.spawn(EntityKind::ObstacleLow, Rect::new(500.0, 0.0, 10.0, 10.0));
        scroll_world(&mut store, 6.0);
        assert_eq!(store.get(guard).map(|e| e.rect.x), Some(20.0));
        assert_eq!(store.get(rock).map(|e| e.rect.x), Some(494.0));
    }
}
