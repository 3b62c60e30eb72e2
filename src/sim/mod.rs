//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame deltas are clamped, motion is scaled to 60 Hz reference frames
//! - Seeded RNG only (each game owns a `Pcg32`)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod matching;
pub mod particles;
pub mod phase;
pub mod physics;
pub mod race;
pub mod rect;
pub mod runner;
pub mod spawn;
pub mod timer;

use serde::Serialize;

pub use collision::{CollisionRules, Contact, ObstaclePolicy, resolve};
pub use entity::{Entity, EntityKind, EntityStore, PickupKind};
pub use matching::{DragEvent, MatchState, PieceKind};
pub use phase::{GamePhase, Outcome, PhaseMachine};
pub use physics::{Player, PlayerIntent, PlayerState, scroll_speed, step_player};
pub use race::RaceState;
pub use rect::Rect;
pub use runner::{RunnerState, autopilot};
pub use spawn::SpawnScheduler;
pub use timer::{Countdown, ScoreState};

/// Player intents for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Jump pressed this frame (edge)
    pub jump: bool,
    /// Slide held (level)
    pub slide_held: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Start / play again (edge)
    pub start: bool,
    /// Finish early, when the objective allows it (edge)
    pub finish: bool,
    /// Pointer drag gestures, in order
    pub drags: Vec<DragEvent>,
}

/// Things that happened during a tick, for sound and UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped,
    Collected { kind: PickupKind },
    Stumbled,
    Passed { points: i64 },
    Boosted,
    GoalAppeared,
    Matched { kind: PieceKind },
    Mismatched { kind: PieceKind },
    PhaseChanged(GamePhase),
    /// Terminal phase entered; emitted once per play session
    Finished { won: bool, score: i64 },
}

/// Compact UI-facing view of a game. Published instead of the entity store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: i64,
    pub phase: GamePhase,
    pub seconds_left: u32,
    /// Objective completion, 0..=100
    pub progress: f32,
    /// Variant-specific label (required shape, "boost")
    pub hint: Option<&'static str>,
}

/// The shape every mini-game shares, so one session driver runs them all
pub trait MiniGame {
    /// Reset everything and enter `Playing`
    fn start(&mut self);
    /// Advance by one frame of `dt` seconds
    fn tick(&mut self, input: &TickInput, dt: f32);
    fn phase(&self) -> GamePhase;
    fn snapshot(&self) -> HudSnapshot;
    /// Events since the last drain
    fn drain_events(&mut self) -> Vec<GameEvent>;
}
