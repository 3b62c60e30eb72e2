//! Frame driver shared by every mini-game
//!
//! Owns the game, turns timestamps into clamped deltas, and reports completion
//! to the host exactly once per play session. The UI gets a throttled
//! [`HudSnapshot`], never the entity store.

use crate::consts::NOMINAL_DT;
use crate::sim::{GameEvent, GamePhase, HudSnapshot, MiniGame, Outcome, TickInput};

/// Default HUD publish interval
pub const HUD_INTERVAL_MS: f64 = 100.0;

/// Rate-limits HUD publication: a snapshot goes out when it differs from the
/// last one and either the phase changed or `interval_ms` has passed.
#[derive(Debug, Clone)]
pub struct SnapshotThrottle {
    interval_ms: f64,
    last_at: Option<f64>,
    last: Option<HudSnapshot>,
}

impl SnapshotThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_at: None,
            last: None,
        }
    }

    pub fn reset(&mut self) {
        self.last_at = None;
        self.last = None;
    }

    pub fn last(&self) -> Option<&HudSnapshot> {
        self.last.as_ref()
    }

    pub fn offer(&mut self, now_ms: f64, snap: HudSnapshot) -> Option<HudSnapshot> {
        let due = match (&self.last, self.last_at) {
            (Some(prev), Some(at)) => {
                *prev != snap && (prev.phase != snap.phase || now_ms - at >= self.interval_ms)
            }
            _ => true,
        };
        if !due {
            return None;
        }
        self.last_at = Some(now_ms);
        self.last = Some(snap.clone());
        Some(snap)
    }
}

/// What one frame produced for the outer layers
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub events: Vec<GameEvent>,
    /// Present when the HUD should redraw
    pub hud: Option<HudSnapshot>,
}

pub struct Session<G: MiniGame> {
    game: G,
    on_complete: Box<dyn FnMut(Outcome)>,
    completed: bool,
    last_ms: Option<f64>,
    throttle: SnapshotThrottle,
}

impl<G: MiniGame> Session<G> {
    pub fn new(game: G, on_complete: Box<dyn FnMut(Outcome)>) -> Self {
        Self {
            game,
            on_complete,
            completed: false,
            last_ms: None,
            throttle: SnapshotThrottle::new(HUD_INTERVAL_MS),
        }
    }

    pub fn with_hud_interval(mut self, interval_ms: f64) -> Self {
        self.throttle = SnapshotThrottle::new(interval_ms);
        self
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn phase(&self) -> GamePhase {
        self.game.phase()
    }

    /// Start a fresh play session
    pub fn restart(&mut self) {
        self.game.start();
        self.completed = false;
        self.throttle.reset();
    }

    /// Forget the previous timestamp (tab was hidden)
    pub fn pause_clock(&mut self) {
        self.last_ms = None;
    }

    /// Advance the game to `now_ms` (requestAnimationFrame timestamp)
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) -> FrameReport {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => NOMINAL_DT,
        };
        self.last_ms = Some(now_ms);

        self.game.tick(input, crate::clamp_dt(dt));
        let events = self.game.drain_events();

        for event in &events {
            match *event {
                GameEvent::PhaseChanged(GamePhase::Playing) => self.completed = false,
                GameEvent::Finished { won, score } => {
                    if !self.completed {
                        self.completed = true;
                        log::info!("session complete: won={won} score={score}");
                        let outcome = if won { Outcome::Won } else { Outcome::Lost };
                        (self.on_complete)(outcome);
                    }
                }
                _ => {}
            }
        }

        let hud = self.throttle.offer(now_ms, self.game.snapshot());
        FrameReport { events, hud }
    }
}
