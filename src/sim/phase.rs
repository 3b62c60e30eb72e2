//! Session phase machine
//!
//! `Menu -> Playing -> {WinPending | LosePending} -> {Won | Lost}`. The pending
//! phases hold for a cosmetic outro before the session formally ends; the
//! terminal outcome is reported exactly once per play session.

use serde::{Deserialize, Serialize};

/// Current stage of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    WinPending,
    Won,
    LosePending,
    Lost,
}

impl GamePhase {
    /// Forward edges of the machine. Returning to `Menu` only happens through
    /// an explicit reset and is not an edge here.
    pub fn can_advance_to(self, next: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, next),
            (Menu, Playing)
                | (Playing, WinPending)
                | (Playing, LosePending)
                | (WinPending, Won)
                | (LosePending, Lost)
        )
    }

    pub fn is_pending(self) -> bool {
        matches!(self, GamePhase::WinPending | GamePhase::LosePending)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::WinPending => "win-pending",
            GamePhase::Won => "won",
            GamePhase::LosePending => "lose-pending",
            GamePhase::Lost => "lost",
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn won(self) -> bool {
        self == Outcome::Won
    }
}

/// Phase plus outro bookkeeping
#[derive(Debug, Clone, Default)]
pub struct PhaseMachine {
    phase: GamePhase,
    outro_remaining: f32,
    outro_elapsed: f32,
    completion_sent: bool,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Begin a fresh play session from any phase
    pub fn start(&mut self) {
        *self = Self {
            phase: GamePhase::Playing,
            ..Self::default()
        };
        log::info!("phase -> {}", self.phase.as_str());
    }

    /// Back to the menu, discarding any session in progress
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn advance(&mut self, next: GamePhase) -> bool {
        if !self.phase.can_advance_to(next) {
            log::debug!(
                "ignored phase edge {} -> {}",
                self.phase.as_str(),
                next.as_str()
            );
            return false;
        }
        log::info!("phase {} -> {}", self.phase.as_str(), next.as_str());
        self.phase = next;
        true
    }

    /// Win condition detected. Only the first terminal condition counts.
    pub fn trigger_win(&mut self, outro_secs: f32) -> bool {
        let moved = self.advance(GamePhase::WinPending);
        if moved {
            self.outro_remaining = outro_secs.max(0.0);
            self.outro_elapsed = 0.0;
        }
        moved
    }

    /// Lose condition detected. Only the first terminal condition counts.
    pub fn trigger_loss(&mut self, outro_secs: f32) -> bool {
        let moved = self.advance(GamePhase::LosePending);
        if moved {
            self.outro_remaining = outro_secs.max(0.0);
            self.outro_elapsed = 0.0;
        }
        moved
    }

    pub fn is_outro(&self) -> bool {
        self.phase.is_pending()
    }

    /// Seconds spent in the current outro
    pub fn outro_elapsed(&self) -> f32 {
        self.outro_elapsed
    }

    /// Count down the outro. Returns the outcome on the frame the terminal
    /// phase is entered, and never again for this session.
    pub fn advance_outro(&mut self, dt: f32) -> Option<Outcome> {
        if !self.is_outro() {
            return None;
        }
        self.outro_elapsed += dt;
        self.outro_remaining -= dt;
        if self.outro_remaining > 0.0 {
            return None;
        }

        let (next, outcome) = match self.phase {
            GamePhase::WinPending => (GamePhase::Won, Outcome::Won),
            _ => (GamePhase::Lost, Outcome::Lost),
        };
        self.advance(next);

        if self.completion_sent {
            return None;
        }
        self.completion_sent = true;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        use GamePhase::*;
        assert!(Menu.can_advance_to(Playing));
        assert!(Playing.can_advance_to(WinPending));
        assert!(Playing.can_advance_to(LosePending));
        assert!(!Playing.can_advance_to(Won));
        assert!(!Playing.can_advance_to(Lost));
        assert!(!Menu.can_advance_to(WinPending));
        assert!(!WinPending.can_advance_to(Lost));
        assert!(!Won.can_advance_to(Playing));
    }

    #[test]
    fn test_outro_completes_once() {
        let mut pm = PhaseMachine::new();
        pm.start();
        assert!(pm.trigger_win(1.0));
        assert_eq!(pm.phase(), GamePhase::WinPending);

        assert_eq!(pm.advance_outro(0.5), None);
        assert_eq!(pm.advance_outro(0.6), Some(Outcome::Won));
        assert_eq!(pm.phase(), GamePhase::Won);
        assert_eq!(pm.advance_outro(1.0), None);
    }

    #[test]
    fn test_first_terminal_condition_wins() {
        let mut pm = PhaseMachine::new();
        pm.start();
        assert!(pm.trigger_loss(2.0));
        assert!(!pm.trigger_win(2.0));
        assert_eq!(pm.phase(), GamePhase::LosePending);
    }

    #[test]
    fn test_triggers_ignored_outside_playing() {
        let mut pm = PhaseMachine::new();
        assert!(!pm.trigger_win(1.0));
        assert_eq!(pm.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_start_resets_completion_guard() {
        let mut pm = PhaseMachine::new();
        pm.start();
        pm.trigger_loss(0.0);
        assert_eq!(pm.advance_outro(0.016), Some(Outcome::Lost));

        pm.start();
        pm.trigger_loss(0.0);
        assert_eq!(pm.advance_outro(0.016), Some(Outcome::Lost));
    }
}
