//! Session countdown and score bookkeeping

/// What a countdown step produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    None,
    /// Displayed whole seconds changed to this value
    Second(u32),
    /// Reached zero on this step
    Expired,
}

/// Seconds-remaining timer that reports expiry exactly once
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    remaining: f32,
    shown_secs: u32,
    expired: bool,
}

impl Countdown {
    pub fn new(secs: f32) -> Self {
        let remaining = secs.max(0.0);
        Self {
            remaining,
            shown_secs: remaining.ceil() as u32,
            expired: false,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whole seconds for display (rounded up, so "1" shows until zero)
    pub fn shown_secs(&self) -> u32 {
        self.shown_secs
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn advance(&mut self, dt: f32) -> Tick {
        if self.expired {
            return Tick::None;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        if self.remaining <= 0.0 {
            self.expired = true;
            self.shown_secs = 0;
            return Tick::Expired;
        }
        let shown = self.remaining.ceil() as u32;
        if shown != self.shown_secs {
            self.shown_secs = shown;
            return Tick::Second(shown);
        }
        Tick::None
    }
}

/// Score plus the time left when the session ended
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreState {
    pub score: i64,
    pub time_remaining: f32,
    bonus_applied: bool,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn award(&mut self, points: i64) {
        self.score += points.max(0);
    }

    /// Subtract points; the score never drops below zero
    pub fn penalize(&mut self, points: i64) {
        self.score = (self.score - points.max(0)).max(0);
    }

    /// Add `time_remaining * multiplier`. Only the first call counts.
    pub fn apply_time_bonus(&mut self, multiplier: i64) -> i64 {
        if self.bonus_applied {
            return 0;
        }
        self.bonus_applied = true;
        let bonus = self.time_remaining.max(0.0).floor() as i64 * multiplier;
        self.score += bonus;
        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_reports_seconds_and_expiry_once() {
        let mut c = Countdown::new(2.0);
        assert_eq!(c.shown_secs(), 2);
        assert_eq!(c.advance(0.5), Tick::None);
        assert_eq!(c.advance(0.6), Tick::Second(1));
        assert_eq!(c.advance(0.5), Tick::None);
        assert_eq!(c.advance(0.5), Tick::Expired);
        assert_eq!(c.remaining(), 0.0);
        assert_eq!(c.advance(0.5), Tick::None);
        assert!(c.is_expired());
    }

    #[test]
    fn test_large_step_clamps_to_zero() {
        let mut c = Countdown::new(30.0);
        assert_eq!(c.advance(100.0), Tick::Expired);
        assert_eq!(c.shown_secs(), 0);
    }

    #[test]
    fn test_penalty_floors_at_zero() {
        let mut s = ScoreState::new();
        s.award(10);
        s.penalize(5);
        assert_eq!(s.score, 5);
        s.penalize(50);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_time_bonus_applied_once() {
        let mut s = ScoreState::new();
        s.award(150);
        s.time_remaining = 42.7;
        assert_eq!(s.apply_time_bonus(5), 210);
        assert_eq!(s.apply_time_bonus(5), 0);
        assert_eq!(s.score, 360);
    }
}
