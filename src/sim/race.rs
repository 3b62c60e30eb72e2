//! Tortoise-and-hare lane race
//!
//! Top-down track. The player steers between lanes (percent of road width)
//! and runs forward along z; the hare starts ahead and tires. Boost pads are
//! laid out once per session from the seeded RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::particles::ParticleField;
use super::phase::{GamePhase, PhaseMachine};
use super::rect::Rect;
use super::spawn::uniform;
use super::{GameEvent, HudSnapshot, MiniGame, TickInput};
use crate::sim::entity::PickupKind;
use crate::tuning::RaceTuning;

/// Screen-space field the race is drawn in
pub const FIELD: Vec2 = Vec2::new(800.0, 600.0);
/// Player's screen y as a fraction of field height
pub const CAMERA_OFFSET_Y: f32 = 0.75;
/// Road width as a fraction of field width
pub const ROAD_FRACTION: f32 = 0.8;

const BOOST_SPARK: [f32; 4] = [0.98, 0.8, 0.08, 1.0];

/// A boost pad on the track
#[derive(Debug, Clone, PartialEq)]
pub struct BoostPad {
    pub lane: f32,
    pub z: f32,
    pub active: bool,
}

/// A cheering spectator beside the road (cosmetic)
#[derive(Debug, Clone, PartialEq)]
pub struct Spectator {
    pub lane: f32,
    pub z: f32,
    pub palette: usize,
    pub phase: f32,
}

#[derive(Debug, Clone)]
pub struct RaceState {
    pub tuning: RaceTuning,
    rng: Pcg32,
    machine: PhaseMachine,
    /// Lateral position, percent of road width
    pub lane: f32,
    pub z: f32,
    pub speed: f32,
    pub boost_remaining: f32,
    pub rival_z: f32,
    pub rival_speed: f32,
    pub pads: Vec<BoostPad>,
    pub crowd: Vec<Spectator>,
    pub particles: ParticleField,
    pub frame: f32,
    events: Vec<GameEvent>,
}

impl RaceState {
    pub fn new(tuning: RaceTuning, seed: u64) -> Self {
        let mut state = Self {
            lane: tuning.start_lane,
            z: 0.0,
            speed: tuning.base_speed,
            boost_remaining: 0.0,
            rival_z: tuning.rival_start_z,
            rival_speed: tuning.rival_speed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            machine: PhaseMachine::new(),
            pads: Vec::new(),
            crowd: Vec::new(),
            particles: ParticleField::new(),
            frame: 0.0,
            events: Vec::new(),
        };
        state.lay_out_track();
        state
    }

    pub fn boosted(&self) -> bool {
        self.boost_remaining > 0.0
    }

    pub fn outro_elapsed(&self) -> f32 {
        self.machine.outro_elapsed()
    }

    /// Player position on screen, where pickup sparks are emitted
    pub fn player_screen(&self) -> Vec2 {
        Vec2::new(lane_to_screen(self.lane), FIELD.y * CAMERA_OFFSET_Y)
    }

    fn lay_out_track(&mut self) {
        let t = &self.tuning;
        self.pads.clear();
        let mut z = t.pickup_start_z;
        while z < t.finish_z {
            let lane = uniform(&mut self.rng, t.pickup_lane_min, t.pickup_lane_max);
            let jitter = uniform(&mut self.rng, -t.pickup_jitter, t.pickup_jitter);
            self.pads.push(BoostPad {
                lane,
                z: z + jitter,
                active: true,
            });
            z += t.pickup_every;
        }

        self.crowd.clear();
        let mut z = 200.0;
        while z < t.finish_z + 1500.0 {
            // Denser near the finish
            let density = if z > t.finish_z - 2000.0 { 3 } else { 1 };
            for _ in 0..density {
                for side in [-1.0_f32, 1.0] {
                    let lane = if side < 0.0 {
                        -10.0 - self.rng.random_range(0.0..20.0)
                    } else {
                        110.0 + self.rng.random_range(0.0..20.0)
                    };
                    self.crowd.push(Spectator {
                        lane,
                        z: z + self.rng.random_range(0.0..100.0),
                        palette: self.rng.random_range(0..3),
                        phase: self.rng.random_range(0.0..std::f32::consts::TAU),
                    });
                }
            }
            z += 300.0;
        }
        log::debug!(
            "track laid out: {} pads, {} spectators",
            self.pads.len(),
            self.crowd.len()
        );
    }

    fn reach_rect(&self, pad: &BoostPad) -> Rect {
        Rect::centered(
            Vec2::new(pad.lane, pad.z),
            self.tuning.reach_dx * 2.0,
            self.tuning.reach_dz * 2.0,
        )
    }

    fn enter(&mut self, won: bool) {
        let moved = if won {
            self.machine.trigger_win(self.tuning.outro_secs)
        } else {
            self.machine.trigger_loss(self.tuning.outro_secs)
        };
        if moved {
            if won {
                self.particles.confetti(&mut self.rng, FIELD.x, 50);
            }
            self.events.push(GameEvent::PhaseChanged(self.machine.phase()));
        }
    }

    fn tick_playing(&mut self, input: &TickInput, dt: f32, ts: f32) {
        let t = &self.tuning;
        if input.steer_left {
            self.lane = (self.lane - t.lane_speed * ts).max(t.lane_min);
        }
        if input.steer_right {
            self.lane = (self.lane + t.lane_speed * ts).min(t.lane_max);
        }

        self.boost_remaining = (self.boost_remaining - dt).max(0.0);
        let target = if self.boost_remaining > 0.0 {
            t.boost_speed
        } else {
            t.base_speed
        };
        self.speed += (target - self.speed) * (t.speed_ease * ts).min(1.0);
        self.z += self.speed * ts;

        self.rival_speed = (self.rival_speed - t.rival_decay * ts).max(t.rival_min_speed);
        self.rival_z += self.rival_speed * ts;

        // Player is a point in (lane, z) space
        let here = Rect::centered(Vec2::new(self.lane, self.z), 0.0, 0.0);
        let mut boosted = false;
        for i in 0..self.pads.len() {
            if !self.pads[i].active {
                continue;
            }
            if self.reach_rect(&self.pads[i]).overlaps(&here) {
                self.pads[i].active = false;
                boosted = true;
            }
        }
        if boosted {
            self.boost_remaining = self.tuning.boost_secs;
            let at = self.player_screen();
            self.particles.burst(&mut self.rng, at, 20, BOOST_SPARK);
            self.events.push(GameEvent::Collected {
                kind: PickupKind::Boost,
            });
            self.events.push(GameEvent::Boosted);
        }

        if self.z >= self.tuning.finish_z {
            log::info!("tortoise crossed the line");
            self.enter(true);
        } else if self.rival_z >= self.tuning.finish_z {
            log::info!("hare crossed the line");
            self.enter(false);
        }
    }

    fn tick_outro(&mut self, dt: f32, ts: f32) {
        let decay = self.tuning.outro_decay.powf(ts);
        self.speed *= decay;
        self.z += self.speed * ts;
        self.rival_speed *= decay;
        self.rival_z += self.rival_speed * ts;

        let won = self.machine.phase() == GamePhase::WinPending;
        if won
            && self.machine.outro_elapsed() < self.tuning.confetti_secs
            && self.rng.random_bool(0.2)
        {
            self.particles.confetti(&mut self.rng, FIELD.x, 10);
        }

        if let Some(outcome) = self.machine.advance_outro(dt) {
            log::info!("race over: {outcome:?}");
            self.events.push(GameEvent::PhaseChanged(self.machine.phase()));
            self.events.push(GameEvent::Finished {
                won: outcome.won(),
                score: self.score(),
            });
        }
    }

    /// Distance covered, in whole track units
    pub fn score(&self) -> i64 {
        self.z.min(self.tuning.finish_z).max(0.0) as i64
    }
}

/// Lane percentage to screen x
pub fn lane_to_screen(lane: f32) -> f32 {
    let road_w = FIELD.x * ROAD_FRACTION;
    let road_x = (FIELD.x - road_w) / 2.0;
    road_x + lane / 100.0 * road_w
}

impl MiniGame for RaceState {
    fn start(&mut self) {
        let t = &self.tuning;
        self.lane = t.start_lane;
        self.z = 0.0;
        self.speed = t.base_speed;
        self.boost_remaining = 0.0;
        self.rival_z = t.rival_start_z;
        self.rival_speed = t.rival_speed;
        self.particles.clear();
        self.frame = 0.0;
        self.events.clear();
        self.lay_out_track();
        self.machine.start();
        self.events.push(GameEvent::PhaseChanged(GamePhase::Playing));
    }

    fn tick(&mut self, input: &TickInput, dt: f32) {
        let dt = crate::clamp_dt(dt);
        let ts = crate::time_scale(dt);
        match self.machine.phase() {
            GamePhase::Menu | GamePhase::Won | GamePhase::Lost => {
                if input.start {
                    self.start();
                    return;
                }
            }
            GamePhase::Playing => {
                self.frame += ts;
                self.tick_playing(input, dt, ts);
            }
            GamePhase::WinPending | GamePhase::LosePending => {
                self.frame += ts;
                self.tick_outro(dt, ts);
            }
        }
        self.particles.step(ts);
    }

    fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score(),
            phase: self.machine.phase(),
            seconds_left: 0,
            progress: (self.z / self.tuning.finish_z * 100.0).clamp(0.0, 100.0),
            hint: self.boosted().then_some("boost"),
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn race() -> RaceState {
        let mut s = RaceState::new(RaceTuning::default(), 4);
        s.start();
        s
    }

    fn finished(s: &mut RaceState, frames: usize) -> Vec<bool> {
        let mut out = Vec::new();
        for _ in 0..frames {
            s.tick(&TickInput::default(), DT);
            for e in s.drain_events() {
                if let GameEvent::Finished { won, .. } = e {
                    out.push(won);
                }
            }
        }
        out
    }

    #[test]
    fn test_pads_laid_out_along_track() {
        let s = race();
        assert_eq!(s.pads.len(), 124);
        for (i, pad) in s.pads.iter().enumerate() {
            let nominal = 1000.0 + i as f32 * 800.0;
            assert!((pad.z - nominal).abs() <= 200.0);
            assert!((20.0..=80.0).contains(&pad.lane));
        }
        assert!(!s.crowd.is_empty());
    }

    #[test]
    fn test_steering_is_clamped() {
        let mut s = race();
        s.pads.clear();
        let left = TickInput {
            steer_left: true,
            ..Default::default()
        };
        for _ in 0..100 {
            s.tick(&left, DT);
        }
        assert_eq!(s.lane, 10.0);

        let right = TickInput {
            steer_right: true,
            ..Default::default()
        };
        for _ in 0..100 {
            s.tick(&right, DT);
        }
        assert_eq!(s.lane, 90.0);
    }

    #[test]
    fn test_pad_boosts_once_then_eases_back() {
        let mut s = race();
        s.pads = vec![BoostPad {
            lane: 50.0,
            z: 40.0,
            active: true,
        }];
        s.tick(&TickInput::default(), DT);
        assert!(s.boosted());
        assert!(!s.pads[0].active);
        assert!(s.drain_events().contains(&GameEvent::Boosted));

        for _ in 0..60 {
            s.tick(&TickInput::default(), DT);
        }
        assert!(s.speed > 30.0);

        for _ in 0..120 {
            s.tick(&TickInput::default(), DT);
        }
        assert!(!s.boosted());
        assert!((s.speed - 18.0).abs() < 0.5);
        assert!(!s.drain_events().contains(&GameEvent::Boosted));
    }

    #[test]
    fn test_pad_out_of_lane_is_missed() {
        let mut s = race();
        s.pads = vec![BoostPad {
            lane: 70.0,
            z: 40.0,
            active: true,
        }];
        s.tick(&TickInput::default(), DT);
        assert!(!s.boosted());
        assert!(s.pads[0].active);
    }

    #[test]
    fn test_rival_tires_to_floor() {
        let mut s = race();
        s.pads.clear();
        for _ in 0..5000 {
            s.tick(&TickInput::default(), DT);
            if s.phase() != GamePhase::Playing {
                break;
            }
        }
        assert!((s.rival_speed - 13.5).abs() < 1e-3);
    }

    #[test]
    fn test_player_crossing_wins_once() {
        let mut s = race();
        s.z = s.tuning.finish_z - 10.0;
        s.tick(&TickInput::default(), DT);
        assert_eq!(s.phase(), GamePhase::WinPending);
        assert_eq!(finished(&mut s, 240), vec![true]);
        assert_eq!(s.phase(), GamePhase::Won);
    }

    #[test]
    fn test_rival_crossing_loses() {
        let mut s = race();
        s.rival_z = s.tuning.finish_z - 5.0;
        s.tick(&TickInput::default(), DT);
        assert_eq!(s.phase(), GamePhase::LosePending);
        assert_eq!(finished(&mut s, 240), vec![false]);
    }

    #[test]
    fn test_outro_slows_both_runners() {
        let mut s = race();
        s.z = s.tuning.finish_z - 10.0;
        s.tick(&TickInput::default(), DT);
        let before = s.speed;
        for _ in 0..30 {
            s.tick(&TickInput::default(), DT);
        }
        assert!(s.speed < before * 0.3);
        assert!(s.rival_speed < 26.5 * 0.3);
    }

    #[test]
    fn test_steering_ignored_after_finish() {
        let mut s = race();
        s.rival_z = s.tuning.finish_z;
        s.tick(&TickInput::default(), DT);
        let lane = s.lane;
        s.tick(
            &TickInput {
                steer_left: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(s.lane, lane);
    }
}
