//! Side-scrolling runner (forest dash, midnight dash)
//!
//! The player holds a fixed x while the world scrolls left. A pursuer waits
//! behind; obstacles either end the run or hand the pursuer ground, depending
//! on the tuning.

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::collision::{self, CollisionRules, Contact};
use super::entity::{EntityKind, EntityStore};
use super::particles::ParticleField;
use super::phase::{GamePhase, PhaseMachine};
use super::physics::{self, Player, PlayerIntent, PlayerState};
use super::rect::Rect;
use super::spawn::SpawnScheduler;
use super::timer::{Countdown, ScoreState, Tick};
use super::{GameEvent, HudSnapshot, MiniGame, TickInput};
use crate::tuning::{RunnerTuning, WinCondition};

const DUST: [f32; 4] = [0.85, 0.8, 0.7, 0.9];
const SPARKLE: [f32; 4] = [1.0, 0.95, 0.5, 1.0];

#[derive(Debug, Clone)]
pub struct RunnerState {
    pub tuning: RunnerTuning,
    rng: Pcg32,
    machine: PhaseMachine,
    pub player: Player,
    pub store: EntityStore,
    pub countdown: Countdown,
    pub score: ScoreState,
    spawner: SpawnScheduler,
    /// Seconds of play this session
    pub elapsed: f32,
    pub speed: f32,
    /// Total scroll, drives background parallax
    pub scroll_distance: f32,
    pub goal_spawned: bool,
    pub particles: ParticleField,
    /// Reference frames elapsed, drives limb animation
    pub frame: f32,
    /// Rescuer walking in during the win outro
    pub ally_x: Option<f32>,
    pounce_from: f32,
    events: Vec<GameEvent>,
}

impl RunnerState {
    pub fn new(tuning: RunnerTuning, seed: u64) -> Self {
        let player = Player::new(
            tuning.player_x,
            tuning.ground_y,
            tuning.player_w,
            tuning.player_h,
            tuning.slide_h,
        );
        let spawner = SpawnScheduler::new(
            tuning.spawn_min,
            tuning.spawn_max,
            tuning.spawn_cap,
            tuning.first_spawn,
        );
        let countdown = Countdown::new(tuning.session_secs);
        let speed = tuning.base_speed;
        let mut state = Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            machine: PhaseMachine::new(),
            player,
            store: EntityStore::new(),
            countdown,
            score: ScoreState::new(),
            spawner,
            elapsed: 0.0,
            speed,
            scroll_distance: 0.0,
            goal_spawned: false,
            particles: ParticleField::new(),
            frame: 0.0,
            ally_x: None,
            pounce_from: 0.0,
            events: Vec::new(),
        };
        state.place_antagonist();
        state
    }

    fn rules(&self) -> CollisionRules {
        CollisionRules {
            padding: self.tuning.collision_padding,
            catch_margin: self.tuning.catch_margin,
            obstacle_policy: self.tuning.obstacle_policy,
        }
    }

    fn place_antagonist(&mut self) {
        let t = &self.tuning;
        let rect = Rect::new(
            t.antagonist_home_x,
            t.ground_y - t.antagonist_h,
            t.antagonist_w,
            t.antagonist_h,
        );
        self.store.spawn(EntityKind::Antagonist, rect);
    }

    pub fn antagonist(&self) -> Option<Rect> {
        self.store.find_kind(EntityKind::Antagonist).map(|e| e.rect)
    }

    pub fn outro_elapsed(&self) -> f32 {
        self.machine.outro_elapsed()
    }

    fn enter(&mut self, won: bool) {
        let moved = if won {
            self.machine.trigger_win(self.tuning.win_outro_secs)
        } else {
            self.machine.trigger_loss(self.tuning.lose_outro_secs)
        };
        if !moved {
            return;
        }
        if won {
            let width = self.tuning.field_width;
            self.particles.confetti(&mut self.rng, width, 40);
            if self.tuning.ally_speed > 0.0 {
                self.ally_x = Some(width + 50.0);
            }
        } else {
            self.pounce_from = self.antagonist().map_or(0.0, |r| r.x);
        }
        self.events.push(GameEvent::PhaseChanged(self.machine.phase()));
    }

    fn spawn_entity(&mut self, kind: EntityKind) {
        let t = &self.tuning;
        let x = t.field_width + t.spawn_margin;
        let rect = match kind {
            EntityKind::ObstacleLow => {
                let s = t.low_obstacle;
                Rect::new(x, t.ground_y - s.lift - s.h, s.w, s.h)
            }
            EntityKind::ObstacleHigh => {
                let s = t.high_obstacle;
                Rect::new(x, t.ground_y - s.lift - s.h, s.w, s.h)
            }
            EntityKind::Pickup(_) => Rect::new(
                x,
                t.ground_y - t.pickup_lift - t.pickup_size,
                t.pickup_size,
                t.pickup_size,
            ),
            EntityKind::Goal => Rect::new(
                t.field_width + t.goal_margin,
                t.ground_y - t.goal_size,
                t.goal_size,
                t.goal_size,
            ),
            EntityKind::Player | EntityKind::Antagonist => return,
        };
        let id = self.store.spawn(kind, rect);
        log::debug!("spawned {kind:?} #{id} at x={:.0}", rect.x);
    }

    fn apply_intents(&mut self, input: &TickInput) {
        let jv = self.tuning.jump_velocity;
        if input.jump && self.player.apply(PlayerIntent::Jump, jv) {
            let feet = Vec2::new(self.player.x + self.player.w / 2.0, self.player.y);
            let count = self.tuning.jump_particles;
            self.particles.burst(&mut self.rng, feet, count, DUST);
            self.events.push(GameEvent::Jumped);
        }
        let sliding = self.player.state == PlayerState::Sliding;
        if input.slide_held && !sliding {
            self.player.apply(PlayerIntent::SlideStart, jv);
        } else if !input.slide_held && sliding {
            self.player.apply(PlayerIntent::SlideEnd, jv);
        }
    }

    fn apply_contacts(&mut self, contacts: Vec<Contact>) {
        for contact in contacts {
            match contact {
                Contact::ReachedGoal { .. } => self.enter(true),
                Contact::Caught { .. } | Contact::Crashed { .. } => self.enter(false),
                Contact::Collected { kind, .. } => {
                    self.score.award(self.tuning.pickup_score);
                    let at = self.player.rect().center();
                    self.particles.burst(&mut self.rng, at, 10, SPARKLE);
                    self.events.push(GameEvent::Collected { kind });
                }
                Contact::Stumbled { push, .. } => {
                    if let Some(a) = self.store.find_kind_mut(EntityKind::Antagonist) {
                        a.rect.x += push;
                    }
                    self.events.push(GameEvent::Stumbled);
                }
                Contact::Passed { .. } => {
                    let points = self.tuning.pass_score;
                    self.score.award(points);
                    self.events.push(GameEvent::Passed { points });
                }
            }
        }
    }

    fn tick_playing(&mut self, input: &TickInput, dt: f32, ts: f32) {
        self.apply_intents(input);
        let t = &self.tuning;
        physics::step_player(&mut self.player, t.ground_y, t.gravity, ts);

        self.elapsed += dt;
        self.speed = physics::scroll_speed(t.base_speed, t.speed_ramp, t.max_speed, self.elapsed);
        let dx = self.speed * ts;
        physics::scroll_world(&mut self.store, dx);
        self.scroll_distance += dx;

        if self.countdown.advance(dt) == Tick::Expired {
            match self.tuning.win_condition {
                WinCondition::Survive => {
                    self.enter(true);
                    return;
                }
                WinCondition::ReachGoal => {
                    if !self.goal_spawned {
                        self.goal_spawned = true;
                        self.spawn_entity(EntityKind::Goal);
                        log::info!("goal marker appeared");
                        self.events.push(GameEvent::GoalAppeared);
                    }
                }
            }
        }

        if !self.countdown.is_expired()
            && self
                .spawner
                .advance(dt, self.store.live_count(), &mut self.rng)
        {
            if let Some(kind) = self.tuning.spawn_kinds.choose(&mut self.rng).copied() {
                self.spawn_entity(kind);
            }
        }

        let home = self.tuning.antagonist_home_x;
        let recovery = self.tuning.antagonist_recovery * ts;
        if let Some(a) = self.store.find_kind_mut(EntityKind::Antagonist) {
            if a.rect.x > home {
                a.rect.x = (a.rect.x - recovery).max(home);
            }
        }

        let rules = self.rules();
        let player_rect = self.player.rect();
        let contacts = collision::resolve(&player_rect, &mut self.store, &rules);
        self.apply_contacts(contacts);

        // A stumble this frame may have closed the gap
        if let Some(a) = self.antagonist() {
            if collision::is_caught(&player_rect, &a, &rules) {
                self.enter(false);
            }
        }

        let culled = self.store.cull_behind(self.tuning.cull_x);
        if culled > 0 {
            log::debug!("culled {culled} entities");
        }
    }

    fn tick_outro(&mut self, dt: f32, ts: f32) {
        let t = &self.tuning;
        physics::step_player(&mut self.player, t.ground_y, t.gravity, ts);
        if self.player.state == PlayerState::Sliding {
            self.player.apply(PlayerIntent::SlideEnd, 0.0);
        }

        let won = self.machine.phase() == GamePhase::WinPending;
        let elapsed = self.machine.outro_elapsed() + dt;
        let (ground_y, player_x) = (t.ground_y, t.player_x);
        let (pounce_secs, pounce_height) = (t.pounce_secs, t.pounce_height);
        let (retreat, ally_speed) = (t.retreat_speed * ts, t.ally_speed * ts);
        let ally_stop = t.field_width * 0.28;
        let from = self.pounce_from;

        if let Some(a) = self.store.find_kind_mut(EntityKind::Antagonist) {
            if won {
                a.rect.x -= retreat;
            } else {
                let target = player_x - a.rect.w / 4.0;
                let progress = if pounce_secs > 0.0 {
                    (elapsed / pounce_secs).min(1.0)
                } else {
                    1.0
                };
                a.rect.x = from + (target - from) * progress;
                let lift = (progress * std::f32::consts::PI).sin() * pounce_height;
                a.rect.y = ground_y - a.rect.h - lift;
            }
        }
        if let Some(x) = self.ally_x.as_mut() {
            if *x > ally_stop {
                *x = (*x - ally_speed).max(ally_stop);
            }
        }

        if let Some(outcome) = self.machine.advance_outro(dt) {
            log::info!("run over: {:?}, score {}", outcome, self.score.score);
            self.events.push(GameEvent::PhaseChanged(self.machine.phase()));
            self.events.push(GameEvent::Finished {
                won: outcome.won(),
                score: self.score.score,
            });
        }
    }
}

impl MiniGame for RunnerState {
    fn start(&mut self) {
        let t = &self.tuning;
        self.player = Player::new(t.player_x, t.ground_y, t.player_w, t.player_h, t.slide_h);
        self.countdown = Countdown::new(t.session_secs);
        self.spawner.reset(t.first_spawn);
        self.speed = t.base_speed;
        self.score = ScoreState::new();
        self.store.clear();
        self.elapsed = 0.0;
        self.scroll_distance = 0.0;
        self.goal_spawned = false;
        self.particles.clear();
        self.frame = 0.0;
        self.ally_x = None;
        self.pounce_from = 0.0;
        self.events.clear();
        self.place_antagonist();
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
        let progress = (self.countdown.remaining() / self.tuning.session_secs).clamp(0.0, 1.0);
        HudSnapshot {
            score: self.score.score,
            phase: self.machine.phase(),
            seconds_left: self.countdown.shown_secs(),
            progress: (1.0 - progress) * 100.0,
            hint: (self.goal_spawned && self.machine.phase() == GamePhase::Playing)
                .then_some("goal"),
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Frames of look-ahead before acting on an obstacle
const LOOKAHEAD_FRAMES: f32 = 10.0;

/// Demo driver: jump low obstacles, slide under high ones, start when idle
pub fn autopilot(state: &RunnerState) -> TickInput {
    let mut input = TickInput::default();
    match state.phase() {
        GamePhase::Playing => {}
        GamePhase::Menu => {
            input.start = true;
            return input;
        }
        _ => return input,
    }

    let player = state.player.rect();
    let reach = state.speed * LOOKAHEAD_FRAMES;
    let next = state
        .store
        .iter()
        .filter(|e| e.kind.is_obstacle() && e.rect.right() > player.x)
        .min_by(|a, b| a.rect.x.total_cmp(&b.rect.x));

    if let Some(obstacle) = next {
        let gap = obstacle.rect.x - player.right();
        match obstacle.kind {
            EntityKind::ObstacleLow => input.jump = gap <= reach,
            EntityKind::ObstacleHigh => {
                input.slide_held = gap <= reach * 1.2 && state.player.is_grounded();
            }
            _ => {}
        }
    }
    input
}
