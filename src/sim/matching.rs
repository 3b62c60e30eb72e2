//! Drag-and-drop collection game (wall builder, flower basket)

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::ParticleField;
use super::phase::{GamePhase, PhaseMachine};
use super::rect::Rect;
use super::spawn::{SpawnScheduler, uniform};
use super::timer::{Countdown, ScoreState, Tick};
use super::{GameEvent, HudSnapshot, MiniGame, TickInput};
use crate::tuning::{MatchTuning, MismatchPolicy, RequiredRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Square,
    Circle,
    Triangle,
    Rose,
    Violet,
    Daisy,
    Weed,
}

impl PieceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::Square => "square",
            PieceKind::Circle => "circle",
            PieceKind::Triangle => "triangle",
            PieceKind::Rose => "rose",
            PieceKind::Violet => "violet",
            PieceKind::Daisy => "daisy",
            PieceKind::Weed => "weed",
        }
    }
}

/// Pointer gesture in field coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    End { x: f32, y: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub id: u32,
    pub kind: PieceKind,
    pub rect: Rect,
    /// Cosmetic, radians
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    id: u32,
    offset: Vec2,
}

/// Short-lived feedback label; text comes from the rule's feedback labels
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: &'static str,
    pub good: bool,
    pub life: f32,
}

/// Result of releasing a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropResult {
    /// Released outside the target zone
    Missed,
    Matched(PieceKind),
    Mismatched(PieceKind),
}

#[derive(Debug, Clone)]
pub struct MatchState {
    pub tuning: MatchTuning,
    rng: Pcg32,
    machine: PhaseMachine,
    pub countdown: Countdown,
    pub score: ScoreState,
    pub pieces: Vec<Piece>,
    next_id: u32,
    spawner: SpawnScheduler,
    /// Current required kind under the rotating rule
    pub required: Option<PieceKind>,
    /// Collected counts under the inventory rule
    pub inventory: Vec<(PieceKind, u32)>,
    /// Objective completion, 0..=100
    pub progress: f32,
    grab: Option<Grab>,
    pub field: Vec2,
    layout_pending: bool,
    layout_retry: f32,
    pub particles: ParticleField,
    pub floats: Vec<FloatingText>,
    pub frame: f32,
    events: Vec<GameEvent>,
}

impl MatchState {
    pub fn new(tuning: MatchTuning, seed: u64) -> Self {
        let spawner = SpawnScheduler::new(
            tuning.spawn_every,
            tuning.spawn_every,
            tuning.spawn_cap,
            tuning.spawn_every,
        );
        let field = Vec2::new(tuning.field_width, tuning.field_height);
        let countdown = Countdown::new(tuning.session_secs);
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            machine: PhaseMachine::new(),
            countdown,
            score: ScoreState::new(),
            pieces: Vec::new(),
            next_id: 1,
            spawner,
            required: None,
            inventory: Vec::new(),
            progress: 0.0,
            grab: None,
            field,
            layout_pending: false,
            layout_retry: 0.0,
            particles: ParticleField::new(),
            floats: Vec::new(),
            frame: 0.0,
            events: Vec::new(),
        }
    }

    /// Playfield resized (e.g. container laid out). Any size is allowed;
    /// layout waits until a piece fits inside the spawn margins.
    pub fn set_field_size(&mut self, width: f32, height: f32) {
        self.field = Vec2::new(width.max(0.0), height.max(0.0));
    }

    pub fn outro_elapsed(&self) -> f32 {
        self.machine.outro_elapsed()
    }

    pub fn is_grabbing(&self) -> bool {
        self.grab.is_some()
    }

    pub fn grabbed_id(&self) -> Option<u32> {
        self.grab.map(|g| g.id)
    }

    /// Drop zone in field coordinates (before padding)
    pub fn target_rect(&self) -> Rect {
        let t = &self.tuning;
        let bottom = self.field.y * t.target_bottom;
        Rect::new(
            self.field.x / 2.0 - t.target_width / 2.0,
            bottom - t.target_height,
            t.target_width,
            t.target_height,
        )
    }

    /// Whether a piece center counts as dropped on the target. Padding widens
    /// the zone sideways and below.
    pub fn in_target(&self, center: Vec2) -> bool {
        let zone = self.target_rect();
        let t = &self.tuning;
        center.x > zone.x - t.target_pad_x
            && center.x < zone.right() + t.target_pad_x
            && center.y > zone.y
            && center.y < zone.bottom() + t.target_pad_y
    }

    pub fn objective_met(&self) -> bool {
        match &self.tuning.rule {
            RequiredRule::Rotating { .. } => self.progress >= 100.0,
            RequiredRule::Inventory { required } => required
                .iter()
                .all(|(kind, n)| self.collected(*kind) >= *n),
        }
    }

    pub fn collected(&self, kind: PieceKind) -> u32 {
        self.inventory
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }

    fn is_required(&self, kind: PieceKind) -> bool {
        match &self.tuning.rule {
            RequiredRule::Rotating { .. } => self.required == Some(kind),
            RequiredRule::Inventory { required } => required.iter().any(|(k, _)| *k == kind),
        }
    }

    fn draw_required(&mut self) {
        if let RequiredRule::Rotating { pool } = &self.tuning.rule {
            self.required = pool.choose(&mut self.rng).copied();
        }
    }

    fn inventory_progress(&self) -> f32 {
        let RequiredRule::Inventory { required } = &self.tuning.rule else {
            return self.progress;
        };
        let total: u32 = required.iter().map(|(_, n)| n).sum();
        if total == 0 {
            return 100.0;
        }
        let have: u32 = required
            .iter()
            .map(|(k, n)| self.collected(*k).min(*n))
            .sum();
        have as f32 / total as f32 * 100.0
    }

    fn spawn_piece(&mut self, kind: PieceKind) {
        let size = self.tuning.piece_size;
        let margin = self.tuning.spawn_margin;
        let x = uniform(&mut self.rng, margin, self.field.x - margin - size);
        let y = uniform(
            &mut self.rng,
            margin,
            margin + self.field.y * self.tuning.spawn_band,
        );
        let rotation = uniform(&mut self.rng, 0.0, std::f32::consts::TAU);
        let id = self.next_id;
        self.next_id += 1;
        self.pieces.push(Piece {
            id,
            kind,
            rect: Rect::new(x, y, size, size),
            rotation,
        });
        log::debug!("spawned {} #{id}", kind.as_str());
    }

    fn random_pool_kind(&mut self) -> Option<PieceKind> {
        match &self.tuning.rule {
            RequiredRule::Rotating { pool } => pool.choose(&mut self.rng).copied(),
            RequiredRule::Inventory { required } => {
                required.choose(&mut self.rng).map(|(k, _)| *k)
            }
        }
    }

    /// Smallest field a piece fits in, margins included
    fn min_field(&self) -> f32 {
        self.tuning.piece_size + 2.0 * self.tuning.spawn_margin
    }

    /// Lay out the initial pieces, or defer until the field can hold one
    fn try_layout(&mut self) {
        let min = self.min_field();
        if self.field.x < min || self.field.y < min {
            if !self.layout_pending {
                log::warn!(
                    "playfield {}x{} too small, retrying layout",
                    self.field.x,
                    self.field.y
                );
            }
            self.layout_pending = true;
            self.layout_retry = self.tuning.layout_retry_secs;
            return;
        }
        self.layout_pending = false;
        let initial = self.tuning.initial_pieces.clone();
        for (kind, count) in initial {
            for _ in 0..count {
                self.spawn_piece(kind);
            }
        }
        log::info!("laid out {} pieces", self.pieces.len());
    }

    fn piece_at(&self, point: Vec2) -> Option<usize> {
        self.pieces
            .iter()
            .rposition(|p| p.rect.contains_point(point))
    }

    fn on_drag(&mut self, ev: DragEvent) {
        match ev {
            DragEvent::Start { x, y } => {
                let point = Vec2::new(x, y);
                self.grab = None;
                if let Some(idx) = self.piece_at(point) {
                    // Grabbed piece draws on top
                    let piece = self.pieces.remove(idx);
                    self.grab = Some(Grab {
                        id: piece.id,
                        offset: point - Vec2::new(piece.rect.x, piece.rect.y),
                    });
                    self.pieces.push(piece);
                }
            }
            DragEvent::Move { x, y } => {
                let Some(grab) = self.grab else {
                    return;
                };
                if let Some(p) = self.pieces.iter_mut().find(|p| p.id == grab.id) {
                    p.rect.x = x - grab.offset.x;
                    p.rect.y = y - grab.offset.y;
                }
            }
            DragEvent::End { x, y } => {
                self.on_drag(DragEvent::Move { x, y });
                if let Some(grab) = self.grab.take() {
                    self.release(grab.id);
                }
            }
        }
    }

    /// Evaluate a released piece against the target zone
    pub fn release(&mut self, id: u32) -> DropResult {
        let Some(idx) = self.pieces.iter().position(|p| p.id == id) else {
            return DropResult::Missed;
        };
        let center = self.pieces[idx].rect.center();
        let kind = self.pieces[idx].kind;
        if !self.in_target(center) {
            return DropResult::Missed;
        }
        let (good_label, bad_label) = self.tuning.rule.feedback_labels();

        if self.is_required(kind) {
            self.pieces.remove(idx);
            self.score.award(self.tuning.match_score);
            match &self.tuning.rule {
                RequiredRule::Rotating { .. } => {
                    self.progress = (self.progress + self.tuning.progress_per_match).min(100.0);
                    self.draw_required();
                }
                RequiredRule::Inventory { .. } => {
                    match self.inventory.iter_mut().find(|(k, _)| *k == kind) {
                        Some((_, n)) => *n += 1,
                        None => self.inventory.push((kind, 1)),
                    }
                    self.progress = self.inventory_progress();
                }
            }
            self.particles
                .burst(&mut self.rng, center, 12, [1.0, 0.9, 0.3, 1.0]);
            self.floats.push(FloatingText {
                pos: center - Vec2::new(0.0, 50.0),
                text: good_label,
                good: true,
                life: 1.0,
            });
            self.events.push(GameEvent::Matched { kind });
            DropResult::Matched(kind)
        } else {
            if let MismatchPolicy::Penalty(points) = self.tuning.mismatch {
                self.pieces.remove(idx);
                self.score.penalize(points);
            }
            self.floats.push(FloatingText {
                pos: center - Vec2::new(0.0, 50.0),
                text: bad_label,
                good: false,
                life: 1.0,
            });
            self.events.push(GameEvent::Mismatched { kind });
            DropResult::Mismatched(kind)
        }
    }

    /// Finish early once the objective is met, banking the time bonus.
    /// Returns whether the session ended.
    pub fn finish(&mut self) -> bool {
        if self.machine.phase() != GamePhase::Playing || !self.objective_met() {
            return false;
        }
        self.score.time_remaining = self.countdown.remaining();
        let bonus = self.score.apply_time_bonus(self.tuning.time_bonus_multiplier);
        log::info!("finished early, time bonus {bonus}");
        self.grab = None;
        self.enter(true);
        true
    }

    fn enter(&mut self, won: bool) {
        let moved = if won {
            self.machine.trigger_win(self.tuning.win_outro_secs)
        } else {
            self.machine.trigger_loss(self.tuning.lose_outro_secs)
        };
        if moved {
            if won {
                let width = self.field.x;
                self.particles.confetti(&mut self.rng, width, 40);
            }
            self.events.push(GameEvent::PhaseChanged(self.machine.phase()));
        }
    }

    fn step_cosmetics(&mut self, dt: f32, ts: f32) {
        self.frame += ts;
        self.particles.step(ts);
        for f in self.floats.iter_mut() {
            f.pos.y -= 0.8 * ts;
            f.life -= dt;
        }
        self.floats.retain(|f| f.life > 0.0);
    }

    fn tick_playing(&mut self, input: &TickInput, dt: f32) {
        if self.layout_pending {
            self.layout_retry -= dt;
            if self.layout_retry <= 0.0 {
                self.try_layout();
            }
        }

        for ev in input.drags.iter().copied() {
            self.on_drag(ev);
        }
        if input.finish {
            self.finish();
        }
        if self.machine.phase() != GamePhase::Playing {
            return;
        }

        if self.tuning.spawn_every > 0.0
            && !self.layout_pending
            && self
                .spawner
                .advance(dt, self.pieces.len(), &mut self.rng)
        {
            if let Some(kind) = self.random_pool_kind() {
                self.spawn_piece(kind);
            }
        }

        match self.countdown.advance(dt) {
            Tick::Expired => {
                self.grab = None;
                let won = self.objective_met();
                self.enter(won);
            }
            Tick::Second(_) | Tick::None => {}
        }
    }
}

impl MiniGame for MatchState {
    fn start(&mut self) {
        let tuning = self.tuning.clone();
        self.machine.start();
        self.countdown = Countdown::new(tuning.session_secs);
        self.score = ScoreState::new();
        self.pieces.clear();
        self.next_id = 1;
        self.spawner.reset(tuning.spawn_every);
        self.inventory.clear();
        self.progress = 0.0;
        self.grab = None;
        self.layout_pending = false;
        self.particles.clear();
        self.floats.clear();
        self.frame = 0.0;
        self.events.clear();
        self.required = None;
        self.draw_required();
        self.try_layout();
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
            GamePhase::Playing => self.tick_playing(input, dt),
            GamePhase::WinPending | GamePhase::LosePending => {
                if let Some(outcome) = self.machine.advance_outro(dt) {
                    self.events.push(GameEvent::PhaseChanged(self.machine.phase()));
                    self.events.push(GameEvent::Finished {
                        won: outcome.won(),
                        score: self.score.score,
                    });
                }
            }
        }
        self.step_cosmetics(dt, ts);
    }

    fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score.score,
            phase: self.machine.phase(),
            seconds_left: self.countdown.shown_secs(),
            progress: self.progress,
            hint: self.required.map(PieceKind::as_str),
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

    fn wall() -> MatchState {
        let mut s = MatchState::new(MatchTuning::wall_builder(), 11);
        s.start();
        s
    }

    fn basket() -> MatchState {
        let mut s = MatchState::new(MatchTuning::flower_basket(), 12);
        s.start();
        s
    }

    /// Put a piece of `kind` in the middle of the target zone
    fn place(s: &mut MatchState, kind: PieceKind) -> u32 {
        let c = s.target_rect().center();
        let size = s.tuning.piece_size;
        let id = 1000 + s.pieces.len() as u32;
        s.pieces.push(Piece {
            id,
            kind,
            rect: Rect::centered(c, size, size),
            rotation: 0.0,
        });
        id
    }

    #[test]
    fn test_wall_spawns_on_interval_up_to_cap() {
        let mut s = wall();
        assert!(s.pieces.is_empty());
        for _ in 0..60 {
            s.tick(&TickInput::default(), DT);
        }
        assert_eq!(s.pieces.len(), 1);
        for _ in 0..(60 * 20) {
            s.tick(&TickInput::default(), DT);
        }
        assert_eq!(s.pieces.len(), 10);
    }

    #[test]
    fn test_rotating_match_adds_progress_and_redraws() {
        let mut s = wall();
        let kind = s.required.unwrap();
        let id = place(&mut s, kind);
        assert_eq!(s.release(id), DropResult::Matched(kind));
        assert!(s.pieces.iter().all(|p| p.id != id));
        assert_eq!(s.progress, 6.0);
        assert_eq!(s.score.score, 1);
        assert!(s.required.is_some());
    }

    #[test]
    fn test_wall_progress_caps_at_full() {
        let mut s = wall();
        for _ in 0..20 {
            let kind = s.required.unwrap();
            let id = place(&mut s, kind);
            s.release(id);
        }
        assert_eq!(s.progress, 100.0);
        assert!(s.objective_met());
    }

    #[test]
    fn test_wrong_shape_is_ignored() {
        let mut s = wall();
        let required = s.required.unwrap();
        let wrong = [PieceKind::Square, PieceKind::Circle, PieceKind::Triangle]
            .into_iter()
            .find(|k| *k != required)
            .unwrap();
        let id = place(&mut s, wrong);
        assert_eq!(s.release(id), DropResult::Mismatched(wrong));
        assert!(s.pieces.iter().any(|p| p.id == id));
        assert_eq!(s.score.score, 0);
        assert_eq!(s.progress, 0.0);
        assert_eq!(s.required, Some(required));
    }

    #[test]
    fn test_weed_penalty_and_removal() {
        let mut s = basket();
        let rose = place(&mut s, PieceKind::Rose);
        s.release(rose);
        assert_eq!(s.score.score, 10);

        let weed = place(&mut s, PieceKind::Weed);
        assert_eq!(s.release(weed), DropResult::Mismatched(PieceKind::Weed));
        assert!(s.pieces.iter().all(|p| p.id != weed));
        assert_eq!(s.score.score, 5);
    }

    #[test]
    fn test_drop_outside_target_misses() {
        let mut s = basket();
        s.pieces.push(Piece {
            id: 999,
            kind: PieceKind::Rose,
            rect: Rect::new(0.0, 0.0, 56.0, 56.0),
            rotation: 0.0,
        });
        assert_eq!(s.release(999), DropResult::Missed);
        assert_eq!(s.score.score, 0);
    }

    #[test]
    fn test_basket_lays_out_initial_pieces() {
        let s = basket();
        assert_eq!(s.pieces.len(), 38);
        assert_eq!(
            s.pieces.iter().filter(|p| p.kind == PieceKind::Weed).count(),
            8
        );
    }

    #[test]
    fn test_zero_size_field_retries_layout() {
        let mut s = MatchState::new(MatchTuning::flower_basket(), 3);
        s.set_field_size(0.0, 0.0);
        s.start();
        assert!(s.pieces.is_empty());

        s.set_field_size(800.0, 600.0);
        for _ in 0..10 {
            s.tick(&TickInput::default(), DT);
        }
        assert_eq!(s.pieces.len(), 38);
    }

    #[test]
    fn test_drag_moves_topmost_piece() {
        let mut s = basket();
        s.pieces.clear();
        s.pieces.push(Piece {
            id: 1,
            kind: PieceKind::Rose,
            rect: Rect::new(100.0, 100.0, 56.0, 56.0),
            rotation: 0.0,
        });
        s.pieces.push(Piece {
            id: 2,
            kind: PieceKind::Violet,
            rect: Rect::new(110.0, 110.0, 56.0, 56.0),
            rotation: 0.0,
        });

        let input = TickInput {
            drags: vec![
                DragEvent::Start { x: 120.0, y: 120.0 },
                DragEvent::Move { x: 220.0, y: 140.0 },
            ],
            ..Default::default()
        };
        s.tick(&input, DT);
        assert_eq!(s.grabbed_id(), Some(2));
        let moved = s.pieces.iter().find(|p| p.id == 2).unwrap();
        assert_eq!((moved.rect.x, moved.rect.y), (210.0, 130.0));
    }

    #[test]
    fn test_drag_end_on_target_collects() {
        let mut s = basket();
        s.pieces.clear();
        s.pieces.push(Piece {
            id: 1,
            kind: PieceKind::Daisy,
            rect: Rect::new(100.0, 100.0, 56.0, 56.0),
            rotation: 0.0,
        });
        let c = s.target_rect().center();
        let input = TickInput {
            drags: vec![
                DragEvent::Start { x: 128.0, y: 128.0 },
                DragEvent::End { x: c.x, y: c.y },
            ],
            ..Default::default()
        };
        s.tick(&input, DT);
        assert!(s.pieces.is_empty());
        assert_eq!(s.collected(PieceKind::Daisy), 1);
        assert!(!s.is_grabbing());
    }

    #[test]
    fn test_finish_requires_objective_and_adds_bonus() {
        let mut s = basket();
        assert!(!s.finish());

        for kind in [PieceKind::Rose, PieceKind::Violet, PieceKind::Daisy] {
            for _ in 0..5 {
                let id = place(&mut s, kind);
                s.release(id);
            }
        }
        assert!((s.progress - 100.0).abs() < 1e-3);
        assert_eq!(s.score.score, 150);
        assert!(s.finish());
        assert_eq!(s.phase(), GamePhase::WinPending);
        assert_eq!(s.score.score, 150 + 180 * 5);
    }

    #[test]
    fn test_expiry_decides_outcome_then_finishes_once() {
        let mut s = wall();
        for _ in 0..(31 * 60) {
            s.tick(&TickInput::default(), DT);
        }
        assert_eq!(s.phase(), GamePhase::LosePending);
        for _ in 0..(4 * 60) {
            s.tick(&TickInput::default(), DT);
        }
        assert_eq!(s.phase(), GamePhase::Lost);
        let finished = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Finished { .. }))
            .count();
        assert_eq!(finished, 1);
    }

    #[test]
    fn test_tiny_field_waits_for_usable_size() {
        let mut s = MatchState::new(MatchTuning::flower_basket(), 3);
        s.set_field_size(1.0, 1.0);
        s.start();
        assert!(s.pieces.is_empty());
        for _ in 0..10 {
            s.tick(&TickInput::default(), DT);
        }
        assert!(s.pieces.is_empty());

        s.set_field_size(800.0, 600.0);
        for _ in 0..10 {
            s.tick(&TickInput::default(), DT);
        }
        assert_eq!(s.pieces.len(), 38);
        let min = s.tuning.spawn_margin;
        assert!(s.pieces.iter().all(|p| p.rect.x >= min && p.rect.right() <= 800.0 - min));
    }

    #[test]
    fn test_wall_spawns_wait_for_usable_size() {
        let mut s = MatchState::new(MatchTuning::wall_builder(), 4);
        s.set_field_size(100.0, 600.0);
        s.start();
        for _ in 0..(3 * 60) {
            s.tick(&TickInput::default(), DT);
        }
        assert!(s.pieces.is_empty());

        s.set_field_size(800.0, 600.0);
        for _ in 0..(2 * 60) {
            s.tick(&TickInput::default(), DT);
        }
        assert!(!s.pieces.is_empty());
    }

    #[test]
    fn test_expiry_with_wall_complete_wins() {
        let mut s = wall();
        s.progress = 100.0;
        let mut saw_loss = false;
        for _ in 0..(31 * 60) {
            s.tick(&TickInput::default(), DT);
            saw_loss |= matches!(s.phase(), GamePhase::LosePending | GamePhase::Lost);
        }
        assert!(!saw_loss);
        assert_eq!(s.phase(), GamePhase::WinPending);
        for _ in 0..(4 * 60) {
            s.tick(&TickInput::default(), DT);
        }
        assert_eq!(s.phase(), GamePhase::Won);
        let finished: Vec<_> = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Finished { .. }))
            .collect();
        assert_eq!(finished.len(), 1);
        assert!(matches!(finished[0], GameEvent::Finished { won: true, .. }));
    }

    #[test]
    fn test_expiry_with_basket_complete_wins() {
        let mut s = basket();
        if let RequiredRule::Inventory { required } = s.tuning.rule.clone() {
            s.inventory = required;
        }
        assert!(s.objective_met());
        for _ in 0..(181 * 60) {
            s.tick(&TickInput::default(), DT);
        }
        assert_eq!(s.phase(), GamePhase::WinPending);
        for _ in 0..(2 * 60) {
            s.tick(&TickInput::default(), DT);
        }
        assert_eq!(s.phase(), GamePhase::Won);
    }

    #[test]
    fn test_wall_feedback_labels() {
        let mut s = wall();
        let required = s.required.unwrap();
        let id = place(&mut s, required);
        s.release(id);
        assert_eq!(s.floats.last().map(|f| (f.text, f.good)), Some(("+Wall!", true)));

        let required = s.required.unwrap();
        let wrong = [PieceKind::Square, PieceKind::Circle, PieceKind::Triangle]
            .into_iter()
            .find(|k| *k != required)
            .unwrap();
        let id = place(&mut s, wrong);
        s.release(id);
        assert_eq!(
            s.floats.last().map(|f| (f.text, f.good)),
            Some(("Wrong Shape!", false))
        );
    }

    #[test]
    fn test_basket_feedback_labels() {
        let mut s = basket();
        let id = place(&mut s, PieceKind::Rose);
        s.release(id);
        assert_eq!(s.floats.last().map(|f| f.text), Some("+1"));
        let id = place(&mut s, PieceKind::Weed);
        s.release(id);
        assert_eq!(s.floats.last().map(|f| f.text), Some("Wrong!"));
    }

    #[test]
    fn test_drags_ignored_after_session() {
        let mut s = wall();
        s.machine.trigger_loss(0.0);
        let before = s.pieces.clone();
        let input = TickInput {
            drags: vec![DragEvent::Start { x: 0.0, y: 0.0 }],
            ..Default::default()
        };
        s.tick(&input, DT);
        assert_eq!(s.pieces, before);
        assert!(!s.is_grabbing());
    }
}
