//! Game balance as data
//!
//! Every per-frame quantity (gravity, speeds, recovery rates) is expressed in
//! reference frames at 60 Hz and scaled by [`crate::time_scale`] at runtime.
//! Durations are in seconds. Presets reproduce each storybook game; any field
//! can be overridden from JSON.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::sim::collision::ObstaclePolicy;
use crate::sim::entity::{EntityKind, PickupKind};
use crate::sim::matching::PieceKind;

fn check(field: &'static str, ok: bool, reason: impl Into<String>) -> Result<(), TuningError> {
    if ok {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            reason: reason.into(),
        })
    }
}

/// How a runner session is won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WinCondition {
    /// Still running when the countdown expires
    #[default]
    Survive,
    /// Countdown expiry spawns a goal marker that must be touched
    ReachGoal,
}

/// Size and placement of one obstacle kind. The top edge sits at
/// `ground_y - lift - h`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleShape {
    pub w: f32,
    pub h: f32,
    pub lift: f32,
}

/// Endless-runner balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    pub field_width: f32,
    pub field_height: f32,
    pub ground_y: f32,

    pub player_x: f32,
    pub player_w: f32,
    pub player_h: f32,
    pub slide_h: f32,
    pub gravity: f32,
    pub jump_velocity: f32,

    pub base_speed: f32,
    /// Speed gained per second of play
    pub speed_ramp: f32,
    pub max_speed: f32,

    pub session_secs: f32,
    pub win_condition: WinCondition,
    pub obstacle_policy: ObstaclePolicy,
    pub collision_padding: f32,

    pub spawn_min: f32,
    pub spawn_max: f32,
    pub first_spawn: f32,
    pub spawn_cap: usize,
    /// Distance beyond the right edge where new entities appear
    pub spawn_margin: f32,
    /// Scrolling entities are culled once their right edge passes this x
    pub cull_x: f32,
    pub spawn_kinds: Vec<EntityKind>,
    pub low_obstacle: ObstacleShape,
    pub high_obstacle: ObstacleShape,
    pub pickup_size: f32,
    /// Pickup hovers this far above the ground line
    pub pickup_lift: f32,

    pub antagonist_home_x: f32,
    pub antagonist_w: f32,
    pub antagonist_h: f32,
    /// Drift back toward home per frame after a stumble
    pub antagonist_recovery: f32,
    pub catch_margin: f32,

    pub goal_size: f32,
    pub goal_margin: f32,

    pub pass_score: i64,
    pub pickup_score: i64,

    pub win_outro_secs: f32,
    pub lose_outro_secs: f32,
    pub pounce_secs: f32,
    pub pounce_height: f32,
    /// Antagonist retreat per frame during the win outro
    pub retreat_speed: f32,
    /// Ally (huntsman) walk-in speed during the win outro; zero disables it
    pub ally_speed: f32,

    pub jump_particles: usize,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self::midnight_dash()
    }
}

impl RunnerTuning {
    /// Red riding hood: survive the countdown, every obstacle is fatal
    pub fn forest_dash() -> Self {
        let ground_y = 198.0 - 32.0;
        Self {
            field_width: 352.0,
            field_height: 198.0,
            ground_y,
            player_x: 60.0,
            player_w: 20.0,
            player_h: 40.0,
            slide_h: 20.0,
            gravity: 0.44,
            jump_velocity: -8.1,
            base_speed: 2.43,
            speed_ramp: 0.02,
            max_speed: 4.85,
            session_secs: 90.0,
            win_condition: WinCondition::Survive,
            obstacle_policy: ObstaclePolicy::Fatal,
            collision_padding: 6.0,
            spawn_min: 0.8,
            spawn_max: 4.0,
            first_spawn: 1.0,
            spawn_cap: 8,
            spawn_margin: 0.0,
            cull_x: -50.0,
            spawn_kinds: vec![EntityKind::ObstacleLow, EntityKind::ObstacleHigh],
            low_obstacle: ObstacleShape {
                w: 25.0,
                h: 25.0,
                lift: -5.0,
            },
            high_obstacle: ObstacleShape {
                w: 30.0,
                h: 25.0,
                lift: 20.0,
            },
            pickup_size: 12.0,
            pickup_lift: 50.0,
            antagonist_home_x: -120.0,
            antagonist_w: 40.0,
            antagonist_h: 28.0,
            antagonist_recovery: 0.0,
            catch_margin: 20.0,
            goal_size: 0.0,
            goal_margin: 0.0,
            pass_score: 100,
            pickup_score: 0,
            win_outro_secs: 2.5,
            lose_outro_secs: 1.5,
            pounce_secs: 0.5,
            pounce_height: 80.0,
            retreat_speed: 0.3,
            ally_speed: 1.2,
            jump_particles: 5,
        }
    }

    /// Cinderella: outrun the guard, then reach the carriage
    pub fn midnight_dash() -> Self {
        Self {
            field_width: 800.0,
            field_height: 450.0,
            ground_y: 380.0,
            player_x: 150.0,
            player_w: 50.0,
            player_h: 90.0,
            slide_h: 45.0,
            gravity: 0.6,
            jump_velocity: -14.0,
            base_speed: 6.0,
            speed_ramp: 0.0,
            max_speed: 6.0,
            session_secs: 90.0,
            win_condition: WinCondition::ReachGoal,
            obstacle_policy: ObstaclePolicy::Stumble { push: 100.0 },
            collision_padding: 0.0,
            spawn_min: 1.5,
            spawn_max: 3.0,
            first_spawn: 1.5,
            spawn_cap: 8,
            spawn_margin: 50.0,
            cull_x: -100.0,
            spawn_kinds: vec![
                EntityKind::ObstacleLow,
                EntityKind::ObstacleHigh,
                EntityKind::ObstacleLow,
                EntityKind::ObstacleHigh,
                EntityKind::Pickup(PickupKind::Star),
            ],
            low_obstacle: ObstacleShape {
                w: 50.0,
                h: 50.0,
                lift: 0.0,
            },
            high_obstacle: ObstacleShape {
                w: 50.0,
                h: 60.0,
                lift: 80.0,
            },
            pickup_size: 28.0,
            pickup_lift: 120.0,
            antagonist_home_x: 20.0,
            antagonist_w: 50.0,
            antagonist_h: 90.0,
            antagonist_recovery: 0.5,
            catch_margin: 20.0,
            goal_size: 120.0,
            goal_margin: 100.0,
            pass_score: 100,
            pickup_score: 50,
            win_outro_secs: 1.5,
            lose_outro_secs: 1.0,
            pounce_secs: 0.5,
            pounce_height: 40.0,
            retreat_speed: 0.5,
            ally_speed: 0.0,
            jump_particles: 5,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let t: Self = serde_json::from_str(json)?;
        t.validate()?;
        Ok(t)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        check(
            "field_width",
            self.field_width > 0.0 && self.field_height > 0.0,
            "field must have positive size",
        )?;
        check(
            "ground_y",
            self.ground_y > 0.0 && self.ground_y <= self.field_height,
            format!("{} outside 0..={}", self.ground_y, self.field_height),
        )?;
        check("gravity", self.gravity > 0.0, "must be positive")?;
        check("jump_velocity", self.jump_velocity < 0.0, "must point up (negative)")?;
        check(
            "slide_h",
            self.slide_h > 0.0 && self.slide_h <= self.player_h,
            "must be within 0..=player_h",
        )?;
        check(
            "max_speed",
            self.max_speed >= self.base_speed && self.base_speed >= 0.0,
            "must be >= base_speed",
        )?;
        check(
            "spawn_min",
            self.spawn_min > 0.0 && self.spawn_min <= self.spawn_max,
            "need 0 < spawn_min <= spawn_max",
        )?;
        check("spawn_kinds", !self.spawn_kinds.is_empty(), "at least one kind")?;
        check(
            "spawn_kinds",
            !self
                .spawn_kinds
                .iter()
                .any(|k| matches!(k, EntityKind::Player | EntityKind::Antagonist | EntityKind::Goal)),
            "only obstacles and pickups spawn on a timer",
        )?;
        check(
            "goal_size",
            self.win_condition == WinCondition::Survive || self.goal_size > 0.0,
            "reach-goal sessions need a goal",
        )?;
        check("session_secs", self.session_secs > 0.0, "must be positive")?;
        Ok(())
    }
}

/// Tortoise-and-hare lane race balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceTuning {
    /// Lateral bounds in percent of road width
    pub lane_min: f32,
    pub lane_max: f32,
    pub lane_speed: f32,
    pub start_lane: f32,
    pub base_speed: f32,
    pub boost_speed: f32,
    pub boost_secs: f32,
    /// Fraction of the gap to target speed closed per frame
    pub speed_ease: f32,
    pub finish_z: f32,

    pub rival_start_z: f32,
    pub rival_speed: f32,
    pub rival_min_speed: f32,
    /// Speed lost per frame until the floor
    pub rival_decay: f32,

    pub pickup_start_z: f32,
    pub pickup_every: f32,
    pub pickup_jitter: f32,
    pub pickup_lane_min: f32,
    pub pickup_lane_max: f32,
    pub reach_dz: f32,
    pub reach_dx: f32,

    pub outro_secs: f32,
    /// Speed multiplier per frame during the outro
    pub outro_decay: f32,
    /// Confetti stops this long before the outro ends
    pub confetti_secs: f32,
}

impl Default for RaceTuning {
    fn default() -> Self {
        Self {
            lane_min: 10.0,
            lane_max: 90.0,
            lane_speed: 1.8,
            start_lane: 50.0,
            base_speed: 18.0,
            boost_speed: 34.0,
            boost_secs: 2.0,
            speed_ease: 0.1,
            finish_z: 100_000.0,
            rival_start_z: 6000.0,
            rival_speed: 26.5,
            rival_min_speed: 13.5,
            rival_decay: 0.0036,
            pickup_start_z: 1000.0,
            pickup_every: 800.0,
            pickup_jitter: 200.0,
            pickup_lane_min: 20.0,
            pickup_lane_max: 80.0,
            reach_dz: 60.0,
            reach_dx: 15.0,
            outro_secs: 3.0,
            outro_decay: 0.95,
            confetti_secs: 2.5,
        }
    }
}

impl RaceTuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let t: Self = serde_json::from_str(json)?;
        t.validate()?;
        Ok(t)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        check(
            "lane_min",
            self.lane_min < self.lane_max,
            "lane_min must be below lane_max",
        )?;
        check(
            "start_lane",
            (self.lane_min..=self.lane_max).contains(&self.start_lane),
            "must be within the lane bounds",
        )?;
        check("finish_z", self.finish_z > 0.0, "must be positive")?;
        check("pickup_every", self.pickup_every > 0.0, "must be positive")?;
        check(
            "pickup_lane_min",
            self.pickup_lane_min <= self.pickup_lane_max,
            "pickup lane range is inverted",
        )?;
        check(
            "speed_ease",
            self.speed_ease > 0.0 && self.speed_ease <= 1.0,
            "must be within (0, 1]",
        )?;
        check(
            "rival_min_speed",
            self.rival_min_speed <= self.rival_speed,
            "floor above starting speed",
        )?;
        Ok(())
    }
}

/// What counts as a satisfied objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequiredRule {
    /// One required kind at a time, re-drawn from `pool` after each match
    Rotating { pool: Vec<PieceKind> },
    /// Fixed counts per kind
    Inventory { required: Vec<(PieceKind, u32)> },
}

impl RequiredRule {
    /// Floating labels for a match and a mismatch
    pub fn feedback_labels(&self) -> (&'static str, &'static str) {
        match self {
            RequiredRule::Rotating { .. } => ("+Wall!", "Wrong Shape!"),
            RequiredRule::Inventory { .. } => ("+1", "Wrong!"),
        }
    }
}

/// What dropping the wrong piece on the target does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MismatchPolicy {
    /// Piece stays on the field, nothing else happens
    Ignore,
    /// Piece is discarded and the score drops
    Penalty(i64),
}

/// Drag-and-drop collection balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTuning {
    pub field_width: f32,
    pub field_height: f32,
    pub session_secs: f32,
    pub piece_size: f32,
    /// Keep-out margin from the field edges when placing pieces
    pub spawn_margin: f32,
    /// Height of the placement band below the margin, as a fraction of the field
    pub spawn_band: f32,

    /// Interval between timed spawns; zero lays out `initial_pieces` once
    pub spawn_every: f32,
    pub spawn_cap: usize,
    /// Pieces laid out at session start
    pub initial_pieces: Vec<(PieceKind, u32)>,

    pub rule: RequiredRule,
    pub mismatch: MismatchPolicy,
    pub match_score: i64,
    /// Progress added per match under the rotating rule, out of 100.
    /// Inventory progress is derived from the counts instead.
    pub progress_per_match: f32,
    pub time_bonus_multiplier: i64,

    /// Target zone: centered horizontally, bottom at `target_bottom * height`
    pub target_width: f32,
    pub target_height: f32,
    pub target_bottom: f32,
    pub target_pad_x: f32,
    pub target_pad_y: f32,

    pub win_outro_secs: f32,
    pub lose_outro_secs: f32,
    /// Delay before retrying layout when the field has no size yet
    pub layout_retry_secs: f32,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self::wall_builder()
    }
}

impl MatchTuning {
    /// Three pigs: drop the requested shape on the wall before the wolf blows
    pub fn wall_builder() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            session_secs: 30.0,
            piece_size: 60.0,
            spawn_margin: 60.0,
            spawn_band: 0.5,
            spawn_every: 0.8,
            spawn_cap: 10,
            initial_pieces: Vec::new(),
            rule: RequiredRule::Rotating {
                pool: vec![PieceKind::Square, PieceKind::Circle, PieceKind::Triangle],
            },
            mismatch: MismatchPolicy::Ignore,
            match_score: 1,
            progress_per_match: 6.0,
            time_bonus_multiplier: 0,
            target_width: 128.0,
            target_height: 350.0,
            target_bottom: 0.8,
            target_pad_x: 20.0,
            target_pad_y: 50.0,
            win_outro_secs: 3.0,
            lose_outro_secs: 3.0,
            layout_retry_secs: 0.1,
        }
    }

    /// Red riding hood: fill the basket with the listed flowers, skip weeds
    pub fn flower_basket() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            session_secs: 180.0,
            piece_size: 56.0,
            spawn_margin: 50.0,
            spawn_band: 0.5,
            spawn_every: 0.0,
            spawn_cap: 38,
            initial_pieces: vec![
                (PieceKind::Rose, 10),
                (PieceKind::Violet, 10),
                (PieceKind::Daisy, 10),
                (PieceKind::Weed, 8),
            ],
            rule: RequiredRule::Inventory {
                required: vec![
                    (PieceKind::Rose, 5),
                    (PieceKind::Violet, 5),
                    (PieceKind::Daisy, 5),
                ],
            },
            mismatch: MismatchPolicy::Penalty(5),
            match_score: 10,
            progress_per_match: 0.0,
            time_bonus_multiplier: 5,
            target_width: 200.0,
            target_height: 140.0,
            target_bottom: 0.95,
            target_pad_x: 20.0,
            target_pad_y: 20.0,
            win_outro_secs: 1.0,
            lose_outro_secs: 1.0,
            layout_retry_secs: 0.1,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let t: Self = serde_json::from_str(json)?;
        t.validate()?;
        Ok(t)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        check("session_secs", self.session_secs > 0.0, "must be positive")?;
        check("piece_size", self.piece_size > 0.0, "must be positive")?;
        check(
            "spawn_every",
            self.spawn_every > 0.0 || !self.initial_pieces.is_empty(),
            "pieces must come from a timer or an initial layout",
        )?;
        match &self.rule {
            RequiredRule::Rotating { pool } => {
                check("rule", !pool.is_empty(), "rotating pool is empty")?;
                check(
                    "progress_per_match",
                    self.progress_per_match > 0.0,
                    "rotating objective would never fill",
                )?;
            }
            RequiredRule::Inventory { required } => {
                check("rule", !required.is_empty(), "inventory is empty")?;
            }
        }
        check(
            "spawn_band",
            (0.0..=1.0).contains(&self.spawn_band),
            "fraction of field height",
        )?;
        check(
            "target_bottom",
            (0.0..=1.0).contains(&self.target_bottom),
            "fraction of field height",
        )?;
        Ok(())
    }
}
