//! The playable titles and a single type that runs any of them

use glam::Vec2;

use crate::input::InputMode;
use crate::renderer::{RenderOptions, Vertex, match_frame, race_frame, runner_frame};
use crate::sim::{
    GameEvent, GamePhase, HudSnapshot, MatchState, MiniGame, RaceState, RunnerState, TickInput,
    race,
};
use crate::tuning::{MatchTuning, RaceTuning, RunnerTuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    ForestDash,
    MidnightDash,
    HareRace,
    WallBuilder,
    FlowerBasket,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::ForestDash,
        GameKind::MidnightDash,
        GameKind::HareRace,
        GameKind::WallBuilder,
        GameKind::FlowerBasket,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            GameKind::ForestDash => "forest-dash",
            GameKind::MidnightDash => "midnight-dash",
            GameKind::HareRace => "hare-race",
            GameKind::WallBuilder => "wall-builder",
            GameKind::FlowerBasket => "flower-basket",
        }
    }

    /// Parse the `?game=` query value
    pub fn from_slug(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.slug() == s)
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::ForestDash => "Forest Dash",
            GameKind::MidnightDash => "Midnight Dash",
            GameKind::HareRace => "The Tortoise and the Hare",
            GameKind::WallBuilder => "Pigs vs Wolf: Wall Builder",
            GameKind::FlowerBasket => "Flowers for Grandma",
        }
    }

    pub fn input_mode(self) -> InputMode {
        match self {
            GameKind::ForestDash | GameKind::MidnightDash => InputMode::Runner,
            GameKind::HareRace => InputMode::Race,
            GameKind::WallBuilder | GameKind::FlowerBasket => InputMode::Drag,
        }
    }
}

/// One of the three game variants behind the common interface
#[derive(Debug, Clone)]
pub enum AnyGame {
    Runner(RunnerState),
    Race(RaceState),
    Match(MatchState),
}

impl AnyGame {
    pub fn new(kind: GameKind, seed: u64) -> Self {
        match kind {
            GameKind::ForestDash => AnyGame::Runner(RunnerState::new(RunnerTuning::forest_dash(), seed)),
            GameKind::MidnightDash => {
                AnyGame::Runner(RunnerState::new(RunnerTuning::midnight_dash(), seed))
            }
            GameKind::HareRace => AnyGame::Race(RaceState::new(RaceTuning::default(), seed)),
            GameKind::WallBuilder => AnyGame::Match(MatchState::new(MatchTuning::wall_builder(), seed)),
            GameKind::FlowerBasket => {
                AnyGame::Match(MatchState::new(MatchTuning::flower_basket(), seed))
            }
        }
    }

    /// Logical drawing area
    pub fn field(&self) -> Vec2 {
        match self {
            AnyGame::Runner(s) => Vec2::new(s.tuning.field_width, s.tuning.field_height),
            AnyGame::Race(_) => race::FIELD,
            AnyGame::Match(s) => s.field,
        }
    }

    /// The drag field follows its container; the other fields are fixed
    pub fn set_container_size(&mut self, width: f32, height: f32) {
        if let AnyGame::Match(s) = self {
            s.set_field_size(width, height);
        }
    }

    pub fn draw(&self, opts: &RenderOptions) -> Vec<Vertex> {
        match self {
            AnyGame::Runner(s) => runner_frame(s, opts),
            AnyGame::Race(s) => race_frame(s, opts),
            AnyGame::Match(s) => match_frame(s, opts),
        }
    }
}

impl MiniGame for AnyGame {
    fn start(&mut self) {
        match self {
            AnyGame::Runner(s) => s.start(),
            AnyGame::Race(s) => s.start(),
            AnyGame::Match(s) => s.start(),
        }
    }

    fn tick(&mut self, input: &TickInput, dt: f32) {
        match self {
            AnyGame::Runner(s) => s.tick(input, dt),
            AnyGame::Race(s) => s.tick(input, dt),
            AnyGame::Match(s) => s.tick(input, dt),
        }
    }

    fn phase(&self) -> GamePhase {
        match self {
            AnyGame::Runner(s) => s.phase(),
            AnyGame::Race(s) => s.phase(),
            AnyGame::Match(s) => s.phase(),
        }
    }

    fn snapshot(&self) -> HudSnapshot {
        match self {
            AnyGame::Runner(s) => s.snapshot(),
            AnyGame::Race(s) => s.snapshot(),
            AnyGame::Match(s) => s.snapshot(),
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        match self {
            AnyGame::Runner(s) => s.drain_events(),
            AnyGame::Race(s) => s.drain_events(),
            AnyGame::Match(s) => s.drain_events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(GameKind::from_slug(" Hare-Race "), Some(GameKind::HareRace));
        assert_eq!(GameKind::from_slug("pong"), None);
    }

    #[test]
    fn test_every_game_starts_from_menu() {
        for kind in GameKind::ALL {
            let mut game = AnyGame::new(kind, 42);
            assert_eq!(game.phase(), GamePhase::Menu);
            game.start();
            assert_eq!(game.phase(), GamePhase::Playing, "{}", kind.title());
        }
    }

    #[test]
    fn test_fields() {
        assert_eq!(AnyGame::new(GameKind::ForestDash, 1).field(), Vec2::new(352.0, 198.0));
        assert_eq!(AnyGame::new(GameKind::HareRace, 1).field(), race::FIELD);
    }

    #[test]
    fn test_only_drag_field_follows_container() {
        let mut wall = AnyGame::new(GameKind::WallBuilder, 1);
        wall.set_container_size(640.0, 480.0);
        assert_eq!(wall.field(), Vec2::new(640.0, 480.0));

        let mut lanes = AnyGame::new(GameKind::HareRace, 1);
        lanes.set_container_size(640.0, 480.0);
        assert_eq!(lanes.field(), race::FIELD);
    }
}
