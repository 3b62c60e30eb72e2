//! Property tests for the simulation invariants

use fable_dash::sim::collision::{CollisionRules, Contact, ObstaclePolicy, resolve};
use fable_dash::sim::entity::{EntityKind, EntityStore, PickupKind};
use fable_dash::sim::physics::{Player, PlayerIntent, step_player};
use fable_dash::sim::rect::Rect;
use fable_dash::sim::timer::{Countdown, ScoreState};
use fable_dash::sim::{MatchState, RaceState, RunnerState};
use fable_dash::{
    GamePhase, MatchTuning, MiniGame, RaceTuning, RunnerTuning, SnapshotThrottle, TickInput,
};
use proptest::prelude::*;

fn rect() -> impl Strategy<Value = Rect> {
    (-200.0f32..200.0, -200.0f32..200.0, 0.0f32..120.0, 0.0f32..120.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn phase_step_allowed(prev: GamePhase, next: GamePhase) -> bool {
    prev == next
        || prev.can_advance_to(next)
        // play again
        || (prev.is_terminal() && next == GamePhase::Playing)
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in rect(), b in rect()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn player_never_sinks_below_ground(
        jump_velocity in -20.0f32..-1.0,
        gravity in 0.1f32..2.0,
        steps in prop::collection::vec(0.0f32..6.0, 1..200),
    ) {
        let ground = 160.0;
        let mut player = Player::new(40.0, ground, 30.0, 50.0, 25.0);
        player.apply(PlayerIntent::Jump, jump_velocity);
        for ts in steps {
            step_player(&mut player, ground, gravity, ts);
            prop_assert!(player.y <= ground);
        }
    }

    #[test]
    fn resolving_twice_scores_nothing_new(
        xs in prop::collection::vec(-100.0f32..400.0, 1..12),
        stumble in any::<bool>(),
    ) {
        let mut store = EntityStore::new();
        for (i, x) in xs.iter().enumerate() {
            let kind = match i % 3 {
                0 => EntityKind::ObstacleLow,
                1 => EntityKind::ObstacleHigh,
                _ => EntityKind::Pickup(PickupKind::Star),
            };
            store.spawn(kind, Rect::new(*x, 300.0, 40.0, 40.0));
        }
        let rules = CollisionRules {
            padding: 4.0,
            catch_margin: 20.0,
            obstacle_policy: if stumble {
                ObstaclePolicy::Stumble { push: 30.0 }
            } else {
                ObstaclePolicy::Fatal
            },
        };
        let player = Rect::new(150.0, 280.0, 50.0, 90.0);

        resolve(&player, &mut store, &rules);
        let again = resolve(&player, &mut store, &rules);
        let repeated_contact = again.iter().any(|c| matches!(
            c,
            Contact::Passed { .. } | Contact::Stumbled { .. } | Contact::Collected { .. }
        ));
        prop_assert!(!repeated_contact);
    }

    #[test]
    fn countdown_never_negative_or_rising(steps in prop::collection::vec(-1.0f32..3.0, 1..60)) {
        let mut c = Countdown::new(20.0);
        let mut last = c.remaining();
        for dt in steps {
            c.advance(dt);
            prop_assert!(c.remaining() >= 0.0);
            prop_assert!(c.remaining() <= last);
            last = c.remaining();
        }
    }

    #[test]
    fn score_never_negative(ops in prop::collection::vec((any::<bool>(), -50i64..50), 0..40)) {
        let mut score = ScoreState::new();
        for (award, points) in ops {
            if award {
                score.award(points);
            } else {
                score.penalize(points);
            }
            prop_assert!(score.score >= 0);
        }
    }

    #[test]
    fn throttle_never_repeats_a_snapshot(
        frames in prop::collection::vec((0.0f64..40.0, 0i64..3), 1..80),
    ) {
        let mut throttle = SnapshotThrottle::new(100.0);
        let mut now = 0.0;
        let mut last_sent = None;
        for (gap, score) in frames {
            now += gap;
            let snap = fable_dash::HudSnapshot {
                score,
                phase: GamePhase::Playing,
                seconds_left: 10,
                progress: 0.0,
                hint: None,
            };
            if let Some(sent) = throttle.offer(now, snap) {
                prop_assert_ne!(Some(&sent), last_sent.as_ref());
                last_sent = Some(sent);
            }
        }
    }

    #[test]
    fn runner_phases_only_move_forward(
        seed in any::<u64>(),
        inputs in prop::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..0.2), 1..400),
    ) {
        let mut game = RunnerState::new(RunnerTuning::midnight_dash(), seed);
        game.start();
        let ground = game.tuning.ground_y;
        let mut phase = game.phase();
        for (jump, slide_held, dt) in inputs {
            let input = TickInput { jump, slide_held, ..Default::default() };
            game.tick(&input, dt);
            let next = game.phase();
            prop_assert!(phase_step_allowed(phase, next), "{:?} -> {:?}", phase, next);
            if next == GamePhase::Playing {
                prop_assert!(game.player.y <= ground + 1e-3);
            }
            prop_assert!(game.snapshot().score >= 0);
            phase = next;
        }
    }

    #[test]
    fn race_phases_only_move_forward(
        seed in any::<u64>(),
        inputs in prop::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..0.2), 1..400),
    ) {
        let mut game = RaceState::new(RaceTuning::default(), seed);
        game.start();
        let mut phase = game.phase();
        for (steer_left, steer_right, dt) in inputs {
            let input = TickInput { steer_left, steer_right, ..Default::default() };
            game.tick(&input, dt);
            let next = game.phase();
            prop_assert!(phase_step_allowed(phase, next), "{:?} -> {:?}", phase, next);
            let p = game.snapshot().progress;
            prop_assert!((0.0..=100.0).contains(&p));
            phase = next;
        }
    }

    #[test]
    fn match_progress_stays_in_range(
        seed in any::<u64>(),
        drops in prop::collection::vec((0.0f32..800.0, 0.0f32..600.0, 0.0f32..0.5), 1..60),
    ) {
        use fable_dash::sim::DragEvent;
        let mut game = MatchState::new(MatchTuning::flower_basket(), seed);
        game.set_field_size(800.0, 600.0);
        game.start();
        let mut phase = game.phase();
        for (x, y, dt) in drops {
            // Grab whatever is at (x, y) and drop it in the target zone
            let target = game.target_rect().center();
            let input = TickInput {
                drags: vec![
                    DragEvent::Start { x, y },
                    DragEvent::Move { x: target.x, y: target.y },
                    DragEvent::End { x: target.x, y: target.y },
                ],
                ..Default::default()
            };
            game.tick(&input, dt);
            let next = game.phase();
            prop_assert!(phase_step_allowed(phase, next), "{:?} -> {:?}", phase, next);
            prop_assert!((0.0..=100.0).contains(&game.progress));
            prop_assert!(game.snapshot().score >= 0);
            phase = next;
        }
    }
}
