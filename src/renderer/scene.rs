//! Scene builders: game state to a triangle list in field coordinates
//!
//! These are pure functions over `&State`. Draw order is background, scrolling
//! entities, player, pursuer, particles, then the phase overlay.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::sim::matching::{MatchState, PieceKind};
use crate::sim::race::{self, CAMERA_OFFSET_Y, FIELD, RaceState, ROAD_FRACTION};
use crate::sim::{
    EntityKind, GamePhase, MiniGame, PickupKind, PlayerState, Rect, RunnerState,
};
use crate::sim::particles::ParticleField;
use crate::tuning::WinCondition;

/// Cosmetic switches from player settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub particles: bool,
    /// Freeze parallax, limb swing and crowd bounce
    pub reduced_motion: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            particles: true,
            reduced_motion: false,
        }
    }
}

/// Parallax rates of the background layers, far to near
const PARALLAX: [f32; 2] = [0.2, 0.5];

/// Full-field tint for the current phase
pub fn phase_overlay(phase: GamePhase, field: Vec2) -> Vec<Vertex> {
    match phase {
        GamePhase::Menu => shapes::rect(&Rect::new(0.0, 0.0, field.x, field.y), colors::MENU_DIM),
        GamePhase::Playing => Vec::new(),
        GamePhase::WinPending | GamePhase::Won => band(field, colors::WIN_BAND),
        GamePhase::LosePending | GamePhase::Lost => band(field, colors::LOSE_BAND),
    }
}

fn band(field: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let h = field.y * 0.3;
    shapes::rect(&Rect::new(0.0, (field.y - h) / 2.0, field.x, h), color)
}

fn particles(field: &ParticleField, opts: &RenderOptions) -> Vec<Vertex> {
    if !opts.particles {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(field.len() * 18);
    for p in field.iter() {
        let color = with_alpha(p.color, p.color[3] * p.life.clamp(0.0, 1.0));
        vertices.extend(shapes::circle(p.pos, p.size, color, 6));
    }
    vertices
}

fn limb_swing(frame: f32, opts: &RenderOptions) -> f32 {
    if opts.reduced_motion {
        0.0
    } else {
        (frame * 0.5).sin()
    }
}

/// Repeating silhouette layer scrolled by `offset`
fn parallax_layer(field: Vec2, offset: f32, base_y: f32, tile: f32, peak: f32, color: [f32; 4]) -> Vec<Vertex> {
    let shift = offset.rem_euclid(tile);
    let mut vertices = Vec::new();
    vertices.extend(shapes::rect(
        &Rect::new(0.0, base_y, field.x, field.y - base_y),
        color,
    ));
    let mut x = -shift;
    while x < field.x {
        vertices.extend(shapes::triangle(
            Vec2::new(x, base_y),
            Vec2::new(x + tile / 2.0, base_y - peak),
            Vec2::new(x + tile, base_y),
            color,
        ));
        x += tile;
    }
    vertices
}

/// A storybook figure: body, head, and two swinging legs
fn figure(body: &Rect, swing: f32, sliding: bool, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let leg_w = (body.w * 0.22).max(2.0);
    let hip_y = body.y + body.h * 0.65;
    let foot_y = body.bottom();

    if sliding {
        let hip = Vec2::new(body.x + body.w * 0.4, hip_y);
        let foot = Vec2::new(body.right() + body.w * 0.2, foot_y - leg_w / 2.0);
        vertices.extend(shapes::limb(hip, (hip + foot) / 2.0, foot, leg_w, colors::LIMB));
    } else {
        for (side, phase) in [(0.35, swing), (0.65, -swing)] {
            let hip = Vec2::new(body.x + body.w * side, hip_y);
            let foot = Vec2::new(hip.x + phase * body.w * 0.35, foot_y);
            let knee = Vec2::new((hip.x + foot.x) / 2.0 + body.w * 0.12, (hip_y + foot_y) / 2.0);
            vertices.extend(shapes::limb(hip, knee, foot, leg_w, colors::LIMB));
        }
    }

    let torso = Rect::new(body.x, body.y + body.h * 0.25, body.w, body.h * 0.45);
    vertices.extend(shapes::rounded_rect(&torso, body.w * 0.2, color));
    let head_r = body.w.min(body.h) * 0.28;
    let head = Vec2::new(body.center().x, body.y + head_r);
    vertices.extend(shapes::circle(head, head_r, colors::SKIN, 16));
    vertices
}

/// Four-legged pursuer (wolf, guard dog) drawn inside its box
fn pursuer(body: &Rect, swing: f32) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let leg_w = (body.w * 0.12).max(2.0);
    for (side, phase) in [(0.2, swing), (0.8, -swing)] {
        let hip = Vec2::new(body.x + body.w * side, body.y + body.h * 0.6);
        let foot = Vec2::new(hip.x + phase * body.w * 0.12, body.bottom());
        vertices.extend(shapes::segment(hip, foot, leg_w, colors::PURSUER));
    }
    let torso = Rect::new(body.x, body.y + body.h * 0.2, body.w * 0.85, body.h * 0.45);
    vertices.extend(shapes::rounded_rect(&torso, body.h * 0.15, colors::PURSUER));
    let snout = Vec2::new(body.right() - body.h * 0.2, body.y + body.h * 0.3);
    vertices.extend(shapes::circle(snout, body.h * 0.22, colors::PURSUER, 12));
    vertices.extend(shapes::triangle(
        snout + Vec2::new(-body.h * 0.15, -body.h * 0.1),
        snout + Vec2::new(-body.h * 0.05, -body.h * 0.4),
        snout + Vec2::new(body.h * 0.05, -body.h * 0.1),
        colors::PURSUER,
    ));
    vertices
}

fn carriage(r: &Rect) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let cabin = Rect::new(r.x, r.y, r.w, r.h * 0.75);
    vertices.extend(shapes::rounded_rect(&cabin, r.w * 0.3, colors::CARRIAGE));
    let wheel_r = r.h * 0.18;
    for fx in [0.25, 0.75] {
        let c = Vec2::new(r.x + r.w * fx, r.bottom() - wheel_r);
        vertices.extend(shapes::ring(c, wheel_r * 0.6, wheel_r, colors::LIMB, 16));
    }
    vertices
}

/// Runner variant (forest dash, midnight dash)
pub fn runner_frame(state: &RunnerState, opts: &RenderOptions) -> Vec<Vertex> {
    let t = &state.tuning;
    let field = Vec2::new(t.field_width, t.field_height);
    let mut vertices = Vec::with_capacity(4096);

    let sky = match t.win_condition {
        WinCondition::Survive => colors::SKY,
        WinCondition::ReachGoal => colors::NIGHT_SKY,
    };
    vertices.extend(shapes::rect(&Rect::new(0.0, 0.0, field.x, field.y), sky));

    let scroll = if opts.reduced_motion {
        0.0
    } else {
        state.scroll_distance
    };
    let layers = [
        (colors::HILLS_FAR, field.x * 0.5, t.ground_y * 0.35),
        (colors::TREES_NEAR, field.x * 0.2, t.ground_y * 0.2),
    ];
    for (rate, (color, tile, peak)) in PARALLAX.iter().zip(layers) {
        vertices.extend(parallax_layer(field, scroll * rate, t.ground_y - peak * 0.3, tile, peak, color));
    }
    vertices.extend(shapes::rect(
        &Rect::new(0.0, t.ground_y, field.x, field.y - t.ground_y),
        colors::GROUND,
    ));

    for e in state.store.iter() {
        match e.kind {
            EntityKind::ObstacleLow => {
                vertices.extend(shapes::rounded_rect(&e.rect, e.rect.h * 0.3, colors::LOG));
            }
            EntityKind::ObstacleHigh => {
                vertices.extend(shapes::rect(&e.rect, colors::BRANCH));
            }
            EntityKind::Pickup(PickupKind::Star) => {
                let r = e.rect.w.min(e.rect.h) / 2.0;
                vertices.extend(shapes::star(e.rect.center(), r, r * 0.45, colors::STAR));
            }
            EntityKind::Pickup(PickupKind::Boost) => {
                let r = e.rect.w.min(e.rect.h) / 2.0;
                vertices.extend(shapes::circle(e.rect.center(), r, colors::BOOST, 16));
            }
            EntityKind::Goal => vertices.extend(carriage(&e.rect)),
            EntityKind::Player | EntityKind::Antagonist => {}
        }
    }

    let swing = limb_swing(state.frame, opts);
    let player = &state.player;
    let running_swing = match player.state {
        PlayerState::Running => swing,
        PlayerState::Jumping => 0.6,
        PlayerState::Sliding => 0.0,
    };
    vertices.extend(figure(
        &player.rect(),
        running_swing,
        player.state == PlayerState::Sliding,
        colors::HERO,
    ));

    if let Some(x) = state.ally_x {
        let body = Rect::new(x, t.ground_y - t.player_h * 1.2, t.player_w * 1.2, t.player_h * 1.2);
        vertices.extend(figure(&body, swing, false, colors::ALLY));
    }

    if let Some(a) = state.antagonist() {
        vertices.extend(pursuer(&a, swing));
    }

    vertices.extend(particles(&state.particles, opts));
    vertices.extend(phase_overlay(state.phase(), field));
    vertices
}

fn screen_y(state: &RaceState, z: f32) -> f32 {
    FIELD.y * CAMERA_OFFSET_Y - (z - state.z)
}

fn visible(y: f32) -> bool {
    y > -100.0 && y < FIELD.y + 100.0
}

/// Tortoise-and-hare lane race
pub fn race_frame(state: &RaceState, opts: &RenderOptions) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(8192);
    let road_w = FIELD.x * ROAD_FRACTION;
    let road_x = (FIELD.x - road_w) / 2.0;

    vertices.extend(shapes::rect(&Rect::new(0.0, 0.0, FIELD.x, FIELD.y), colors::GRASS));
    vertices.extend(shapes::rect(&Rect::new(road_x, 0.0, road_w, FIELD.y), colors::ROAD));

    // Center dashes move with the player
    const DASH: f32 = 40.0;
    let mut y = -(2.0 * DASH) + state.z.rem_euclid(2.0 * DASH);
    while y < FIELD.y {
        vertices.extend(shapes::rect(
            &Rect::new(FIELD.x / 2.0 - 2.0, y, 4.0, DASH),
            colors::ROAD_STRIPE,
        ));
        y += 2.0 * DASH;
    }

    let finish_y = screen_y(state, state.tuning.finish_z);
    if visible(finish_y) {
        const CHECK: f32 = 20.0;
        let cols = (road_w / CHECK) as usize;
        for i in 0..cols {
            for row in 0..2 {
                if (i + row) % 2 == 0 {
                    vertices.extend(shapes::rect(
                        &Rect::new(road_x + i as f32 * CHECK, finish_y - CHECK * (row as f32 + 1.0), CHECK, CHECK),
                        colors::FINISH,
                    ));
                }
            }
        }
    }

    let phase = state.phase();
    let cheering = !matches!(phase, GamePhase::LosePending | GamePhase::Lost);
    let bounce_rate = if phase.is_pending() || phase.is_terminal() {
        0.25
    } else {
        0.13
    };
    for member in &state.crowd {
        let sy = screen_y(state, member.z);
        if !visible(sy) {
            continue;
        }
        let hop = if cheering && !opts.reduced_motion {
            (state.frame * bounce_rate + member.phase).sin().abs() * 15.0
        } else {
            0.0
        };
        let center = Vec2::new(race::lane_to_screen(member.lane), sy - hop);
        let color = [colors::HERO, colors::ALLY, colors::RIVAL][member.palette % 3];
        vertices.extend(shapes::ellipse(
            Vec2::new(center.x, sy + 15.0),
            Vec2::new(10.0, 4.0),
            with_alpha(colors::CLEAR, 0.3),
            12,
        ));
        vertices.extend(shapes::circle(center, 12.0, color, 12));
        vertices.extend(shapes::circle(center + Vec2::new(-8.0, -8.0), 5.0, color, 8));
        vertices.extend(shapes::circle(center + Vec2::new(8.0, -8.0), 5.0, color, 8));
    }

    for pad in state.pads.iter().filter(|p| p.active) {
        let sy = screen_y(state, pad.z);
        if visible(sy) {
            let c = Vec2::new(race::lane_to_screen(pad.lane), sy);
            vertices.extend(shapes::star(c, 18.0, 8.0, colors::BOOST));
        }
    }

    let hare_y = screen_y(state, state.rival_z);
    if visible(hare_y) {
        let lane = 50.0 + (state.rival_z * 0.01).sin() * 20.0;
        let c = Vec2::new(race::lane_to_screen(lane), hare_y);
        vertices.extend(shapes::ellipse(c, Vec2::new(14.0, 20.0), colors::RIVAL, 16));
        for dx in [-6.0, 6.0] {
            vertices.extend(shapes::ellipse(
                c + Vec2::new(dx, -24.0),
                Vec2::new(4.0, 12.0),
                colors::RIVAL,
                10,
            ));
        }
    }

    let me = state.player_screen();
    let swing = limb_swing(state.frame, opts);
    for (dx, dy) in [(-16.0, -12.0), (16.0, -12.0), (-16.0, 12.0), (16.0, 12.0)] {
        let flipper = Vec2::new(me.x + dx, me.y + dy + swing * 4.0 * dx.signum());
        vertices.extend(shapes::circle(flipper, 7.0, colors::TORTOISE, 10));
    }
    vertices.extend(shapes::circle(me + Vec2::new(0.0, -26.0), 9.0, colors::TORTOISE, 12));
    vertices.extend(shapes::circle(me, 20.0, colors::LOG, 20));
    if state.boosted() {
        vertices.extend(shapes::ring(me, 22.0, 26.0, with_alpha(colors::BOOST, 0.7), 20));
    }

    vertices.extend(particles(&state.particles, opts));
    vertices.extend(phase_overlay(phase, FIELD));
    vertices
}

fn piece_color(kind: PieceKind) -> [f32; 4] {
    match kind {
        PieceKind::Square => colors::SQUARE,
        PieceKind::Circle => colors::CIRCLE,
        PieceKind::Triangle => colors::TRIANGLE,
        PieceKind::Rose => colors::ROSE,
        PieceKind::Violet => colors::VIOLET,
        PieceKind::Daisy => colors::DAISY,
        PieceKind::Weed => colors::WEED,
    }
}

fn piece(kind: PieceKind, r: &Rect, rotation: f32) -> Vec<Vertex> {
    let c = r.center();
    let half = r.w.min(r.h) / 2.0;
    let color = piece_color(kind);
    match kind {
        PieceKind::Square => shapes::rotated_rect(&r.inset(half * 0.1), rotation, color),
        PieceKind::Circle => shapes::circle(c, half * 0.9, color, 20),
        PieceKind::Triangle => shapes::triangle(
            c + Vec2::new(0.0, -half * 0.9),
            c + Vec2::new(half * 0.9, half * 0.8),
            c + Vec2::new(-half * 0.9, half * 0.8),
            color,
        ),
        PieceKind::Weed => {
            let mut v = Vec::new();
            for dx in [-0.4, 0.0, 0.4] {
                v.extend(shapes::limb(
                    c + Vec2::new(0.0, half * 0.8),
                    c + Vec2::new(dx * half, 0.0),
                    c + Vec2::new(dx * half * 1.6, -half * 0.8),
                    half * 0.2,
                    color,
                ));
            }
            v
        }
        PieceKind::Rose | PieceKind::Violet | PieceKind::Daisy => {
            let mut v = shapes::segment(
                c,
                c + Vec2::new(0.0, half),
                half * 0.15,
                colors::STEM,
            );
            let head = c - Vec2::new(0.0, half * 0.2);
            for i in 0..5 {
                let theta = rotation + i as f32 * std::f32::consts::TAU / 5.0;
                let petal = head + Vec2::new(theta.cos(), theta.sin()) * half * 0.4;
                v.extend(shapes::circle(petal, half * 0.3, color, 10));
            }
            v.extend(shapes::circle(head, half * 0.22, colors::STAR, 10));
            v
        }
    }
}

/// Drag-and-match variants (wall builder, flower basket)
pub fn match_frame(state: &MatchState, opts: &RenderOptions) -> Vec<Vertex> {
    let field = state.field;
    if field.x <= 0.0 || field.y <= 0.0 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(4096);
    vertices.extend(shapes::gradient_rect(
        &Rect::new(0.0, 0.0, field.x, field.y),
        colors::SKY,
        colors::HILLS_FAR,
    ));

    let zone = state.target_rect();
    vertices.extend(shapes::rounded_rect(&zone, 12.0, colors::TARGET));
    let filled = zone.h * (state.progress / 100.0).clamp(0.0, 1.0);
    if filled > 0.0 {
        let fill = Rect::new(zone.x, zone.bottom() - filled, zone.w, filled);
        vertices.extend(shapes::rect(&fill, colors::TARGET_FILL));
    }
    if let Some(kind) = state.required {
        let badge = Rect::centered(Vec2::new(zone.center().x, zone.y - 30.0), 40.0, 40.0);
        vertices.extend(piece(kind, &badge, 0.0));
    }

    let grabbed = state.grabbed_id();
    for p in &state.pieces {
        if Some(p.id) == grabbed {
            let glow = p.rect.center();
            vertices.extend(shapes::circle(glow, p.rect.w * 0.7, colors::HIGHLIGHT, 20));
        }
        let rotation = if opts.reduced_motion { 0.0 } else { p.rotation };
        vertices.extend(piece(p.kind, &p.rect, rotation));
    }

    for f in &state.floats {
        let color = if f.good { colors::GOOD } else { colors::BAD };
        let rise = (1.0 - f.life.clamp(0.0, 1.0)) * 40.0;
        vertices.extend(shapes::circle(
            f.pos - Vec2::new(0.0, rise),
            8.0,
            with_alpha(color, f.life.clamp(0.0, 1.0)),
            12,
        ));
    }

    vertices.extend(particles(&state.particles, opts));
    vertices.extend(phase_overlay(state.phase(), field));
    vertices
}
