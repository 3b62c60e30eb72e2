//! Cosmetic particles (jump dust, pickup sparkle, win confetti)
//!
//! Nothing here feeds back into game state.

use glam::Vec2;
use rand::Rng;

use crate::consts::MAX_PARTICLES;

/// Life lost per reference frame
const DECAY: f32 = 0.05;
/// Confetti lingers longer
const CONFETTI_DECAY: f32 = 0.01;

const CONFETTI_COLORS: [[f32; 4]; 5] = [
    [1.0, 0.35, 0.45, 1.0],
    [1.0, 0.85, 0.25, 1.0],
    [0.35, 0.8, 1.0, 1.0],
    [0.5, 1.0, 0.45, 1.0],
    [0.85, 0.5, 1.0, 1.0],
];

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases over time
    pub color: [f32; 4],
    pub size: f32,
    pub gravity: f32,
    decay: f32,
}

/// Bounded particle pool
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    fn push(&mut self, p: Particle) {
        if self.particles.len() >= MAX_PARTICLES {
            // Oldest make room
            self.particles.remove(0);
        }
        self.particles.push(p);
    }

    /// Small dust puff around `origin`, drifting left and up
    pub fn burst<R: Rng>(&mut self, rng: &mut R, origin: Vec2, count: usize, color: [f32; 4]) {
        for _ in 0..count {
            self.push(Particle {
                pos: origin,
                vel: Vec2::new(
                    rng.random_range(-3.0..-1.0),
                    rng.random_range(-2.0..0.0),
                ),
                life: 1.0,
                color,
                size: rng.random_range(3.0..6.0),
                gravity: 0.0,
                decay: DECAY,
            });
        }
    }

    /// Falling confetti across the top of a `width`-wide field
    pub fn confetti<R: Rng>(&mut self, rng: &mut R, width: f32, count: usize) {
        for i in 0..count {
            self.push(Particle {
                pos: Vec2::new(rng.random_range(0.0..width.max(1.0)), -10.0),
                vel: Vec2::new(rng.random_range(-1.5..1.5), rng.random_range(1.0..3.0)),
                life: 1.0,
                color: CONFETTI_COLORS[i % CONFETTI_COLORS.len()],
                size: rng.random_range(4.0..8.0),
                gravity: 0.05,
                decay: CONFETTI_DECAY,
            });
        }
    }

    /// Integrate by `ts` reference frames and drop expired particles
    pub fn step(&mut self, ts: f32) {
        for p in self.particles.iter_mut() {
            p.vel.y += p.gravity * ts;
            p.pos += p.vel * ts;
            p.life -= p.decay * ts;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
