//! A single simulated particle and its per-frame update rule.

use std::num::NonZeroU32;

use glam::Vec2;

use crate::config::Color;

/// Per-life-fraction change rates snapshotted into a particle at spawn.
///
/// Each rate is the total change applied across the full life, so a
/// particle with `alpha: -1.0` fades from its base alpha to base - 1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParticleDeltas {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
    pub size: f32,
}

/// A single particle with physics and rendering state.
///
/// Fields are read-only from outside; only `advance` mutates them.
#[derive(Debug, Clone)]
pub struct Particle {
    life: u32,
    base_life: NonZeroU32,
    position: Vec2,
    velocity: Vec2,
    gravity: Vec2,
    base_color: Color,
    color: Color,
    base_size: f32,
    size: f32,
    deltas: ParticleDeltas,
}

impl Particle {
    pub fn new(
        life: NonZeroU32,
        position: Vec2,
        velocity: Vec2,
        gravity: Vec2,
        color: Color,
        size: f32,
        deltas: ParticleDeltas,
    ) -> Self {
        Particle {
            life: life.get(),
            base_life: life,
            position,
            velocity,
            gravity,
            base_color: color,
            color,
            base_size: size,
            size,
            deltas,
        }
    }

    /// Advance one frame. Returns true when the particle has expired and
    /// must be dropped by its owner.
    pub fn advance(&mut self) -> bool {
        self.position += self.velocity;
        self.velocity += self.gravity;

        self.life = self.life.saturating_sub(1);
        if self.life == 0 {
            return true;
        }

        let f = self.life_fraction();
        let d = &self.deltas;
        self.color = Color {
            r: self.base_color.r + d.red * f,
            g: self.base_color.g + d.green * f,
            b: self.base_color.b + d.blue * f,
            a: self.base_color.a + d.alpha * f,
        };
        self.size = self.base_size + d.size * f;

        false
    }

    /// Fraction of life consumed: 0.0 at birth, approaching 1.0 at death.
    pub fn life_fraction(&self) -> f32 {
        1.0 - self.life as f32 / self.base_life.get() as f32
    }

    pub fn life(&self) -> u32 {
        self.life
    }

    pub fn base_life(&self) -> u32 {
        self.base_life.get()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn deltas(&self) -> ParticleDeltas {
        self.deltas
    }
}
