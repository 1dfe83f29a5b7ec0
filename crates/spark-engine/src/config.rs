//! Particle system configuration, loadable from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ParticleError;
use crate::renderer::BlendMode;

/// RGBA color, nominally 0.0-1.0 per channel (>1.0 for HDR glow).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// How the initial size of a new particle is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizeMode {
    /// Sample uniformly in `[min, max]`.
    Range { min: f32, max: f32 },
    /// Every particle starts at the same size (point-sprite rendering).
    Fixed { size: f32 },
}

impl Default for SizeMode {
    fn default() -> Self {
        SizeMode::Range {
            min: 8.0,
            max: 24.0,
        }
    }
}

/// Configuration for a particle system.
///
/// Every field only affects particles spawned after it is set; live
/// particles keep the values they were born with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystemConfig {
    /// Maximum number of live particles (default: 256).
    pub capacity: usize,
    /// Particles spawned per frame. Negative disables spawning.
    pub generate_count: i32,
    /// Life of newly spawned particles in frames (default: 60 = 1s at 60fps).
    pub life: u32,
    /// Lower per-axis bound of the initial velocity, in units per frame.
    pub min_velocity: Vec2,
    /// Upper per-axis bound of the initial velocity, in units per frame.
    pub max_velocity: Vec2,
    pub size: SizeMode,
    /// Acceleration added to each particle's velocity every frame.
    pub gravity: Vec2,
    /// Base color of newly spawned particles.
    pub color: Color,
    /// Change of each color channel over a full life.
    pub color_delta: [f32; 4],
    /// Change of size over a full life.
    pub size_delta: f32,
    pub blend: BlendMode,
    /// Spawn continuously from `start_pos` (true) or only from generation points.
    pub looping: bool,
    /// Spawn position in looping mode.
    pub start_pos: Vec2,
}

impl Default for ParticleSystemConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            generate_count: 5,
            life: 60,
            min_velocity: Vec2::splat(-2.0),
            max_velocity: Vec2::splat(2.0),
            size: SizeMode::default(),
            gravity: Vec2::ZERO,
            color: Color::WHITE,
            color_delta: [0.0; 4],
            size_delta: 0.0,
            blend: BlendMode::Additive,
            looping: true,
            start_pos: Vec2::ZERO,
        }
    }
}

impl ParticleSystemConfig {
    /// Parse and validate a config from a JSON string.
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, ParticleError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a system relies on while spawning.
    pub fn validate(&self) -> Result<(), ParticleError> {
        if self.life == 0 {
            return Err(ParticleError::ZeroLife);
        }
        check_velocity_range(self.min_velocity, self.max_velocity)?;
        match self.size {
            SizeMode::Range { min, max } => check_size_range(min, max),
            SizeMode::Fixed { size } => check_size(size),
        }
    }
}

pub(crate) fn check_velocity_range(min: Vec2, max: Vec2) -> Result<(), ParticleError> {
    if min.cmple(max).all() {
        Ok(())
    } else {
        Err(ParticleError::InvertedVelocityRange { min, max })
    }
}

pub(crate) fn check_size(size: f32) -> Result<(), ParticleError> {
    if size.is_finite() && size >= 0.0 {
        Ok(())
    } else {
        Err(ParticleError::InvalidSize(size))
    }
}

pub(crate) fn check_size_range(min: f32, max: f32) -> Result<(), ParticleError> {
    check_size(min)?;
    check_size(max)?;
    if min <= max {
        Ok(())
    } else {
        Err(ParticleError::InvertedSizeRange { min, max })
    }
}
