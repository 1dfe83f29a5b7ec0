//! Error types for particle system configuration.

use glam::Vec2;
use thiserror::Error;

/// Errors surfaced at the configuration boundary.
///
/// Stepping and drawing never fail; everything that could make them
/// misbehave is rejected here first.
#[derive(Debug, Error)]
pub enum ParticleError {
    /// Particle life must be at least one frame.
    #[error("particle life must be at least 1 frame")]
    ZeroLife,

    /// A velocity bound would end up below its counterpart on some axis.
    #[error("velocity range is inverted: min {min} > max {max}")]
    InvertedVelocityRange {
        /// Lower bound that was requested or already configured.
        min: Vec2,
        /// Upper bound that was requested or already configured.
        max: Vec2,
    },

    /// A size bound would end up below its counterpart.
    #[error("size range is inverted: min {min} > max {max}")]
    InvertedSizeRange {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// Sizes must be finite and non-negative.
    #[error("invalid particle size: {0}")]
    InvalidSize(f32),

    /// A frame clock needs a finite, positive frame duration.
    #[error("invalid frame duration: {0}s")]
    InvalidFrameDuration(f32),

    /// The JSON configuration could not be parsed.
    #[error("invalid particle config: {0}")]
    Config(#[from] serde_json::Error),

    /// A texture loader failed to produce a handle.
    #[error("texture load failed: {0}")]
    Texture(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_bounds() {
        let err = ParticleError::InvertedSizeRange { min: 4.0, max: 2.0 };
        assert_eq!(err.to_string(), "size range is inverted: min 4 > max 2");
    }

    #[test]
    fn json_errors_convert() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ParticleError = json_err.into();
        assert!(matches!(err, ParticleError::Config(_)));
    }
}
