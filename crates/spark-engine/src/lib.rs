//! Frame-stepped 2D particle systems.
//!
//! A [`ParticleSystem`] owns a bounded pool of short-lived particles and
//! spawns new ones either continuously from a start position or in bursts
//! from queued generation points. Call [`ParticleSystem::step`] once per
//! frame and [`ParticleSystem::draw`] with any [`ParticleRenderer`].

pub mod config;
pub mod error;
pub mod generation;
pub mod particle;
pub mod pool;
pub mod renderer;
pub mod rng;
pub mod system;
pub mod time;

// Re-export key types at crate root for convenience
pub use config::{Color, ParticleSystemConfig, SizeMode};
pub use error::ParticleError;
pub use generation::{
    GenerationPoint, GenerationQueue, SpawnAllocation, GENERATION_POINT_QUOTA,
    MAX_GENERATION_POINTS,
};
pub use particle::{Particle, ParticleDeltas};
pub use pool::ParticlePool;
pub use renderer::{
    BlendMode, InstanceBatch, InstanceBuffer, ParticleInstance, ParticleRenderer,
    ParticleSprite, TextureBinding, TextureId, TextureLoader,
};
pub use rng::{RandomSource, Rng};
pub use system::{ParticleSystem, SystemPhase};
pub use time::FrameClock;
