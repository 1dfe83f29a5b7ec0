//! Draw boundary between particle systems and a GPU backend.
//!
//! The engine never talks to a graphics API. `ParticleSystem::draw` hands
//! each live particle to a `ParticleRenderer`; `InstanceBuffer` is the
//! stock implementation that packs them into a flat buffer for upload.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Color;
use crate::error::ParticleError;

/// Blend mode for particle rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Standard alpha blending (src-alpha, one-minus-src-alpha).
    Alpha,
    /// Additive blending for glow, sparks and fire (src-alpha, one).
    #[default]
    Additive,
}

/// Opaque identifier of a texture owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

/// How a particle system holds its texture. Decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureBinding {
    /// Loaded by the system itself; the owner of the system releases it.
    Owned(TextureId),
    /// Shared with other systems; lifetime is managed elsewhere.
    Borrowed(TextureId),
}

impl TextureBinding {
    pub fn id(&self) -> TextureId {
        match *self {
            TextureBinding::Owned(id) | TextureBinding::Borrowed(id) => id,
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, TextureBinding::Owned(_))
    }
}

/// Resolves texture names to backend handles.
pub trait TextureLoader {
    fn load(&mut self, name: &str) -> Result<TextureId, ParticleError>;
}

/// Everything a backend needs to draw one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    pub position: Vec2,
    pub size: f32,
    pub color: Color,
    pub blend: BlendMode,
    pub texture: TextureId,
}

/// Receives draw commands from `ParticleSystem::draw`, in live-collection order.
pub trait ParticleRenderer {
    fn draw_particle(&mut self, sprite: &ParticleSprite);
}

/// Per-particle instance data as uploaded to the GPU.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// X position in world space.
    pub x: f32,
    /// Y position in world space.
    pub y: f32,
    /// Rendered edge length in world units.
    pub size: f32,
    /// Reserved for a future rotation channel; always 0.
    pub rotation: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ParticleInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

impl From<&ParticleSprite> for ParticleInstance {
    fn from(sprite: &ParticleSprite) -> Self {
        ParticleInstance {
            x: sprite.position.x,
            y: sprite.position.y,
            size: sprite.size,
            rotation: 0.0,
            r: sprite.color.r,
            g: sprite.color.g,
            b: sprite.color.b,
            a: sprite.color.a,
        }
    }
}

/// A contiguous run of instances sharing one texture and blend mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceBatch {
    pub texture: TextureId,
    pub blend: BlendMode,
    /// Start index in the instance array
    pub start: u32,
    /// End index (exclusive) in the instance array
    pub end: u32,
}

/// Collects particle draws into batched, GPU-ready instance data.
/// Consecutive draws with the same texture and blend mode share a batch.
pub struct InstanceBuffer {
    pub instances: Vec<ParticleInstance>,
    pub batches: Vec<InstanceBatch>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(max_instances: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max_instances),
            batches: Vec::new(),
        }
    }

    /// Clear for the next frame, keeping allocations.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.batches.clear();
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Instance data as raw bytes for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleRenderer for InstanceBuffer {
    fn draw_particle(&mut self, sprite: &ParticleSprite) {
        let idx = self.instances.len() as u32;
        self.instances.push(ParticleInstance::from(sprite));

        match self.batches.last_mut() {
            Some(batch) if batch.texture == sprite.texture && batch.blend == sprite.blend => {
                batch.end = idx + 1;
            }
            _ => self.batches.push(InstanceBatch {
                texture: sprite.texture,
                blend: sprite.blend,
                start: idx,
                end: idx + 1,
            }),
        }
    }
}
