//! Particle system orchestration: spawning, stepping, expiry and draw dispatch.

use std::num::NonZeroU32;

use glam::Vec2;

use crate::config::{
    check_size, check_size_range, check_velocity_range, Color, ParticleSystemConfig, SizeMode,
};
use crate::error::ParticleError;
use crate::generation::{GenerationPoint, GenerationQueue};
use crate::particle::{Particle, ParticleDeltas};
use crate::pool::ParticlePool;
use crate::renderer::{
    BlendMode, ParticleRenderer, ParticleSprite, TextureBinding, TextureId, TextureLoader,
};
use crate::rng::{RandomSource, Rng};
use crate::time::FrameClock;

/// Coarse lifecycle state of a system, derived from its configuration and contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPhase {
    /// Nothing alive and nothing to spawn.
    Idle,
    /// New particles will be spawned on the next step.
    Generating,
    /// Spawning is off or has nothing to spawn from, but particles are still alive.
    Draining,
}

/// A bounded population of particles sharing one texture and one set of
/// emission parameters.
///
/// In looping mode the system spawns up to `generate_count` particles at
/// `start_pos` every step. Otherwise it only spawns from generation points
/// queued with `add_generation_point`, each of which retires after producing
/// its quota.
pub struct ParticleSystem<R: RandomSource = Rng> {
    config: ParticleSystemConfig,
    life: NonZeroU32,
    pool: ParticlePool,
    queue: GenerationQueue,
    texture: TextureBinding,
    rng: R,
    dropped_points: u64,
}

impl ParticleSystem<Rng> {
    /// Create a system with default settings that draws with a shared texture.
    pub fn new(texture: TextureId, looping: bool) -> Self {
        let config = ParticleSystemConfig {
            looping,
            ..Default::default()
        };
        let life = NonZeroU32::new(config.life).unwrap_or(NonZeroU32::MIN);
        Self::assemble(config, life, TextureBinding::Borrowed(texture), Rng::default())
    }
}

impl<R: RandomSource> ParticleSystem<R> {
    /// Create a system from a validated config.
    pub fn from_config(
        config: ParticleSystemConfig,
        texture: TextureBinding,
        rng: R,
    ) -> Result<Self, ParticleError> {
        config.validate()?;
        let life = NonZeroU32::new(config.life).ok_or(ParticleError::ZeroLife)?;
        Ok(Self::assemble(config, life, texture, rng))
    }

    /// Create a system that loads and owns its texture.
    /// The caller releases `owned_texture()` once the system is discarded.
    pub fn with_texture_name(
        name: &str,
        loader: &mut impl TextureLoader,
        config: ParticleSystemConfig,
        rng: R,
    ) -> Result<Self, ParticleError> {
        config.validate()?;
        let id = loader.load(name)?;
        log::debug!("particle texture '{}' loaded as {:?}", name, id);
        Self::from_config(config, TextureBinding::Owned(id), rng)
    }

    fn assemble(
        config: ParticleSystemConfig,
        life: NonZeroU32,
        texture: TextureBinding,
        rng: R,
    ) -> Self {
        Self {
            // Reservation is bounded inside the pool; huge capacities grow lazily.
            pool: ParticlePool::with_capacity(config.capacity),
            queue: GenerationQueue::new(),
            config,
            life,
            texture,
            rng,
            dropped_points: 0,
        }
    }

    /// Run one frame: age and expire live particles, then spawn new ones.
    ///
    /// Particles spawned by this call start aging on the next one, and the
    /// spawn count is bounded by the room left after this frame's expiries.
    pub fn step(&mut self) {
        let expired = self.pool.advance_all();

        let budget = self.spawn_budget();
        let mut spawned = 0;
        if budget > 0 {
            let template = SpawnTemplate::new(&self.config, self.life);
            if self.config.looping {
                for _ in 0..budget {
                    template.spawn(self.config.start_pos, &mut self.rng, &mut self.pool);
                }
                spawned = budget;
            } else {
                for alloc in self.queue.draw_budget(budget) {
                    for _ in 0..alloc.count {
                        template.spawn(alloc.position, &mut self.rng, &mut self.pool);
                    }
                    spawned += alloc.count;
                }
            }
        }

        if expired > 0 || spawned > 0 {
            log::trace!(
                "particles: {} expired, {} spawned, {} live",
                expired,
                spawned,
                self.pool.len()
            );
        }
    }

    /// Run as many steps as `clock` says are due after `elapsed` seconds.
    /// Returns the number of steps taken.
    pub fn advance(&mut self, clock: &mut FrameClock, elapsed: f32) -> u32 {
        let frames = clock.accumulate(elapsed);
        for _ in 0..frames {
            self.step();
        }
        frames
    }

    /// Submit every live particle to `renderer`, in collection order.
    pub fn draw<D: ParticleRenderer + ?Sized>(&self, renderer: &mut D) {
        let blend = self.config.blend;
        let texture = self.texture.id();
        for p in self.pool.iter() {
            renderer.draw_particle(&ParticleSprite {
                position: p.position(),
                size: p.size(),
                color: p.color(),
                blend,
                texture,
            });
        }
    }

    /// Number of particles that fit this frame, given the current live count.
    fn spawn_budget(&self) -> u32 {
        if self.config.generate_count <= 0 {
            return 0;
        }
        let room = self.config.capacity.saturating_sub(self.pool.len());
        (self.config.generate_count as u32).min(room.min(u32::MAX as usize) as u32)
    }

    // -- Generation points --

    /// Queue a burst at `pos`. Returns false if the point was dropped: the
    /// system is looping, or the queue is already full. Drops are counted
    /// by `dropped_points`.
    pub fn add_generation_point(&mut self, pos: Vec2) -> bool {
        if !self.config.looping && self.queue.add_point(pos) {
            return true;
        }
        self.dropped_points += 1;
        log::debug!(
            "generation point at {} dropped ({} pending, looping: {})",
            pos,
            self.queue.len(),
            self.config.looping
        );
        false
    }

    /// Pending generation points, oldest first.
    pub fn pending_points(&self) -> impl Iterator<Item = &GenerationPoint> {
        self.queue.iter()
    }

    /// Total generation points rejected since creation.
    pub fn dropped_points(&self) -> u64 {
        self.dropped_points
    }

    // -- State queries --

    pub fn phase(&self) -> SystemPhase {
        let can_spawn = if self.config.looping {
            self.spawn_budget() > 0
        } else {
            self.config.generate_count > 0 && !self.queue.is_empty()
        };
        if can_spawn {
            SystemPhase::Generating
        } else if !self.pool.is_empty() {
            SystemPhase::Draining
        } else {
            SystemPhase::Idle
        }
    }

    /// Number of live particles.
    pub fn live_count(&self) -> usize {
        self.pool.len()
    }

    /// Live particles in draw order.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter()
    }

    /// Drop every live particle and pending generation point.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.queue.clear();
    }

    pub fn config(&self) -> &ParticleSystemConfig {
        &self.config
    }

    pub fn texture(&self) -> TextureBinding {
        self.texture
    }

    /// The texture this system loaded itself, if any.
    pub fn owned_texture(&self) -> Option<TextureId> {
        match self.texture {
            TextureBinding::Owned(id) => Some(id),
            TextureBinding::Borrowed(_) => None,
        }
    }

    pub fn is_looping(&self) -> bool {
        self.config.looping
    }

    // -- Configuration --

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Set the maximum number of live particles. Shrinking below the live
    /// count retires the newest-slotted particles immediately.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.config.capacity = capacity;
        let retired = self.pool.truncate(capacity);
        if retired > 0 {
            log::debug!("capacity lowered to {}: retired {} particles", capacity, retired);
        }
    }

    pub fn generate_count(&self) -> i32 {
        self.config.generate_count
    }

    /// Particles spawned per step. A negative count stops spawning until a
    /// positive one is set again.
    pub fn set_generate_count(&mut self, count: i32) {
        self.config.generate_count = count;
    }

    pub fn life(&self) -> u32 {
        self.life.get()
    }

    /// Life in frames for particles spawned from now on.
    pub fn set_life(&mut self, life: u32) -> Result<(), ParticleError> {
        let Some(life) = NonZeroU32::new(life) else {
            log::warn!("rejected particle life of 0 frames");
            return Err(ParticleError::ZeroLife);
        };
        self.life = life;
        self.config.life = life.get();
        Ok(())
    }

    pub fn min_velocity(&self) -> Vec2 {
        self.config.min_velocity
    }

    pub fn max_velocity(&self) -> Vec2 {
        self.config.max_velocity
    }

    pub fn set_min_velocity(&mut self, v: Vec2) -> Result<(), ParticleError> {
        self.set_velocity_range(v, self.config.max_velocity)
    }

    pub fn set_max_velocity(&mut self, v: Vec2) -> Result<(), ParticleError> {
        self.set_velocity_range(self.config.min_velocity, v)
    }

    /// Set both velocity bounds at once. Rejected if `min > max` on any axis.
    pub fn set_velocity_range(&mut self, min: Vec2, max: Vec2) -> Result<(), ParticleError> {
        check_velocity_range(min, max).inspect_err(|e| log::warn!("{}", e))?;
        self.config.min_velocity = min;
        self.config.max_velocity = max;
        Ok(())
    }

    pub fn size_mode(&self) -> SizeMode {
        self.config.size
    }

    /// Smallest spawn size (the fixed size in fixed mode).
    pub fn min_size(&self) -> f32 {
        match self.config.size {
            SizeMode::Range { min, .. } => min,
            SizeMode::Fixed { size } => size,
        }
    }

    /// Largest spawn size (the fixed size in fixed mode).
    pub fn max_size(&self) -> f32 {
        match self.config.size {
            SizeMode::Range { max, .. } => max,
            SizeMode::Fixed { size } => size,
        }
    }

    pub fn set_min_size(&mut self, size: f32) -> Result<(), ParticleError> {
        self.set_size_range(size, self.max_size())
    }

    pub fn set_max_size(&mut self, size: f32) -> Result<(), ParticleError> {
        self.set_size_range(self.min_size(), size)
    }

    /// Sample spawn sizes in `[min, max]`. Rejected if `min > max`.
    pub fn set_size_range(&mut self, min: f32, max: f32) -> Result<(), ParticleError> {
        check_size_range(min, max).inspect_err(|e| log::warn!("{}", e))?;
        self.config.size = SizeMode::Range { min, max };
        Ok(())
    }

    /// Spawn every particle at exactly `size`. Rejected if negative or not finite.
    pub fn set_fixed_size(&mut self, size: f32) -> Result<(), ParticleError> {
        check_size(size).inspect_err(|e| log::warn!("{}", e))?;
        self.config.size = SizeMode::Fixed { size };
        Ok(())
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    /// Base color for particles spawned from now on.
    pub fn color(&self) -> Color {
        self.config.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.config.color = color;
    }

    /// Per-life change of red, green, blue and alpha.
    pub fn color_delta(&self) -> [f32; 4] {
        self.config.color_delta
    }

    pub fn set_color_delta(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.config.color_delta = [red, green, blue, alpha];
    }

    pub fn size_delta(&self) -> f32 {
        self.config.size_delta
    }

    pub fn set_size_delta(&mut self, delta: f32) {
        self.config.size_delta = delta;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.config.blend
    }

    /// Takes effect on the next `draw`, for live particles too.
    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.config.blend = blend;
    }

    pub fn start_pos(&self) -> Vec2 {
        self.config.start_pos
    }

    pub fn set_start_pos(&mut self, pos: Vec2) {
        self.config.start_pos = pos;
    }
}

/// Spawn parameters captured once per step.
struct SpawnTemplate {
    life: NonZeroU32,
    min_velocity: Vec2,
    max_velocity: Vec2,
    size: SizeMode,
    gravity: Vec2,
    color: Color,
    deltas: ParticleDeltas,
}

impl SpawnTemplate {
    fn new(config: &ParticleSystemConfig, life: NonZeroU32) -> Self {
        let [red, green, blue, alpha] = config.color_delta;
        Self {
            life,
            min_velocity: config.min_velocity,
            max_velocity: config.max_velocity,
            size: config.size,
            gravity: config.gravity,
            color: config.color,
            deltas: ParticleDeltas {
                red,
                green,
                blue,
                alpha,
                size: config.size_delta,
            },
        }
    }

    /// Samples x velocity, y velocity, then size (range mode only).
    fn spawn(&self, position: Vec2, rng: &mut impl RandomSource, pool: &mut ParticlePool) {
        let velocity = Vec2::new(
            rng.uniform(self.min_velocity.x, self.max_velocity.x),
            rng.uniform(self.min_velocity.y, self.max_velocity.y),
        );
        let size = match self.size {
            SizeMode::Range { min, max } => rng.uniform(min, max),
            SizeMode::Fixed { size } => size,
        };
        pool.insert(Particle::new(
            self.life,
            position,
            velocity,
            self.gravity,
            self.color,
            size,
            self.deltas,
        ));
    }
}
