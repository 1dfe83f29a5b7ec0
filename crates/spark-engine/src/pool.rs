//! Slot arena holding live particles.
//!
//! Slots keep their index for the lifetime of the particle in them, so
//! expiry during a sweep is a flag flip plus a free-list push. Freed slots
//! are reused most-recently-freed first, so iteration order is a pure
//! function of the spawn/expiry history.

use crate::particle::Particle;

#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Option<Particle>>,
    free: Vec<usize>,
    live: usize,
}

impl ParticlePool {
    /// Largest up-front reservation; bigger pools grow as particles arrive.
    pub const MAX_RESERVED: usize = 1024;

    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a pool with room for `capacity` particles before reallocating,
    /// reserving no more than `MAX_RESERVED` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let reserved = capacity.min(Self::MAX_RESERVED);
        Self {
            slots: Vec::with_capacity(reserved),
            free: Vec::with_capacity(reserved),
            live: 0,
        }
    }

    /// Store a particle, reusing a freed slot if one exists. Returns its slot index.
    pub fn insert(&mut self, particle: Particle) -> usize {
        self.live += 1;
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(particle);
                idx
            }
            None => {
                self.slots.push(Some(particle));
                self.slots.len() - 1
            }
        }
    }

    /// Advance every live particle one frame in slot order, freeing the
    /// slots of those that expire. Returns the number expired.
    pub fn advance_all(&mut self) -> usize {
        let mut expired = 0;
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            let dead = match slot {
                Some(p) => p.advance(),
                None => continue,
            };
            if dead {
                *slot = None;
                self.free.push(idx);
                expired += 1;
            }
        }
        self.live -= expired;
        expired
    }

    /// Retire live particles from the back of iteration order until at most
    /// `max_live` remain. Returns the number retired.
    pub fn truncate(&mut self, max_live: usize) -> usize {
        let mut retired = 0;
        for idx in (0..self.slots.len()).rev() {
            if self.live <= max_live {
                break;
            }
            if self.slots[idx].take().is_some() {
                self.free.push(idx);
                self.live -= 1;
                retired += 1;
            }
        }
        retired
    }

    /// Iterate over live particles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::particle::ParticleDeltas;
    use glam::Vec2;
    use std::num::NonZeroU32;

    fn particle(life: u32, x: f32) -> Particle {
        Particle::new(
            NonZeroU32::new(life).unwrap(),
            Vec2::new(x, 0.0),
            Vec2::ZERO,
            Vec2::ZERO,
            Color::WHITE,
            1.0,
            ParticleDeltas::default(),
        )
    }

    fn xs(pool: &ParticlePool) -> Vec<f32> {
        pool.iter().map(|p| p.position().x).collect()
    }

    #[test]
    fn iterates_in_insertion_order() {
        let mut pool = ParticlePool::new();
        for x in 0..4 {
            pool.insert(particle(5, x as f32));
        }
        assert_eq!(xs(&pool), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn expired_particles_free_their_slots() {
        let mut pool = ParticlePool::new();
        pool.insert(particle(1, 0.0));
        pool.insert(particle(3, 1.0));
        pool.insert(particle(1, 2.0));

        assert_eq!(pool.advance_all(), 2);
        assert_eq!(pool.len(), 1);
        assert_eq!(xs(&pool), vec![1.0]);

        // Freed slots are reused instead of growing the arena.
        let a = pool.insert(particle(3, 7.0));
        let b = pool.insert(particle(3, 8.0));
        assert!(a < 3 && b < 3);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn advance_until_empty() {
        let mut pool = ParticlePool::new();
        pool.insert(particle(2, 0.0));
        pool.insert(particle(3, 1.0));
        assert_eq!(pool.advance_all(), 0);
        assert_eq!(pool.advance_all(), 1);
        assert_eq!(pool.advance_all(), 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn truncate_retires_from_the_back() {
        let mut pool = ParticlePool::new();
        for x in 0..5 {
            pool.insert(particle(5, x as f32));
        }
        assert_eq!(pool.truncate(2), 3);
        assert_eq!(xs(&pool), vec![0.0, 1.0]);
        assert_eq!(pool.truncate(10), 0);
    }

    #[test]
    fn huge_capacity_reserves_a_bounded_arena() {
        let mut pool = ParticlePool::with_capacity(usize::MAX);
        for x in 0..(ParticlePool::MAX_RESERVED + 3) {
            pool.insert(particle(5, x as f32));
        }
        assert_eq!(pool.len(), ParticlePool::MAX_RESERVED + 3);
    }

    #[test]
    fn clear_resets_everything() {
        let mut pool = ParticlePool::with_capacity(8);
        pool.insert(particle(5, 0.0));
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.iter().count(), 0);
    }
}
