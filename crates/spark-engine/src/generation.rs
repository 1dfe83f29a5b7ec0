//! Pending spawn points for burst-mode particle systems.

use glam::Vec2;

/// Maximum number of generation points that may be pending at once.
pub const MAX_GENERATION_POINTS: usize = 20;

/// Number of particles every generation point produces before it retires.
pub const GENERATION_POINT_QUOTA: u32 = 20;

/// A position that still owes `remaining` particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationPoint {
    pub position: Vec2,
    pub remaining: u32,
}

/// Spawns granted to one point for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnAllocation {
    pub position: Vec2,
    pub count: u32,
}

/// Bounded FIFO of generation points.
/// Oldest points are served first; full queues reject new points.
#[derive(Debug, Clone)]
pub struct GenerationQueue {
    points: Vec<GenerationPoint>,
    allocations: Vec<SpawnAllocation>,
}

impl GenerationQueue {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(MAX_GENERATION_POINTS),
            allocations: Vec::with_capacity(MAX_GENERATION_POINTS),
        }
    }

    /// Queue a point with a full quota. Returns false (and drops the point)
    /// when `MAX_GENERATION_POINTS` are already pending.
    pub fn add_point(&mut self, position: Vec2) -> bool {
        if self.is_full() {
            return false;
        }
        self.points.push(GenerationPoint {
            position,
            remaining: GENERATION_POINT_QUOTA,
        });
        true
    }

    /// Hand out up to `max_total` spawns across pending points, oldest first.
    /// Points whose quota reaches zero are removed before returning.
    pub fn draw_budget(&mut self, max_total: u32) -> &[SpawnAllocation] {
        self.allocations.clear();

        let mut left = max_total;
        for point in self.points.iter_mut() {
            if left == 0 {
                break;
            }
            let count = point.remaining.min(left);
            point.remaining -= count;
            left -= count;
            self.allocations.push(SpawnAllocation {
                position: point.position,
                count,
            });
        }

        self.points.retain(|p| p.remaining > 0);
        &self.allocations
    }

    /// Iterate over pending points, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= MAX_GENERATION_POINTS
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.allocations.clear();
    }
}

impl Default for GenerationQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(allocs: &[SpawnAllocation]) -> u32 {
        allocs.iter().map(|a| a.count).sum()
    }

    #[test]
    fn single_point_drains_over_four_frames() {
        let mut q = GenerationQueue::new();
        assert!(q.add_point(Vec2::new(10.0, 20.0)));

        for frame in 0..4 {
            let allocs = q.draw_budget(5).to_vec();
            assert_eq!(allocs.len(), 1, "frame {frame}");
            assert_eq!(allocs[0].count, 5);
            assert_eq!(allocs[0].position, Vec2::new(10.0, 20.0));
        }
        assert!(q.is_empty());
        assert!(q.draw_budget(5).is_empty());
    }

    #[test]
    fn oldest_point_served_first() {
        let mut q = GenerationQueue::new();
        q.add_point(Vec2::new(1.0, 0.0));
        q.add_point(Vec2::new(2.0, 0.0));

        let allocs = q.draw_budget(8).to_vec();
        assert_eq!(allocs.len(), 1);
        assert_eq!(allocs[0].position, Vec2::new(1.0, 0.0));
        assert_eq!(q.iter().next().unwrap().remaining, 12);
    }

    #[test]
    fn budget_spills_to_next_point() {
        let mut q = GenerationQueue::new();
        q.add_point(Vec2::new(1.0, 0.0));
        q.add_point(Vec2::new(2.0, 0.0));

        let allocs = q.draw_budget(25).to_vec();
        assert_eq!(allocs.len(), 2);
        assert_eq!(allocs[0].count, 20);
        assert_eq!(allocs[1].count, 5);
        assert_eq!(total(&allocs), 25);

        // First point is exhausted and gone.
        assert_eq!(q.len(), 1);
        let remaining = q.iter().next().unwrap();
        assert_eq!(remaining.position, Vec2::new(2.0, 0.0));
        assert_eq!(remaining.remaining, 15);
    }

    #[test]
    fn large_budget_exhausts_everything() {
        let mut q = GenerationQueue::new();
        q.add_point(Vec2::ZERO);
        q.add_point(Vec2::ONE);
        assert_eq!(total(q.draw_budget(1000)), 2 * GENERATION_POINT_QUOTA);
        assert!(q.is_empty());
    }

    #[test]
    fn zero_budget_leaves_points_untouched() {
        let mut q = GenerationQueue::new();
        q.add_point(Vec2::ZERO);
        assert!(q.draw_budget(0).is_empty());
        assert_eq!(q.iter().next().unwrap().remaining, GENERATION_POINT_QUOTA);
    }

    #[test]
    fn full_queue_rejects_new_points() {
        let mut q = GenerationQueue::new();
        for i in 0..MAX_GENERATION_POINTS {
            assert!(q.add_point(Vec2::splat(i as f32)));
        }
        assert!(q.is_full());
        assert!(!q.add_point(Vec2::splat(99.0)));
        assert_eq!(q.len(), MAX_GENERATION_POINTS);

        // Freeing a slot makes room again.
        q.draw_budget(GENERATION_POINT_QUOTA);
        assert!(q.add_point(Vec2::splat(99.0)));
    }
}
