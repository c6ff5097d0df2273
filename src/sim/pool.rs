//! Particle pool reconciliation
//!
//! Grows or shrinks the ring until it holds exactly the requested number of
//! particles. New particles get a random shape and a random palette color;
//! both are shared, never consumed. Shrinking drops from the ring end.

use glam::Vec3;
use rand::Rng;

use super::state::{ParticleInstance, Ring};
use crate::consts::{MAX_BASE_SIZE, MAX_TUMBLE_STEP, MIN_BASE_SIZE};
use crate::error::{AsteroidError, Result};
use crate::params::ColorPalette;
use crate::renderer::shapes::ShapeLibrary;

/// How a reconcile changed the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolChange {
    pub added: usize,
    pub removed: usize,
}

impl PoolChange {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Shapes and colors new particles are drawn from
#[derive(Debug, Clone)]
pub struct ParticlePool {
    shapes: ShapeLibrary,
    palette: ColorPalette,
}

impl ParticlePool {
    /// Fails loudly on an empty shape library or palette
    pub fn new(shapes: ShapeLibrary, palette: ColorPalette) -> Result<Self> {
        if shapes.is_empty() {
            return Err(AsteroidError::EmptyShapeLibrary);
        }
        if palette.is_empty() {
            return Err(AsteroidError::EmptyPalette);
        }
        Ok(Self { shapes, palette })
    }

    pub fn shapes(&self) -> &ShapeLibrary {
        &self.shapes
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Create one particle with random shape, base size, color and spin bounds
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ParticleInstance> {
        let shape = self.shapes.choose(rng);
        let size = MIN_BASE_SIZE + (MAX_BASE_SIZE - MIN_BASE_SIZE) * rng.random::<f32>();
        let color = self.palette.pick(rng).ok_or(AsteroidError::EmptyPalette)?;
        let spin = Vec3::new(rng.random(), rng.random(), rng.random()) * MAX_TUMBLE_STEP;

        let mut particle = ParticleInstance::new(shape, color, spin);
        particle.base_scale = shape.base_scale(size);
        Ok(particle)
    }

    /// Bring the ring to exactly `target` particles.
    ///
    /// Existing particles are kept as they are; only the difference is
    /// created or dropped.
    pub fn reconcile<R: Rng + ?Sized>(
        &self,
        ring: &mut Ring,
        target: usize,
        rng: &mut R,
    ) -> Result<PoolChange> {
        let mut change = PoolChange::default();

        while ring.len() < target {
            ring.push(self.spawn(rng)?);
            change.added += 1;
        }
        while ring.len() > target {
            // Owned by the ring only, so popping is the whole teardown
            if ring.pop().is_some() {
                change.removed += 1;
            }
        }

        if !change.is_noop() {
            log::info!(
                "Ring reconciled to {} particles (+{} / -{})",
                ring.len(),
                change.added,
                change.removed
            );
        }
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shapes::ShapeKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pool() -> ParticlePool {
        ParticlePool::new(ShapeLibrary::standard(), ColorPalette::default()).unwrap()
    }

    #[test]
    fn test_grow_and_shrink() {
        let pool = pool();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ring = Ring::new();

        let change = pool.reconcile(&mut ring, 300, &mut rng).unwrap();
        assert_eq!(ring.len(), 300);
        assert_eq!(change, PoolChange { added: 300, removed: 0 });

        let change = pool.reconcile(&mut ring, 50, &mut rng).unwrap();
        assert_eq!(ring.len(), 50);
        assert_eq!(change, PoolChange { added: 0, removed: 250 });
    }

    #[test]
    fn test_boundary_counts() {
        let pool = pool();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ring = Ring::new();

        pool.reconcile(&mut ring, 1, &mut rng).unwrap();
        assert_eq!(ring.len(), 1);
        pool.reconcile(&mut ring, 0, &mut rng).unwrap();
        assert!(ring.is_empty());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let pool = pool();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ring = Ring::new();

        pool.reconcile(&mut ring, 20, &mut rng).unwrap();
        let before = ring.particles().to_vec();
        let change = pool.reconcile(&mut ring, 20, &mut rng).unwrap();
        assert!(change.is_noop());
        assert_eq!(ring.particles(), before.as_slice());
    }

    #[test]
    fn test_shrink_drops_most_recent() {
        let pool = pool();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ring = Ring::new();

        pool.reconcile(&mut ring, 10, &mut rng).unwrap();
        let prefix = ring.particles()[..4].to_vec();
        pool.reconcile(&mut ring, 4, &mut rng).unwrap();
        assert_eq!(ring.particles(), prefix.as_slice());
    }

    #[test]
    fn test_spawn_draws_from_pool() {
        let palette = ColorPalette::from_hex(&[0x00ff00]).unwrap();
        let shapes = ShapeLibrary::new(&[ShapeKind::Pyramid]).unwrap();
        let pool = ParticlePool::new(shapes, palette).unwrap();
        let mut rng = Pcg32::seed_from_u64(5);

        for _ in 0..10 {
            let p = pool.spawn(&mut rng).unwrap();
            assert_eq!(p.shape, ShapeKind::Pyramid);
            assert_eq!(p.color, [0.0, 1.0, 0.0, 1.0]);
            for axis in p.spin.to_array() {
                assert!((0.0..MAX_TUMBLE_STEP).contains(&axis));
            }
            assert_eq!(p.base_scale.x, p.base_scale.y);
            assert!((MIN_BASE_SIZE..=MAX_BASE_SIZE).contains(&p.base_scale.x));
        }
    }

    #[test]
    fn test_base_size_varies_per_particle() {
        let pool = pool();
        let mut rng = Pcg32::seed_from_u64(6);
        let mut ring = Ring::new();
        pool.reconcile(&mut ring, 200, &mut rng).unwrap();

        let sizes: Vec<f32> = ring.iter().map(|p| p.base_scale.x).collect();
        assert!(sizes.iter().all(|s| (MIN_BASE_SIZE..=MAX_BASE_SIZE).contains(s)));
        let min = sizes.iter().copied().fold(f32::INFINITY, f32::min);
        let max = sizes.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(max - min > 0.2);

        for p in ring.iter().filter(|p| p.shape == ShapeKind::Slab) {
            assert_eq!(p.base_scale.y, 1.0);
            assert_eq!(p.base_scale.z, 1.0);
        }
    }
}
