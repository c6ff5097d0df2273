//! The asteroid entity
//!
//! Construction is an explicit pipeline where each stage consumes the
//! previous stage's output:
//!
//! 1. `generate_core` builds the deformed core mesh
//! 2. `ParticlePool::new` fixes the shapes and colors particles draw from
//! 3. `ParticlePool::reconcile` fills the ring to the target count
//! 4. `relayout` places every particle
//!
//! Afterwards the owner drives it with [`Asteroid::update`] once per frame
//! and the two recompute calls whenever parameters change.

use glam::{EulerRot, Mat4, Quat};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{CORE_COLOR_HEX, CORE_RADIUS, OBJECT_TILT_Z};
use crate::error::{AsteroidError, Result};
use crate::params::{ColorPalette, Parameters};
use crate::renderer::mesh::{Material, Mesh};
use crate::renderer::shapes::{ShapeKind, ShapeLibrary};
use crate::renderer::vertex::InstanceRaw;
use crate::sim::{
    AsteroidCore, CoreNoise, ParticleInstance, ParticlePool, PoolChange, Ring, generate_core,
    relayout, tick,
};
use crate::{Rgba, hex_to_rgba};

/// Where the core color comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoreColor {
    Fixed(Rgba),
    /// Take one color out of the palette; the ring never reuses it
    FromPalette,
}

impl Default for CoreColor {
    fn default() -> Self {
        CoreColor::Fixed(hex_to_rgba(CORE_COLOR_HEX))
    }
}

/// Deformed core plus its particle ring
pub struct Asteroid {
    seed: u64,
    rng: Pcg32,
    core: AsteroidCore,
    pool: ParticlePool,
    ring: Ring,
    tilt: f32,
}

impl Asteroid {
    /// Build an asteroid with the default radius and core color
    pub fn with_defaults(params: &Parameters, palette: &ColorPalette, seed: u64) -> Result<Self> {
        Self::new(params, palette, CORE_RADIUS, CoreColor::default(), seed)
    }

    pub fn new(
        params: &Parameters,
        palette: &ColorPalette,
        radius: f32,
        core_color: CoreColor,
        seed: u64,
    ) -> Result<Self> {
        params.validate()?;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(AsteroidError::InvalidConfiguration {
                field: "radius",
                reason: "must be finite and positive",
            });
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut palette = palette.clone();
        let color = match core_color {
            CoreColor::Fixed(color) => color,
            CoreColor::FromPalette => palette.take(&mut rng).ok_or(AsteroidError::EmptyPalette)?,
        };

        let core = generate_core(radius, color, &CoreNoise::default());
        let pool = ParticlePool::new(ShapeLibrary::standard(), palette)?;
        let mut ring = Ring::new();
        pool.reconcile(&mut ring, params.n_particles as usize, &mut rng)?;
        relayout(&mut ring, params, &mut rng);

        log::info!(
            "Asteroid created: seed {}, radius {}, {} particles",
            seed,
            radius,
            ring.len()
        );

        Ok(Self {
            seed,
            rng,
            core,
            pool,
            ring,
            tilt: OBJECT_TILT_Z,
        })
    }

    /// Advance one frame
    pub fn update(&mut self, params: &Parameters) {
        tick(&mut self.core, &mut self.ring, params, &mut self.rng);
    }

    /// Reconcile the ring against `n_particles`, then re-run the layout
    pub fn update_particles_count(&mut self, params: &Parameters) -> Result<PoolChange> {
        let change = self
            .pool
            .reconcile(&mut self.ring, params.n_particles as usize, &mut self.rng)?;
        relayout(&mut self.ring, params, &mut self.rng);
        Ok(change)
    }

    /// Re-run the layout after radius, speed or size bounds changed
    pub fn update_particles_definition(&mut self, params: &Parameters) {
        relayout(&mut self.ring, params, &mut self.rng);
    }

    /// Renderable view for the scene graph
    pub fn asteroid_object(&self) -> AsteroidObject<'_> {
        AsteroidObject {
            core: &self.core,
            ring: &self.ring,
            shapes: self.pool.shapes(),
            tilt: self.tilt,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn core(&self) -> &AsteroidCore {
        &self.core
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }
}

/// Particles of one shape, ready for an instanced draw
#[derive(Debug, Clone)]
pub struct ShapeBatch<'a> {
    pub kind: ShapeKind,
    pub mesh: &'a Mesh,
    pub instances: Vec<InstanceRaw>,
}

/// Borrowed view of everything the renderer needs
#[derive(Debug, Clone, Copy)]
pub struct AsteroidObject<'a> {
    core: &'a AsteroidCore,
    ring: &'a Ring,
    shapes: &'a ShapeLibrary,
    tilt: f32,
}

impl<'a> AsteroidObject<'a> {
    /// Transform of the whole object (core and ring)
    pub fn root_transform(&self) -> Mat4 {
        Mat4::from_rotation_z(self.tilt)
    }

    pub fn core_mesh(&self) -> &'a Mesh {
        &self.core.mesh
    }

    pub fn core_material(&self) -> Material {
        self.core.material
    }

    pub fn core_instance(&self) -> InstanceRaw {
        let model = self.root_transform() * Mat4::from_rotation_y(self.core.rotation_y);
        InstanceRaw::new(model, self.core.material.color)
    }

    /// Instance data for every particle, in ring order
    pub fn particle_instances(&self) -> Vec<InstanceRaw> {
        let root = self.root_transform();
        self.ring
            .iter()
            .map(|p| InstanceRaw::new(root * particle_model(p), p.color))
            .collect()
    }

    /// Particle instances grouped by shape, in shape library order
    pub fn batches(&self) -> Vec<ShapeBatch<'a>> {
        let root = self.root_transform();
        self.shapes
            .kinds()
            .filter_map(|kind| {
                let mesh = self.shapes.get(kind)?;
                let instances: Vec<InstanceRaw> = self
                    .ring
                    .iter()
                    .filter(|p| p.shape == kind)
                    .map(|p| InstanceRaw::new(root * particle_model(p), p.color))
                    .collect();
                (!instances.is_empty()).then_some(ShapeBatch {
                    kind,
                    mesh: mesh.as_ref(),
                    instances,
                })
            })
            .collect()
    }
}

/// Local transform of a particle inside the ring
fn particle_model(particle: &ParticleInstance) -> Mat4 {
    let r = particle.rotation;
    Mat4::from_scale_rotation_translation(
        particle.total_scale(),
        Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
        particle.position,
    )
}
