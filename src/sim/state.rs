//! Simulation state: the deformed core and the particle ring

use glam::Vec3;

use crate::Rgba;
use crate::renderer::mesh::{Material, Mesh};
use crate::renderer::shapes::ShapeKind;

/// The deformed central body
#[derive(Debug, Clone)]
pub struct AsteroidCore {
    /// Deformed geometry, generated once
    pub mesh: Mesh,
    pub material: Material,
    /// Radius of the undeformed base polyhedron
    pub radius: f32,
    /// Rotation about Y (radians, wrapped to [0, 2π))
    pub rotation_y: f32,
}

/// One orbiting particle.
///
/// Shape geometry is shared through the shape library; everything that
/// changes per particle lives here.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleInstance {
    pub shape: ShapeKind,
    pub color: Rgba,
    /// Layout scale, uniform on all three axes
    pub scale: f32,
    /// Per-axis base size fixed at spawn, applied under `scale`
    pub base_scale: Vec3,
    /// Orbital radius
    pub distance: f32,
    /// Orbital angle (radians, wrapped to [0, 2π))
    pub angle: f32,
    /// Orbital angle advanced per tick
    pub angular_speed: f32,
    /// Upper bound of the per-tick self-rotation on each axis
    pub spin: Vec3,
    /// Accumulated self-rotation (Euler XYZ)
    pub rotation: Vec3,
    /// Position in the ring plane
    pub position: Vec3,
}

impl ParticleInstance {
    /// Fresh, not yet laid out particle
    pub fn new(shape: ShapeKind, color: Rgba, spin: Vec3) -> Self {
        Self {
            shape,
            color,
            scale: 1.0,
            base_scale: Vec3::ONE,
            distance: 0.0,
            angle: 0.0,
            angular_speed: 0.0,
            spin,
            rotation: Vec3::ZERO,
            position: Vec3::ZERO,
        }
    }

    /// Model scale: layout scale on top of the spawn-time base size
    pub fn total_scale(&self) -> Vec3 {
        self.base_scale * self.scale
    }
}

/// Particles in creation order
#[derive(Debug, Clone, Default)]
pub struct Ring {
    particles: Vec<ParticleInstance>,
}

impl Ring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[ParticleInstance] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParticleInstance> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ParticleInstance> {
        self.particles.iter_mut()
    }

    pub(crate) fn push(&mut self, particle: ParticleInstance) {
        self.particles.push(particle);
    }

    /// Remove the most recently added particle
    pub(crate) fn pop(&mut self) -> Option<ParticleInstance> {
        self.particles.pop()
    }
}
