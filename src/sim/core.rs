//! Noise-deformed core generation
//!
//! The core starts as a subdivided tetrahedron. Every vertex is pushed along
//! all three axes by a 3D simplex sample taken at the (scaled) vertex
//! position. Vertices shared between triangles sample the same point, so the
//! surface stays closed.

use glam::Vec3;
use noise::{NoiseFn, Simplex};

use super::state::AsteroidCore;
use crate::Rgba;
use crate::consts::{CORE_DETAIL, NOISE_DISPLACEMENT, NOISE_FREQUENCY, NOISE_SEED};
use crate::renderer::mesh::{Material, Mesh};
use crate::renderer::shapes::tetrahedron;

/// Coherent 3D noise field used to deform the core
pub struct CoreNoise {
    field: Simplex,
    frequency: f64,
}

impl Default for CoreNoise {
    fn default() -> Self {
        Self::new(NOISE_SEED)
    }
}

impl CoreNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            field: Simplex::new(seed),
            frequency: NOISE_FREQUENCY,
        }
    }

    /// Sample at a vertex position. Non-finite components sample as 0.
    pub fn sample(&self, p: Vec3) -> f32 {
        let coord = |c: f32| {
            if c.is_finite() {
                c as f64 * self.frequency
            } else {
                0.0
            }
        };
        self.field.get([coord(p.x), coord(p.y), coord(p.z)]) as f32
    }
}

/// Displace every vertex by `noise * radius * NOISE_DISPLACEMENT` on each axis
pub fn deform(mesh: &mut Mesh, radius: f32, noise: &CoreNoise) {
    for vertex in mesh.vertices.iter_mut() {
        let offset = noise.sample(vertex.pos()) * radius * NOISE_DISPLACEMENT;
        for c in vertex.position.iter_mut() {
            *c += offset;
        }
    }
    mesh.compute_flat_normals();
}

/// Build the core once: base polyhedron, deformation, flat material
pub fn generate_core(radius: f32, color: Rgba, noise: &CoreNoise) -> AsteroidCore {
    let mut mesh = tetrahedron(radius, CORE_DETAIL);
    deform(&mut mesh, radius, noise);
    log::debug!(
        "Core generated: {} vertices, bounding radius {:.2}",
        mesh.vertex_count(),
        mesh.bounding_radius()
    );

    AsteroidCore {
        mesh,
        material: Material::flat(color),
        radius,
        rotation_y: 0.0,
    }
}
