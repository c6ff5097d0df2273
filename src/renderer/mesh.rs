//! Triangle meshes and materials

use glam::Vec3;

use super::vertex::Vertex;
use crate::Rgba;

/// Non-indexed triangle list: every three vertices form one triangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            vertices: positions.into_iter().map(Vertex::from_vec3).collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Write each triangle's face normal into its three vertices
    pub fn compute_flat_normals(&mut self) {
        for tri in self.vertices.chunks_exact_mut(3) {
            let (a, b, c) = (tri[0].pos(), tri[1].pos(), tri[2].pos());
            let normal = (b - a).cross(c - a).normalize_or_zero().to_array();
            for v in tri.iter_mut() {
                v.normal = normal;
            }
        }
    }

    /// Largest distance of any vertex from the origin
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.pos().length())
            .fold(0.0, f32::max)
    }
}

/// Surface description for a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgba,
    pub flat_shading: bool,
    pub shininess: f32,
}

impl Material {
    /// Matte, faceted material
    pub fn flat(color: Rgba) -> Self {
        Self {
            color,
            flat_shading: true,
            shininess: 0.0,
        }
    }
}
