//! Shape generation for 3D primitives
//!
//! All builders produce non-indexed triangle lists centred on the origin with
//! flat normals already written.

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;

use super::mesh::Mesh;
use crate::error::{AsteroidError, Result};

const TETRAHEDRON_VERTICES: [Vec3; 4] = [
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
];

const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

/// Subdivide each face into `(detail + 1)^2` triangles and project every
/// point onto a sphere of `radius`
fn polyhedron(base: &[Vec3], faces: &[[usize; 3]], radius: f32, detail: u32) -> Vec<Vec3> {
    let cols = detail as usize + 1;
    let mut positions = Vec::with_capacity(faces.len() * cols * cols * 3);

    for face in faces {
        let (a, b, c) = (base[face[0]], base[face[1]], base[face[2]]);

        // grid[i][j]: row i runs from edge a-c towards b-c
        let mut grid: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
        for i in 0..=cols {
            let t = i as f32 / cols as f32;
            let aj = a.lerp(c, t);
            let bj = b.lerp(c, t);
            let rows = cols - i;
            let row = (0..=rows)
                .map(|j| {
                    if rows == 0 {
                        aj
                    } else {
                        aj.lerp(bj, j as f32 / rows as f32)
                    }
                })
                .collect();
            grid.push(row);
        }

        for i in 0..cols {
            for j in 0..(2 * (cols - i) - 1) {
                let k = j / 2;
                if j % 2 == 0 {
                    positions.push(grid[i][k + 1]);
                    positions.push(grid[i + 1][k]);
                    positions.push(grid[i][k]);
                } else {
                    positions.push(grid[i][k + 1]);
                    positions.push(grid[i + 1][k + 1]);
                    positions.push(grid[i + 1][k]);
                }
            }
        }
    }

    for p in positions.iter_mut() {
        *p = p.normalize() * radius;
    }
    positions
}

/// Subdivided tetrahedron of the given circumradius
pub fn tetrahedron(radius: f32, detail: u32) -> Mesh {
    let mut mesh = Mesh::from_positions(polyhedron(
        &TETRAHEDRON_VERTICES,
        &TETRAHEDRON_FACES,
        radius,
        detail,
    ));
    mesh.compute_flat_normals();
    mesh
}

/// Axis-aligned box
pub fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    let corner = |sx: f32, sy: f32, sz: f32| Vec3::new(sx * x, sy * y, sz * z);

    // Each face as a quad in counter-clockwise order seen from outside
    let quads = [
        [corner(1., -1., 1.), corner(1., -1., -1.), corner(1., 1., -1.), corner(1., 1., 1.)],
        [corner(-1., -1., -1.), corner(-1., -1., 1.), corner(-1., 1., 1.), corner(-1., 1., -1.)],
        [corner(-1., 1., 1.), corner(1., 1., 1.), corner(1., 1., -1.), corner(-1., 1., -1.)],
        [corner(-1., -1., -1.), corner(1., -1., -1.), corner(1., -1., 1.), corner(-1., -1., 1.)],
        [corner(-1., -1., 1.), corner(1., -1., 1.), corner(1., 1., 1.), corner(-1., 1., 1.)],
        [corner(1., -1., -1.), corner(-1., -1., -1.), corner(-1., 1., -1.), corner(1., 1., -1.)],
    ];

    let mut positions = Vec::with_capacity(36);
    for [a, b, c, d] in quads {
        positions.extend_from_slice(&[a, b, c, a, c, d]);
    }

    let mut mesh = Mesh::from_positions(positions);
    mesh.compute_flat_normals();
    mesh
}

/// Cone with a polygonal base (`segments` sides), apex on +Y
pub fn pyramid(base_radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let apex = Vec3::new(0.0, height / 2.0, 0.0);
    let base_center = Vec3::new(0.0, -height / 2.0, 0.0);
    let rim = |i: u32| {
        let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
        Vec3::new(base_radius * theta.sin(), -height / 2.0, base_radius * theta.cos())
    };

    let mut positions = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let (p1, p2) = (rim(i), rim(i + 1));
        // Side
        positions.extend_from_slice(&[apex, p1, p2]);
        // Base, facing -Y
        positions.extend_from_slice(&[base_center, p2, p1]);
    }

    let mut mesh = Mesh::from_positions(positions);
    mesh.compute_flat_normals();
    mesh
}

/// The fixed set of particle shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cube,
    Pyramid,
    Tetrahedron,
    Slab,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Cube,
        ShapeKind::Pyramid,
        ShapeKind::Tetrahedron,
        ShapeKind::Slab,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Pyramid => "pyramid",
            ShapeKind::Tetrahedron => "tetrahedron",
            ShapeKind::Slab => "slab",
        }
    }

    /// Unit-size template for this shape
    pub fn build(&self) -> Mesh {
        match self {
            ShapeKind::Cube => cuboid(1.0, 1.0, 1.0),
            ShapeKind::Pyramid => pyramid(1.0, 2.0, 4),
            ShapeKind::Tetrahedron => tetrahedron(1.0, 2),
            ShapeKind::Slab => cuboid(1.0 / 6.0, 2.0, 1.0),
        }
    }

    /// Per-axis scale that turns the unit template into a particle of base
    /// `size`. A slab only grows along its thin axis.
    pub fn base_scale(&self, size: f32) -> Vec3 {
        match self {
            ShapeKind::Slab => Vec3::new(size, 1.0, 1.0),
            _ => Vec3::splat(size),
        }
    }
}

/// Immutable shape templates shared by every particle
#[derive(Debug, Clone)]
pub struct ShapeLibrary {
    templates: Vec<(ShapeKind, Arc<Mesh>)>,
}

impl ShapeLibrary {
    /// Library holding the given kinds; fails when empty
    pub fn new(kinds: &[ShapeKind]) -> Result<Self> {
        if kinds.is_empty() {
            return Err(AsteroidError::EmptyShapeLibrary);
        }
        let templates = kinds
            .iter()
            .map(|kind| (*kind, Arc::new(kind.build())))
            .collect();
        Ok(Self { templates })
    }

    /// All four standard shapes
    pub fn standard() -> Self {
        Self {
            templates: ShapeKind::ALL
                .iter()
                .map(|kind| (*kind, Arc::new(kind.build())))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ShapeKind> + '_ {
        self.templates.iter().map(|(kind, _)| *kind)
    }

    pub fn get(&self, kind: ShapeKind) -> Option<&Arc<Mesh>> {
        self.templates
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, mesh)| mesh)
    }

    /// Uniformly random shape kind
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        self.templates[rng.random_range(0..self.templates.len())].0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_base_scale() {
        assert_eq!(ShapeKind::Cube.base_scale(1.2), Vec3::splat(1.2));
        assert_eq!(ShapeKind::Tetrahedron.base_scale(0.8), Vec3::splat(0.8));
        assert_eq!(ShapeKind::Slab.base_scale(0.9), Vec3::new(0.9, 1.0, 1.0));
    }

    #[test]
    fn test_tetrahedron_vertex_count() {
        // 4 faces * (detail + 1)^2 triangles * 3 vertices
        assert_eq!(tetrahedron(20.0, 2).vertex_count(), 108);
        assert_eq!(tetrahedron(1.0, 0).vertex_count(), 12);
    }

    #[test]
    fn test_tetrahedron_on_sphere() {
        let mesh = tetrahedron(20.0, 2);
        for v in &mesh.vertices {
            assert!((v.pos().length() - 20.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_tetrahedron_normals_point_outward() {
        let mesh = tetrahedron(5.0, 2);
        for tri in mesh.vertices.chunks_exact(3) {
            let centroid = (tri[0].pos() + tri[1].pos() + tri[2].pos()) / 3.0;
            let normal = Vec3::from_array(tri[0].normal);
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = cuboid(1.0, 2.0, 3.0);
        assert_eq!(mesh.vertex_count(), 36);
        for tri in mesh.vertices.chunks_exact(3) {
            let centroid = (tri[0].pos() + tri[1].pos() + tri[2].pos()) / 3.0;
            let normal = Vec3::from_array(tri[0].normal);
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_pyramid_triangles() {
        let mesh = pyramid(1.0, 2.0, 4);
        assert_eq!(mesh.triangle_count(), 8);
        for tri in mesh.vertices.chunks_exact(3) {
            let centroid = (tri[0].pos() + tri[1].pos() + tri[2].pos()) / 3.0;
            let normal = Vec3::from_array(tri[0].normal);
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_slab_is_thin() {
        let mesh = ShapeKind::Slab.build();
        let max_x = mesh
            .vertices
            .iter()
            .map(|v| v.position[0].abs())
            .fold(0.0, f32::max);
        assert!((max_x - 1.0 / 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_library_rejects_empty() {
        assert!(matches!(
            ShapeLibrary::new(&[]),
            Err(AsteroidError::EmptyShapeLibrary)
        ));
    }

    #[test]
    fn test_library_templates_are_shared() {
        let library = ShapeLibrary::standard();
        let a = library.get(ShapeKind::Cube).unwrap().clone();
        let b = library.get(ShapeKind::Cube).unwrap().clone();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_library_choose_covers_all_kinds() {
        let library = ShapeLibrary::standard();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(library.choose(&mut rng));
        }
        assert_eq!(seen.len(), 4);

        let single = ShapeLibrary::new(&[ShapeKind::Slab]).unwrap();
        assert_eq!(single.choose(&mut rng), ShapeKind::Slab);
    }
}
