//! Renderable data
//!
//! Meshes, materials and GPU buffer layouts for an external wgpu renderer.
//! Nothing here owns a device or issues draw calls.

pub mod mesh;
pub mod shapes;
pub mod vertex;

pub use mesh::{Material, Mesh};
pub use shapes::{ShapeKind, ShapeLibrary};
pub use vertex::{InstanceRaw, Vertex};
