//! Triangle mesh geometry: indexed faces, face normals, inertia, primitives.

pub mod mesh;
pub mod primitives;

pub use mesh::{Face, Mesh, VertexPN};
