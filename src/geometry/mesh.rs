//! Indexed triangle mesh
//!
//! Immutable vertex/face geometry with per-face unit normals. Used both for the
//! bodies (sphere and polyhedron) and for the triangulated terrain.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec3};

use crate::error::{Error, Result};

/// Three vertex indices, counter-clockwise when viewed from outside.
pub type Face = [u32; 3];

/// Flat-shaded vertex handed to an external renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPN {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// A triangle mesh with precomputed face normals.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    normals: Vec<Vec3>,
}

impl Mesh {
    /// Build a mesh, validating face indices and computing face normals.
    ///
    /// Faces with zero area have no normal and are rejected.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Result<Self> {
        let count = vertices.len();
        for (id, face) in faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&i| i as usize >= count) {
                return Err(Error::InvalidMesh(format!(
                    "face {id} references vertex {bad}, but only {count} vertices exist"
                )));
            }
        }

        let normals = faces
            .iter()
            .map(|face| face_normal(&vertices, face))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            vertices,
            faces,
            normals,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Unit normals, one per face.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The three corner positions of a face.
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        let [a, b, c] = self.faces[face];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Inertia tensor assuming a unit point mass at every vertex.
    ///
    /// This is not a volumetric integral; it is the tensor of the vertex cloud
    /// about the local origin.
    pub fn inertia_tensor(&self) -> Mat3 {
        let (mut xx, mut yy, mut zz) = (0.0, 0.0, 0.0);
        let (mut xy, mut xz, mut yz) = (0.0, 0.0, 0.0);

        for v in &self.vertices {
            xx += v.y * v.y + v.z * v.z;
            yy += v.x * v.x + v.z * v.z;
            zz += v.x * v.x + v.y * v.y;
            xy -= v.x * v.y;
            xz -= v.x * v.z;
            yz -= v.y * v.z;
        }

        Mat3::from_cols(
            Vec3::new(xx, xy, xz),
            Vec3::new(xy, yy, yz),
            Vec3::new(xz, yz, zz),
        )
    }

    /// Largest distance from the local origin to any vertex.
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.length())
            .fold(0.0, f32::max)
    }

    /// Three vertices per face carrying the face normal, ready for upload.
    pub fn flat_shaded_vertices(&self) -> Vec<VertexPN> {
        let mut out = Vec::with_capacity(self.faces.len() * 3);
        for (face, normal) in self.normals.iter().enumerate() {
            for corner in self.triangle(face) {
                out.push(VertexPN {
                    position: corner.to_array(),
                    normal: normal.to_array(),
                });
            }
        }
        out
    }
}

/// `normalize((q - p) x (r - p))` for face `(p, q, r)`.
fn face_normal(vertices: &[Vec3], face: &Face) -> Result<Vec3> {
    let p = vertices[face[0] as usize];
    let q = vertices[face[1] as usize];
    let r = vertices[face[2] as usize];
    (q - p)
        .cross(r - p)
        .try_normalize()
        .ok_or(Error::DegenerateGeometry("face has zero area"))
}
