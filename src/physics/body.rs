//! Body variants and their terrain contact tests.

use std::sync::Arc;

use glam::{Mat3, Vec3};

use crate::error::Result;
use crate::geometry::Mesh;
use crate::terrain::Heightfield;

use super::contact::Contact;
use super::rigid_body::RigidBodyState;
use super::BoundsPolicy;

/// Which body is being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyVariant {
    Sphere,
    Polyhedron,
}

impl BodyVariant {
    /// The other variant.
    pub fn toggled(self) -> Self {
        match self {
            Self::Sphere => Self::Polyhedron,
            Self::Polyhedron => Self::Sphere,
        }
    }
}

/// Analytic sphere. The mesh is only for display.
#[derive(Debug, Clone)]
pub struct SphereBody {
    pub radius: f32,
    pub mesh: Arc<Mesh>,
}

/// Convex polyhedron colliding through its vertices.
#[derive(Debug, Clone)]
pub struct PolyhedronBody {
    mesh: Arc<Mesh>,
    inertia: Mat3,
}

impl PolyhedronBody {
    pub fn new(mesh: Arc<Mesh>) -> Self {
        let inertia = mesh.inertia_tensor();
        Self { mesh, inertia }
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// Body-frame inertia tensor (unit point mass per vertex).
    pub fn inertia(&self) -> Mat3 {
        self.inertia
    }
}

/// Borrowed view of the active body.
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    Sphere(&'a SphereBody),
    Polyhedron(&'a PolyhedronBody),
}

impl<'a> Body<'a> {
    pub fn variant(&self) -> BodyVariant {
        match self {
            Body::Sphere(_) => BodyVariant::Sphere,
            Body::Polyhedron(_) => BodyVariant::Polyhedron,
        }
    }

    pub fn mesh(&self) -> &'a Arc<Mesh> {
        match *self {
            Body::Sphere(sphere) => &sphere.mesh,
            Body::Polyhedron(poly) => &poly.mesh,
        }
    }

    /// Test the body against the terrain under its center.
    pub fn detect(
        &self,
        state: &RigidBodyState,
        terrain: &Heightfield,
        bounds: BoundsPolicy,
    ) -> Result<Option<Contact>> {
        let (x, y) = (state.position.x, state.position.y);
        let height = bounds.height(terrain, x, y)?;

        match self {
            Body::Sphere(sphere) => {
                let dz = state.position.z - height;
                let touching = dz < sphere.radius || (dz - sphere.radius).abs() <= f32::EPSILON;
                if !touching {
                    return Ok(None);
                }
                Ok(Some(Contact {
                    terrain_height: height,
                    normal: bounds.normal(terrain, x, y)?,
                    penetration: sphere.radius - dz,
                    local_point: None,
                }))
            }
            Body::Polyhedron(poly) => {
                let normal = bounds.normal(terrain, x, y)?;
                let surface = Vec3::new(x, y, height);

                // Signed distance of every vertex to the tangent plane under
                // the body center.
                let deepest = poly
                    .mesh
                    .vertices()
                    .iter()
                    .map(|&local| (local, (state.to_world(local) - surface).dot(normal)))
                    .min_by(|a, b| a.1.total_cmp(&b.1));

                match deepest {
                    Some((local, distance)) if distance < 0.0 => Ok(Some(Contact {
                        terrain_height: height,
                        normal,
                        penetration: -distance,
                        local_point: Some(local),
                    })),
                    _ => Ok(None),
                }
            }
        }
    }
}

impl BoundsPolicy {
    pub(crate) fn height(self, terrain: &Heightfield, x: f32, y: f32) -> Result<f32> {
        match self {
            BoundsPolicy::Clamp => terrain.height_clamped(x, y),
            BoundsPolicy::Reject => terrain.height(x, y),
        }
    }

    pub(crate) fn normal(self, terrain: &Heightfield, x: f32, y: f32) -> Result<Vec3> {
        match self {
            BoundsPolicy::Clamp => terrain.normal_clamped(x, y),
            BoundsPolicy::Reject => terrain.normal(x, y),
        }
    }
}
