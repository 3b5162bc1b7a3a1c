//! Procedural body meshes.
//!
//! Used when no mesh files are available and by the tests. Both meshes are
//! centered on the origin with outward counter-clockwise winding.

use glam::Vec3;

use super::mesh::{Face, Mesh};
use crate::error::Result;

/// Regular dodecahedron with the given circumradius, each pentagon split into
/// three triangles (20 vertices, 36 faces).
pub fn dodecahedron(radius: f32) -> Result<Mesh> {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv = 1.0 / phi;

    let mut vertices = Vec::with_capacity(20);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                vertices.push(Vec3::new(x, y, z));
            }
        }
    }
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            vertices.push(Vec3::new(0.0, a * inv, b * phi));
            vertices.push(Vec3::new(a * inv, b * phi, 0.0));
            vertices.push(Vec3::new(a * phi, 0.0, b * inv));
        }
    }

    // Face centers point at the vertices of the dual icosahedron.
    let mut face_directions = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            face_directions.push(Vec3::new(0.0, a * phi, b));
            face_directions.push(Vec3::new(a, 0.0, b * phi));
            face_directions.push(Vec3::new(a * phi, b, 0.0));
        }
    }

    let mut faces = Vec::with_capacity(36);
    for direction in face_directions {
        let direction = direction.normalize();
        let best = vertices
            .iter()
            .map(|v| v.dot(direction))
            .fold(f32::MIN, f32::max);
        let ring: Vec<u32> = (0..vertices.len() as u32)
            .filter(|&i| (vertices[i as usize].dot(direction) - best).abs() < 1e-4)
            .collect();
        faces.extend(fan(&vertices, &ring, direction));
    }

    let scale = radius / 3.0_f32.sqrt();
    Mesh::new(vertices.into_iter().map(|v| v * scale).collect(), faces)
}

/// Latitude/longitude sphere with shared pole vertices, z up.
///
/// `segments` is clamped to at least 3 and `rings` to at least 2.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Result<Mesh> {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut vertices = Vec::with_capacity((segments * (rings - 1) + 2) as usize);
    vertices.push(Vec3::new(0.0, 0.0, radius));
    for ring in 1..rings {
        let polar = std::f32::consts::PI * ring as f32 / rings as f32;
        let (ring_radius, z) = (polar.sin(), polar.cos());
        for segment in 0..segments {
            let theta = 2.0 * std::f32::consts::PI * segment as f32 / segments as f32;
            vertices.push(
                Vec3::new(ring_radius * theta.cos(), ring_radius * theta.sin(), z) * radius,
            );
        }
    }
    let bottom = vertices.len() as u32;
    vertices.push(Vec3::new(0.0, 0.0, -radius));

    let ring_start = |ring: u32| 1 + (ring - 1) * segments;
    let mut faces: Vec<Face> = Vec::new();

    for segment in 0..segments {
        let next = (segment + 1) % segments;
        faces.push([0, ring_start(1) + segment, ring_start(1) + next]);
    }

    for ring in 1..rings - 1 {
        let upper = ring_start(ring);
        let lower = ring_start(ring + 1);
        for segment in 0..segments {
            let next = (segment + 1) % segments;
            faces.push([upper + segment, lower + segment, lower + next]);
            faces.push([upper + segment, lower + next, upper + next]);
        }
    }

    let last = ring_start(rings - 1);
    for segment in 0..segments {
        let next = (segment + 1) % segments;
        faces.push([last + segment, bottom, last + next]);
    }

    Mesh::new(vertices, faces)
}

/// Triangulate a convex planar polygon as a fan, ordering its corners
/// counter-clockwise as seen from `outward`.
fn fan(vertices: &[Vec3], ring: &[u32], outward: Vec3) -> Vec<Face> {
    let u = outward.any_orthonormal_vector();
    let w = outward.cross(u);
    let center = ring.iter().map(|&i| vertices[i as usize]).sum::<Vec3>() / ring.len() as f32;

    let mut ordered = ring.to_vec();
    ordered.sort_by(|&a, &b| {
        let angle = |i: u32| {
            let d = vertices[i as usize] - center;
            d.dot(w).atan2(d.dot(u))
        };
        angle(a).total_cmp(&angle(b))
    });

    (1..ordered.len() - 1)
        .map(|k| [ordered[0], ordered[k], ordered[k + 1]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &Mesh) {
        for (face, normal) in mesh.normals().iter().enumerate() {
            let [a, b, c] = mesh.triangle(face);
            let centroid = (a + b + c) / 3.0;
            assert!(
                normal.dot(centroid) > 0.0,
                "face {face} points inward: normal {normal:?}, centroid {centroid:?}"
            );
        }
    }

    #[test]
    fn test_dodecahedron_topology() {
        let mesh = dodecahedron(1.0).unwrap();
        assert_eq!(mesh.vertices().len(), 20);
        assert_eq!(mesh.face_count(), 36);
        assert!((mesh.bounding_radius() - 1.0).abs() < 1e-5);
        assert_outward(&mesh);
    }

    #[test]
    fn test_dodecahedron_inertia_is_isotropic() {
        let i = dodecahedron(1.0).unwrap().inertia_tensor();
        let d = i.col(0).x;
        assert!(d > 0.0);
        assert!((i.col(1).y - d).abs() < 1e-4);
        assert!((i.col(2).z - d).abs() < 1e-4);
        assert!(i.col(0).y.abs() < 1e-4);
        assert!(i.col(0).z.abs() < 1e-4);
        assert!(i.col(1).z.abs() < 1e-4);
    }

    #[test]
    fn test_uv_sphere_topology() {
        let mesh = uv_sphere(2.0, 12, 6).unwrap();
        assert_eq!(mesh.vertices().len(), 12 * 5 + 2);
        assert_eq!(mesh.face_count(), 2 * 12 + 2 * 12 * 4);
        assert!(mesh.vertices().iter().all(|v| (v.length() - 2.0).abs() < 1e-5));
        assert_outward(&mesh);
    }
}
