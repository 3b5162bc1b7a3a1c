//! Impulse response for body/terrain contacts.
//!
//! A single normal restitution impulse per contact; there is no friction, so
//! the tangential velocity is left as it is.

use glam::{Mat3, Quat, Vec3};

use crate::error::Result;
use crate::math;

use super::body::Body;
use super::contact::{Contact, ContactResponse};
use super::rigid_body::RigidBodyState;

/// `-(1 + e) (v . n) n`: reflects the normal velocity component, scaled by the
/// coefficient of restitution.
#[inline]
pub fn restitution_impulse(velocity: Vec3, normal: Vec3, elasticity: f32) -> Vec3 {
    -(1.0 + elasticity) * velocity.dot(normal) * normal
}

/// Angular velocity change from an impulse applied at a body-frame lever arm,
/// through the world-frame inverse inertia `(R I R^T)^-1`.
pub fn angular_response(
    orientation: Quat,
    inertia: &Mat3,
    lever: Vec3,
    impulse: Vec3,
) -> Result<Vec3> {
    let rotation = Mat3::from_quat(orientation);
    let world_inertia = math::rotate_tensor(&rotation, inertia);
    let inverse = math::inverse(&world_inertia)?;
    Ok(inverse * lever.cross(impulse))
}

/// Apply the contact response to `state`.
///
/// Everything that can fail is computed before `state` is written, so an error
/// leaves it untouched.
pub fn resolve(
    body: Body<'_>,
    state: &mut RigidBodyState,
    contact: &Contact,
    elasticity: f32,
) -> Result<ContactResponse> {
    let impulse = restitution_impulse(state.linear_velocity, contact.normal, elasticity);

    let (angular_impulse, corrected_position) = match body {
        Body::Sphere(sphere) => {
            // Rest the shell on the surface straight above the contact.
            let mut position = state.position;
            position.z = contact.terrain_height + sphere.radius;
            (Vec3::ZERO, position)
        }
        Body::Polyhedron(poly) => {
            let lever = contact.local_point.unwrap_or(Vec3::ZERO);
            let angular = angular_response(state.orientation, &poly.inertia(), lever, impulse)?;
            let position = state.position + contact.penetration.abs() * contact.normal;
            (angular, position)
        }
    };

    state.linear_velocity += impulse;
    state.angular_velocity += angular_impulse;
    state.position = corrected_position;

    Ok(ContactResponse {
        contact: *contact,
        impulse,
        angular_impulse,
        corrected_position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geometry::{primitives, Mesh};
    use crate::physics::body::{PolyhedronBody, SphereBody};
    use std::sync::Arc;

    fn falling(position: Vec3, velocity: Vec3) -> RigidBodyState {
        RigidBodyState {
            position,
            orientation: Quat::IDENTITY,
            linear_velocity: velocity,
            angular_velocity: Vec3::ZERO,
        }
    }

    #[test]
    fn test_restitution_reflects_normal_component() {
        let j = restitution_impulse(Vec3::new(3.0, 0.0, -10.0), Vec3::Z, 0.6);
        assert_eq!(j, Vec3::new(0.0, 0.0, 16.0));
        let v = Vec3::new(3.0, 0.0, -10.0) + j;
        assert_eq!(v, Vec3::new(3.0, 0.0, 6.0));
    }

    #[test]
    fn test_sphere_snaps_to_surface() {
        let sphere = SphereBody {
            radius: 1.0,
            mesh: Arc::new(primitives::uv_sphere(1.0, 8, 4).unwrap()),
        };
        let mut state = falling(Vec3::new(2.0, 1.0, 0.7), Vec3::new(5.0, 0.0, -4.0));
        let contact = Contact {
            terrain_height: 0.5,
            normal: Vec3::Z,
            penetration: 0.8,
            local_point: None,
        };

        let response = resolve(Body::Sphere(&sphere), &mut state, &contact, 0.6).unwrap();

        assert_eq!(state.position, Vec3::new(2.0, 1.0, 1.5));
        assert_eq!(response.corrected_position, state.position);
        assert!((state.linear_velocity.z - 2.4).abs() < 1e-6);
        assert_eq!(state.linear_velocity.x, 5.0);
        assert_eq!(state.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_polyhedron_off_center_hit_spins() {
        let poly = PolyhedronBody::new(Arc::new(primitives::dodecahedron(1.0).unwrap()));
        let mut state = falling(Vec3::new(0.0, 0.0, 0.8), Vec3::new(0.0, 0.0, -3.0));
        let contact = Contact {
            terrain_height: 0.0,
            normal: Vec3::Z,
            penetration: 0.1,
            local_point: Some(Vec3::new(0.5, 0.0, -0.8)),
        };

        let response = resolve(Body::Polyhedron(&poly), &mut state, &contact, 0.5).unwrap();

        // Lever along +x, impulse along +z: spin about -y.
        assert!(response.angular_impulse.y < 0.0);
        assert!(response.angular_impulse.x.abs() < 1e-5);
        assert!((state.position.z - 0.9).abs() < 1e-6);
        assert!((state.linear_velocity.z - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_singular_inertia_leaves_state_untouched() {
        // All vertices on the x axis: no moment about x, singular tensor.
        let mesh = Mesh::new(
            vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            vec![],
        )
        .unwrap();
        let poly = PolyhedronBody::new(Arc::new(mesh));
        let before = falling(Vec3::new(0.0, 0.0, 0.5), Vec3::new(1.0, 0.0, -2.0));
        let mut state = before;
        let contact = Contact {
            terrain_height: 0.0,
            normal: Vec3::Z,
            penetration: 0.5,
            local_point: Some(Vec3::new(-1.0, 0.0, 0.0)),
        };

        let err = resolve(Body::Polyhedron(&poly), &mut state, &contact, 0.6).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
        assert_eq!(state, before);
    }
}
