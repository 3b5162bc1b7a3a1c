//! Quaternion construction, composition and integration.

use glam::{Mat4, Quat, Vec3};

use crate::error::{Error, Result};

/// Rotation by `angle` radians about `axis`. The axis need not be normalized.
pub fn axis_angle(axis: Vec3, angle: f32) -> Result<Quat> {
    let axis = axis
        .try_normalize()
        .ok_or(Error::DegenerateGeometry("rotation axis has zero length"))?;
    Ok(Quat::from_axis_angle(axis, angle))
}

/// Compose two rotations: apply `first`, then `second`.
///
/// Hamilton products do not commute; this is `second * first`.
#[inline]
pub fn then(first: Quat, second: Quat) -> Quat {
    second * first
}

/// Advance an orientation by a world-frame angular velocity over `dt` seconds.
///
/// The step is the exact rotation for an angular velocity that stays constant
/// over the tick. Zero angular velocity leaves the orientation untouched. The
/// result is renormalized to keep drift from accumulating.
pub fn integrate_orientation(orientation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    let speed = angular_velocity.length();
    if speed <= 0.0 {
        return orientation;
    }
    let delta = Quat::from_axis_angle(angular_velocity / speed, speed * dt);
    then(orientation, delta).normalize()
}

/// Model matrix placing a body: `translation * rotation`.
#[inline]
pub fn model_matrix(orientation: Quat, translation: Vec3) -> Mat4 {
    Mat4::from_rotation_translation(orientation, translation)
}

/// Rotate a vector about the vertical (+z) axis by an angle in degrees.
#[inline]
pub fn rotate_about_z(v: Vec3, degrees: f32) -> Vec3 {
    Quat::from_rotation_z(degrees.to_radians()) * v
}
