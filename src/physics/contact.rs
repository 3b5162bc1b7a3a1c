//! Contact data produced by collision detection and response.

use glam::Vec3;

/// A detected body/terrain contact, before any response is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Terrain elevation under the body center.
    pub terrain_height: f32,
    /// Terrain normal under the body center.
    pub normal: Vec3,
    /// How far the body reaches below the surface (or the sphere's shell
    /// below its radius). Non-negative up to rounding.
    pub penetration: f32,
    /// Deepest vertex in body coordinates; `None` for the sphere.
    pub local_point: Option<Vec3>,
}

/// What the response did to the body in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResponse {
    pub contact: Contact,
    /// Linear impulse added to the (unit mass) velocity.
    pub impulse: Vec3,
    /// Change of angular velocity.
    pub angular_impulse: Vec3,
    /// Body position right after the penetration correction.
    pub corrected_position: Vec3,
}
