//! Rigid body state and its integration steps.
//!
//! The body has unit mass, so linear velocity doubles as linear momentum.

use glam::{Mat4, Quat, Vec3};

use crate::math;

use super::PhysicsConfig;

/// Dynamic state of the simulated body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyState {
    /// Body center in world space.
    pub position: Vec3,
    /// Unit quaternion, body to world.
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    /// World-frame angular velocity in radians per second.
    pub angular_velocity: Vec3,
}

impl RigidBodyState {
    /// Launch state: configured initial values, with the initial velocity
    /// turned about +z by `launch_angle` degrees.
    pub fn initial(config: &PhysicsConfig, launch_angle: f32) -> Self {
        Self {
            position: config.initial_position,
            orientation: config.initial_orientation,
            linear_velocity: math::rotate_about_z(config.initial_velocity, launch_angle),
            angular_velocity: config.initial_angular_velocity,
        }
    }

    /// Model matrix for rendering: translation * rotation.
    pub fn model_matrix(&self) -> Mat4 {
        math::model_matrix(self.orientation, self.position)
    }

    /// Body-local point expressed in world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }
}

/// Semi-implicit Euler, velocity half: `v += g * dt`.
#[inline]
pub fn apply_gravity(state: &mut RigidBodyState, gravity: Vec3, dt: f32) {
    state.linear_velocity += gravity * dt;
}

/// Rotate the orientation by the current angular velocity over `dt`.
#[inline]
pub fn integrate_orientation(state: &mut RigidBodyState, dt: f32) {
    state.orientation = math::integrate_orientation(state.orientation, state.angular_velocity, dt);
}

/// Semi-implicit Euler, position half: `p += v * dt` with the updated velocity.
#[inline]
pub fn integrate_position(state: &mut RigidBodyState, dt: f32) {
    state.position += state.linear_velocity * dt;
}
