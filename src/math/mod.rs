//! Rotation and inertia algebra.
//!
//! Plain `glam` operators cover scalar, vector and matrix products and
//! transposes. This module adds what glam leaves unchecked: a 3x3 inverse that
//! reports singular input, and quaternion helpers with an explicit composition
//! order.

pub mod matrix;
pub mod quaternion;

pub use matrix::{inverse, rotate_tensor};
pub use quaternion::{axis_angle, integrate_orientation, model_matrix, rotate_about_z, then};
