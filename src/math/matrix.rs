//! 3x3 matrix helpers.

use glam::Mat3;

use crate::error::{Error, Result};

/// Invert a 3x3 matrix through its adjugate.
///
/// The cofactors of each row are the cross products of the other two rows, so
/// the adjugate's columns are `r1 x r2`, `r2 x r0` and `r0 x r1`. The determinant
/// is the cofactor expansion along the first row.
///
/// A determinant of exactly zero (or a non-finite one) is reported as
/// [`Error::DegenerateGeometry`].
pub fn inverse(m: &Mat3) -> Result<Mat3> {
    let (r0, r1, r2) = (m.row(0), m.row(1), m.row(2));

    let c0 = r1.cross(r2);
    let c1 = r2.cross(r0);
    let c2 = r0.cross(r1);

    let determinant = r0.dot(c0);
    if determinant == 0.0 || !determinant.is_finite() {
        return Err(Error::DegenerateGeometry("matrix is singular"));
    }

    Ok(Mat3::from_cols(c0, c1, c2) * determinant.recip())
}

/// Express a body-frame tensor in world frame: `R * I * R^T`.
#[inline]
pub fn rotate_tensor(rotation: &Mat3, tensor: &Mat3) -> Mat3 {
    *rotation * *tensor * rotation.transpose()
}
