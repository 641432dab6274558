//! Geometric primitives positioned in molecule space.

use glam::{Mat3, Vec3};

use crate::error::MolmeshError;

/// Squared axis length below which a cylinder axis is treated as
/// degenerate.
const DEGENERATE_AXIS_LENGTH_SQ: f32 = 1e-12;

/// A sphere by radius and center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sphere {
    /// Radius in angstroms.
    pub radius: f32,
    /// Center in angstroms.
    pub center: Vec3,
}

impl Sphere {
    /// Sphere of `radius` around `center`.
    #[must_use]
    pub const fn new(radius: f32, center: Vec3) -> Self {
        Self { radius, center }
    }
}

/// A cylinder from `bottom` to `top` with a constant radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cylinder {
    /// Center of the bottom cap.
    pub bottom: Vec3,
    /// Center of the top cap.
    pub top: Vec3,
    /// Radius in angstroms.
    pub radius: f32,
}

impl Cylinder {
    /// Cylinder spanning `bottom` → `top`.
    #[must_use]
    pub const fn new(bottom: Vec3, top: Vec3, radius: f32) -> Self {
        Self {
            bottom,
            top,
            radius,
        }
    }

    /// Vector from bottom to top.
    #[must_use]
    pub fn axis(&self) -> Vec3 {
        self.top - self.bottom
    }

    /// Distance between the cap centers.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.axis().length()
    }

    /// Whether the axis is too short to define an orientation.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.axis().length_squared() < DEGENERATE_AXIS_LENGTH_SQ
    }
}

/// Right-handed orthonormal basis whose second column is `axis`
/// normalized.
///
/// # Errors
///
/// Returns [`MolmeshError::DegenerateGeometry`] for a zero-length or
/// non-finite axis; callers substitute [`Mat3::IDENTITY`].
pub fn orthonormal_basis(axis: Vec3) -> Result<Mat3, MolmeshError> {
    if !axis.is_finite() || axis.length_squared() < DEGENERATE_AXIS_LENGTH_SQ
    {
        return Err(MolmeshError::DegenerateGeometry("zero-length axis"));
    }
    let y = axis.normalize();
    let helper = if y.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let x = y.cross(helper).normalize();
    let z = x.cross(y);
    Ok(Mat3::from_cols(x, y, z))
}
