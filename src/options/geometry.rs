use std::num::NonZeroUsize;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::require_nonzero;
use crate::error::MolmeshError;
use crate::mesh::{CylinderEnd, CylinderMeshBuilder, SphereMeshBuilder};
use crate::representation::DEFAULT_MAX_INSTANCES_PER_BLOCK;

/// Shape of each bond half.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum BondStyle {
    /// Straight half-cylinders.
    #[default]
    Cylinder,
    /// Cones narrowing to a point at the bond midpoint.
    Cone,
}

impl BondStyle {
    /// Cylinder end collapsed to a point for this style. The bond
    /// midpoint is the `top` of each half.
    #[must_use]
    pub fn flare(self) -> Option<CylinderEnd> {
        match self {
            Self::Cylinder => None,
            Self::Cone => Some(CylinderEnd::Top),
        }
    }
}

/// Tessellation and draw-call batching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
pub struct GeometryOptions {
    /// Sphere latitude bands (pole to pole).
    #[schemars(title = "Sphere Latitude Bands", range(min = 2, max = 64))]
    pub sphere_lat_div: u32,
    /// Sphere longitude segments.
    #[schemars(title = "Sphere Longitude Segments", range(min = 3, max = 64))]
    pub sphere_long_div: u32,
    /// Radial segments around each bond.
    #[schemars(title = "Bond Segments", range(min = 3, max = 64))]
    pub cylinder_segments: u32,
    /// Bond half shape.
    #[schemars(title = "Bond Style")]
    pub bond_style: BondStyle,
    /// Ceiling on instances per instanced draw call.
    #[schemars(skip)]
    pub max_instances_per_block: u32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            sphere_lat_div: 16,
            sphere_long_div: 16,
            cylinder_segments: 12,
            bond_style: BondStyle::Cylinder,
            max_instances_per_block: DEFAULT_MAX_INSTANCES_PER_BLOCK as u32,
        }
    }
}

impl GeometryOptions {
    /// Sphere builder at the configured resolution.
    #[must_use]
    pub fn sphere_mesh(&self) -> SphereMeshBuilder {
        SphereMeshBuilder::new(
            self.sphere_lat_div as usize,
            self.sphere_long_div as usize,
        )
    }

    /// Bond builder at the configured resolution and style.
    #[must_use]
    pub fn bond_mesh(&self) -> CylinderMeshBuilder {
        CylinderMeshBuilder::new(
            self.cylinder_segments as usize,
            self.bond_style.flare(),
        )
    }

    /// Instance ceiling as a non-zero count.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::InvalidOptions`] when the ceiling is 0.
    pub fn instance_ceiling(&self) -> Result<NonZeroUsize, MolmeshError> {
        NonZeroUsize::new(self.max_instances_per_block as usize).ok_or_else(
            || {
                MolmeshError::InvalidOptions(
                    "geometry.max_instances_per_block must be at least 1"
                        .to_owned(),
                )
            },
        )
    }

    pub(super) fn validate(&self) -> Result<(), MolmeshError> {
        require_nonzero("geometry.sphere_lat_div", self.sphere_lat_div)?;
        require_nonzero("geometry.sphere_long_div", self.sphere_long_div)?;
        require_nonzero("geometry.cylinder_segments", self.cylinder_segments)?;
        let _ = self.instance_ceiling()?;
        Ok(())
    }
}
