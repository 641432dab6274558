use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::require_positive;
use crate::error::MolmeshError;
use crate::representation::{
    AtomRadius, RadiusPolicy, BALL_AND_STICK_RADIUS_SCALE,
    SPACEFILL_RADIUS_SCALE,
};

/// Spacefill sizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Spacefill", inline)]
#[serde(default)]
pub struct SpacefillOptions {
    /// Element radius used for each atom.
    #[schemars(title = "Radius")]
    pub radius_policy: RadiusPolicy,
    /// Multiplier on the element radius.
    #[schemars(title = "Radius Scale", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub radius_size: f32,
}

impl Default for SpacefillOptions {
    fn default() -> Self {
        Self {
            radius_policy: RadiusPolicy::VanDerWaals,
            radius_size: 1.0,
        }
    }
}

impl SpacefillOptions {
    /// Radius rule for spacefill spheres.
    #[must_use]
    pub fn atom_radius(&self) -> AtomRadius {
        AtomRadius {
            policy: self.radius_policy,
            size: self.radius_size,
            scale: SPACEFILL_RADIUS_SCALE,
        }
    }

    pub(super) fn validate(&self) -> Result<(), MolmeshError> {
        require_positive("spacefill.radius_size", self.radius_size)
    }
}

/// Ball-and-stick sizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Ball and Stick", inline)]
#[serde(default)]
pub struct BallAndStickOptions {
    /// Element radius used for each atom sphere.
    #[schemars(title = "Atom Radius")]
    pub atom_radius_policy: RadiusPolicy,
    /// Multiplier on the element radius.
    #[schemars(title = "Atom Scale", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub atom_radius_size: f32,
    /// Bond cylinder radius in angstroms.
    #[schemars(title = "Bond Radius", range(min = 0.02, max = 0.5), extend("step" = 0.01))]
    pub bond_radius: f32,
}

impl Default for BallAndStickOptions {
    fn default() -> Self {
        Self {
            atom_radius_policy: RadiusPolicy::Covalent,
            atom_radius_size: 1.0,
            bond_radius: 0.15,
        }
    }
}

impl BallAndStickOptions {
    /// Radius rule for ball-and-stick spheres.
    #[must_use]
    pub fn atom_radius(&self) -> AtomRadius {
        AtomRadius {
            policy: self.atom_radius_policy,
            size: self.atom_radius_size,
            scale: BALL_AND_STICK_RADIUS_SCALE,
        }
    }

    pub(super) fn validate(&self) -> Result<(), MolmeshError> {
        require_positive("ball_and_stick.atom_radius_size", self.atom_radius_size)?;
        require_positive("ball_and_stick.bond_radius", self.bond_radius)
    }
}
