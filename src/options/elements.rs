use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::require_positive;
use crate::error::MolmeshError;

/// Element table overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Elements", inline)]
#[serde(default)]
pub struct ElementOptions {
    /// Radius (both van der Waals and covalent) for unknown elements.
    #[schemars(title = "Fallback Radius", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub fallback_radius: f32,
    /// RGB color for unknown elements.
    #[schemars(skip)]
    pub fallback_color: [u8; 3],
    /// Per-element RGB color overrides, keyed by symbol.
    #[schemars(skip)]
    pub color_overrides: BTreeMap<String, [u8; 3]>,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            fallback_radius: 1.0,
            fallback_color: [0x80, 0x80, 0x80],
            color_overrides: BTreeMap::new(),
        }
    }
}

impl ElementOptions {
    pub(super) fn validate(&self) -> Result<(), MolmeshError> {
        require_positive("elements.fallback_radius", self.fallback_radius)
    }
}
