//! Representation and tessellation options with TOML preset support.
//!
//! Every tunable input of the pipeline (initial display mode, tessellation,
//! draw-call ceiling, radius policies, element overrides) lives here.
//! Options serialize to/from TOML so presets can be stored on disk.

mod elements;
mod geometry;
mod representation;

use std::path::Path;

pub use elements::ElementOptions;
pub use geometry::{BondStyle, GeometryOptions};
pub use representation::{BallAndStickOptions, SpacefillOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MolmeshError;
use crate::representation::MoleculeDisplay;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[geometry]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Representation shown when a molecule is first loaded.
    pub display: MoleculeDisplay,
    /// Tessellation and batching.
    pub geometry: GeometryOptions,
    /// Spacefill sizing.
    pub spacefill: SpacefillOptions,
    /// Ball-and-stick sizing.
    pub ball_and_stick: BallAndStickOptions,
    /// Element table overrides.
    pub elements: ElementOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::Io`] if the file cannot be read and
    /// [`MolmeshError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, MolmeshError> {
        let content = std::fs::read_to_string(path).map_err(MolmeshError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MolmeshError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::OptionsParse`] on serialization failure and
    /// [`MolmeshError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MolmeshError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolmeshError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MolmeshError::Io)?;
        }
        std::fs::write(path, content).map_err(MolmeshError::Io)
    }

    /// Reject values the builders cannot use: zero divisions or ceilings
    /// and non-positive sizes.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::InvalidOptions`] naming the first bad field.
    pub fn validate(&self) -> Result<(), MolmeshError> {
        self.geometry.validate()?;
        self.spacefill.validate()?;
        self.ball_and_stick.validate()?;
        self.elements.validate()
    }
}

fn require_positive(field: &str, value: f32) -> Result<(), MolmeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MolmeshError::InvalidOptions(format!(
            "{field} must be a positive finite number, got {value}"
        )))
    }
}

fn require_nonzero(field: &str, value: u32) -> Result<(), MolmeshError> {
    if value == 0 {
        Err(MolmeshError::InvalidOptions(format!("{field} must be at least 1")))
    } else {
        Ok(())
    }
}
