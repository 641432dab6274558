//! Crate-level error types.

use std::fmt;

/// Errors produced by the molmesh crate.
#[derive(Debug)]
pub enum MolmeshError {
    /// Element symbol absent from the element table. Recovered with the
    /// table's fallback radius and color; never aborts a build.
    UnknownElement(String),
    /// A bond references an atom index outside the molecule. Aborts the
    /// whole representation build.
    MalformedTopology {
        /// Position of the offending bond in the molecule's bond list.
        bond: usize,
        /// The out-of-range atom index.
        atom: usize,
        /// Number of atoms in the molecule.
        atom_count: usize,
    },
    /// Zero-length bond axis or zero-radius sphere. Replaced in place with
    /// a stable basis or minimum radius.
    DegenerateGeometry(&'static str),
    /// Options failed validation.
    InvalidOptions(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn the background build thread.
    ThreadSpawn(std::io::Error),
}

impl fmt::Display for MolmeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElement(symbol) => {
                write!(f, "unknown element symbol '{symbol}'")
            }
            Self::MalformedTopology {
                bond,
                atom,
                atom_count,
            } => write!(
                f,
                "malformed topology: bond {bond} references atom {atom} but \
                 the molecule has {atom_count} atoms"
            ),
            Self::DegenerateGeometry(what) => {
                write!(f, "degenerate geometry: {what}")
            }
            Self::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
        }
    }
}

impl std::error::Error for MolmeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MolmeshError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
