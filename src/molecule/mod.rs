//! Molecule data model: atoms, bonds, and the element table.
//!
//! Parsing is not part of this crate; front-ends construct a [`Molecule`]
//! from whatever format they read and hand it to the representation
//! builders through the [`MoleculeSource`] trait.

mod element;

use std::collections::BTreeSet;

pub use element::{ElementInfo, ElementTable, FALLBACK_RADIUS};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::MolmeshError;
use crate::mesh::Sphere;

/// A single atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    serial: u32,
    name: String,
    element: String,
    position: Vec3,
    #[serde(default)]
    alt_loc: Option<char>,
}

impl Atom {
    /// Atom at the origin with no alternate location.
    #[must_use]
    pub fn new(
        serial: u32,
        name: impl Into<String>,
        element: impl Into<String>,
    ) -> Self {
        Self {
            serial,
            name: name.into(),
            element: element.into(),
            position: Vec3::ZERO,
            alt_loc: None,
        }
    }

    /// Builder-style position setter.
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Serial number from the source file.
    #[must_use]
    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// Atom name (e.g. `"CA"`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element symbol used as the element-table key.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Position in angstroms.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Set the position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Alternate-location indicator, if any.
    #[must_use]
    pub fn alt_loc(&self) -> Option<char> {
        self.alt_loc
    }

    /// Set the alternate-location indicator.
    pub fn set_alt_loc(&mut self, alt_loc: Option<char>) {
        self.alt_loc = alt_loc;
    }
}

/// A bond between two atoms, by index into the owning molecule's atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    /// First atom index.
    pub atom1: usize,
    /// Second atom index.
    pub atom2: usize,
}

impl Bond {
    /// Bond between `atom1` and `atom2`.
    #[must_use]
    pub const fn new(atom1: usize, atom2: usize) -> Self {
        Self { atom1, atom2 }
    }
}

/// Read-only view of a molecule, valid for the duration of a build.
pub trait MoleculeSource {
    /// Atoms in declaration order.
    fn atoms(&self) -> &[Atom];
    /// Bonds in declaration order.
    fn bonds(&self) -> &[Bond];
}

/// Owns an ordered atom list and an ordered bond list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    atoms: Vec<Atom>,
    #[serde(default)]
    bonds: Vec<Bond>,
}

impl Molecule {
    /// Molecule from atoms and bonds. Topology is checked at build time,
    /// not here, so parsers can assemble molecules incrementally.
    #[must_use]
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        Self { atoms, bonds }
    }

    /// Replace the atom list.
    pub fn set_atoms(&mut self, atoms: Vec<Atom>) {
        self.atoms = atoms;
    }

    /// Replace the bond list.
    pub fn set_bonds(&mut self, bonds: Vec<Bond>) {
        self.bonds = bonds;
    }

    /// Smallest sphere centered on the atom centroid that contains every
    /// atom position. `None` for an empty molecule.
    #[must_use]
    pub fn bounding_sphere(&self) -> Option<Sphere> {
        if self.atoms.is_empty() {
            return None;
        }
        let center = self.atoms.iter().map(Atom::position).sum::<Vec3>()
            / self.atoms.len() as f32;
        let radius = self
            .atoms
            .iter()
            .map(|a| a.position().distance(center))
            .fold(0.0_f32, f32::max);
        Some(Sphere::new(radius, center))
    }
}

impl MoleculeSource for Molecule {
    fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    fn bonds(&self) -> &[Bond] {
        &self.bonds
    }
}

/// Check that every bond references atoms inside the molecule.
///
/// # Errors
///
/// Returns [`MolmeshError::MalformedTopology`] for the first bond with an
/// out-of-range endpoint.
pub fn validate_topology(
    molecule: &impl MoleculeSource,
) -> Result<(), MolmeshError> {
    let atom_count = molecule.atoms().len();
    for (bond, b) in molecule.bonds().iter().enumerate() {
        for atom in [b.atom1, b.atom2] {
            if atom >= atom_count {
                return Err(MolmeshError::MalformedTopology {
                    bond,
                    atom,
                    atom_count,
                });
            }
        }
    }
    Ok(())
}

/// Atom/atom reference pairs for every bond, in bond order.
///
/// # Errors
///
/// Returns [`MolmeshError::MalformedTopology`] if a bond endpoint is out of
/// range.
pub fn bond_atom_pairs(
    molecule: &impl MoleculeSource,
) -> Result<Vec<(&Atom, &Atom)>, MolmeshError> {
    validate_topology(molecule)?;
    let atoms = molecule.atoms();
    Ok(molecule
        .bonds()
        .iter()
        .map(|b| (&atoms[b.atom1], &atoms[b.atom2]))
        .collect())
}

/// Indices of atoms referenced by at least one bond, deduplicated and in
/// ascending index order.
///
/// # Errors
///
/// Returns [`MolmeshError::MalformedTopology`] if a bond endpoint is out of
/// range.
pub fn bonded_atom_indices(
    molecule: &impl MoleculeSource,
) -> Result<BTreeSet<usize>, MolmeshError> {
    validate_topology(molecule)?;
    Ok(molecule
        .bonds()
        .iter()
        .flat_map(|b| [b.atom1, b.atom2])
        .collect())
}
