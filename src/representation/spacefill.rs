//! Spacefill: every atom as a sphere sized by its element radius.

use super::attribute::{atoms_to_sphere_attributes, AtomRadius, BuildReport};
use super::buffers::BufferSet;
use super::strategy::BufferStrategy;
use crate::error::MolmeshError;
use crate::mesh::SphereMeshBuilder;
use crate::molecule::{validate_topology, ElementTable, MoleculeSource};

/// Buffers of a spacefill representation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacefillBuffers {
    /// Radius rule the spheres were built with.
    pub radius: AtomRadius,
    /// One sphere per atom, in atom declaration order.
    pub spheres: BufferSet,
}

pub(super) fn build(
    molecule: &impl MoleculeSource,
    radius: AtomRadius,
    elements: &ElementTable,
    sphere_mesh: &SphereMeshBuilder,
    strategy: &dyn BufferStrategy,
    report: &mut BuildReport,
) -> Result<SpacefillBuffers, MolmeshError> {
    validate_topology(molecule)?;
    let attributes =
        atoms_to_sphere_attributes(molecule.atoms(), radius, elements, report);
    Ok(SpacefillBuffers {
        radius,
        spheres: strategy.sphere_buffers(sphere_mesh, &attributes),
    })
}
