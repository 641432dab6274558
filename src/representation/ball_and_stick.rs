//! Ball-and-stick: spheres on bonded atoms plus two-tone bond halves.
//!
//! Only atoms referenced by a bond get a sphere; isolated atoms (ions,
//! waters without hydrogens) are left out. Each bond is split at its
//! midpoint into two half-cylinders, each colored by the atom it touches.

use super::attribute::{
    atoms_to_sphere_attributes, bonds_to_cylinder_attributes, AtomRadius,
    BondHalf, BuildReport,
};
use super::buffers::BufferSet;
use super::strategy::BufferStrategy;
use crate::error::MolmeshError;
use crate::mesh::{CylinderMeshBuilder, SphereMeshBuilder};
use crate::molecule::{
    bond_atom_pairs, bonded_atom_indices, ElementTable, MoleculeSource,
};

/// Buffers of a ball-and-stick representation.
#[derive(Debug, Clone, PartialEq)]
pub struct BallAndStickBuffers {
    /// Radius rule the atom spheres were built with.
    pub atom_radius: AtomRadius,
    /// Bond cylinder radius.
    pub bond_radius: f32,
    /// One sphere per bonded atom, ascending atom index.
    pub spheres: BufferSet,
    /// Half nearest `atom1` of each bond, in bond order.
    pub first_halves: BufferSet,
    /// Half nearest `atom2` of each bond, in bond order.
    pub second_halves: BufferSet,
}

/// Meshes and sizing for one ball-and-stick build.
pub(super) struct BallAndStickParams<'a> {
    pub(super) atom_radius: AtomRadius,
    pub(super) bond_radius: f32,
    pub(super) sphere_mesh: &'a SphereMeshBuilder,
    pub(super) bond_mesh: &'a CylinderMeshBuilder,
}

pub(super) fn build(
    molecule: &impl MoleculeSource,
    params: &BallAndStickParams<'_>,
    elements: &ElementTable,
    strategy: &dyn BufferStrategy,
    report: &mut BuildReport,
) -> Result<BallAndStickBuffers, MolmeshError> {
    let bonded = bonded_atom_indices(molecule)?;
    let pairs = bond_atom_pairs(molecule)?;
    let atoms = molecule.atoms();

    let spheres = atoms_to_sphere_attributes(
        bonded.iter().map(|&i| &atoms[i]),
        params.atom_radius,
        elements,
        report,
    );
    let halves = [BondHalf::First, BondHalf::Second].map(|half| {
        bonds_to_cylinder_attributes(
            &pairs,
            half,
            params.bond_radius,
            elements,
            report,
        )
    });
    let [first, second] = halves;

    Ok(BallAndStickBuffers {
        atom_radius: params.atom_radius,
        bond_radius: params.bond_radius,
        spheres: strategy.sphere_buffers(params.sphere_mesh, &spheres),
        first_halves: strategy.cylinder_buffers(params.bond_mesh, &first),
        second_halves: strategy.cylinder_buffers(params.bond_mesh, &second),
    })
}
