//! Per-instance mesh attributes extracted from atoms and bonds.
//!
//! Extraction is representation-agnostic: the caller chooses which atoms or
//! bonds to pass and in what order. Each attribute's `index` is its dense
//! position in that order, and it addresses both the color atlas texel and
//! the instance slot in the block layout, so the same list must feed both.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::atlas::ColorAtlas;
use crate::color::Rgba8;
use crate::error::MolmeshError;
use crate::mesh::{Cylinder, Sphere};
use crate::molecule::{Atom, ElementInfo, ElementTable};

/// Radius substituted for non-finite or non-positive radii.
pub const MIN_SPHERE_RADIUS: f32 = 0.01;

/// Atom radius multiplier for spacefill spheres.
pub const SPACEFILL_RADIUS_SCALE: f32 = 1.0;

/// Atom radius multiplier for ball-and-stick spheres (half the radius).
pub const BALL_AND_STICK_RADIUS_SCALE: f32 = 0.5;

/// Descriptor for one instance of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshAttribute<S> {
    /// Instance color (also written into the atlas).
    pub color: Rgba8,
    /// Dense 0-based ordinal within the attribute list.
    pub index: usize,
    /// Texel-center UV of this instance's color in the atlas.
    pub texcoord: [f32; 2],
    /// Placement of the instance.
    pub shape: S,
}

/// Attribute of one atom sphere.
pub type SphereMeshAttribute = MeshAttribute<Sphere>;

/// Attribute of one bond half-cylinder.
pub type CylinderMeshAttribute = MeshAttribute<Cylinder>;

/// Which element radius sizes an atom sphere.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RadiusPolicy {
    /// Van der Waals radius.
    #[default]
    VanDerWaals,
    /// Covalent radius.
    Covalent,
    /// The same radius for every element (the radius size alone).
    Fixed,
}

/// Radius policy plus the multipliers applied to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomRadius {
    /// Element radius source.
    pub policy: RadiusPolicy,
    /// User-facing radius multiplier.
    pub size: f32,
    /// Representation multiplier ([`SPACEFILL_RADIUS_SCALE`] or
    /// [`BALL_AND_STICK_RADIUS_SCALE`]).
    pub scale: f32,
}

impl AtomRadius {
    /// `policy(element) × size × scale`.
    #[must_use]
    pub fn radius_for(&self, element: &ElementInfo) -> f32 {
        let base = match self.policy {
            RadiusPolicy::VanDerWaals => element.van_der_waals_radius,
            RadiusPolicy::Covalent => element.covalent_radius,
            RadiusPolicy::Fixed => 1.0,
        };
        base * self.size * self.scale
    }
}

/// Which half of a bond a cylinder covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondHalf {
    /// From `atom1` to the midpoint, colored by `atom1`.
    First,
    /// From `atom2` to the midpoint, colored by `atom2`.
    Second,
}

/// Recoveries made while extracting attributes. A clean build has all
/// counters at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildReport {
    /// Attributes whose element symbol was unknown and used the fallback.
    pub fallback_elements: usize,
    /// Half-cylinders with a zero-length axis.
    pub degenerate_cylinders: usize,
    /// Radii replaced with [`MIN_SPHERE_RADIUS`].
    pub clamped_radii: usize,
}

impl BuildReport {
    /// Whether no recovery was needed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    /// Log a one-line summary if anything was recovered.
    pub fn log_summary(&self, label: &str) {
        if !self.is_clean() {
            log::warn!(
                "{label}: {} unknown element(s) drawn with fallback, {} \
                 degenerate cylinder(s), {} clamped radius(es)",
                self.fallback_elements,
                self.degenerate_cylinders,
                self.clamped_radii,
            );
        }
    }

    fn note(&mut self, error: &MolmeshError) {
        match error {
            MolmeshError::UnknownElement(_) => self.fallback_elements += 1,
            MolmeshError::DegenerateGeometry(DEGENERATE_AXIS) => {
                self.degenerate_cylinders += 1;
            }
            MolmeshError::DegenerateGeometry(_) => self.clamped_radii += 1,
            _ => return,
        }
        log::trace!("{error}; recovered in place");
    }
}

const DEGENERATE_AXIS: &str = "zero-length bond";
const DEGENERATE_RADIUS: &str = "non-positive radius";

fn resolve_element<'t>(
    elements: &'t ElementTable,
    symbol: &str,
    report: &mut BuildReport,
) -> &'t ElementInfo {
    elements.lookup(symbol).unwrap_or_else(|err| {
        report.note(&err);
        elements.fallback()
    })
}

fn sanitize_radius(radius: f32, report: &mut BuildReport) -> f32 {
    if radius.is_finite() && radius > 0.0 {
        radius
    } else {
        report.note(&MolmeshError::DegenerateGeometry(DEGENERATE_RADIUS));
        MIN_SPHERE_RADIUS
    }
}

/// One sphere attribute per atom, in iteration order.
pub fn atoms_to_sphere_attributes<'a, I>(
    atoms: I,
    radius: AtomRadius,
    elements: &ElementTable,
    report: &mut BuildReport,
) -> Vec<SphereMeshAttribute>
where
    I: IntoIterator<Item = &'a Atom>,
    I::IntoIter: ExactSizeIterator,
{
    let atoms = atoms.into_iter();
    let side = ColorAtlas::side_for(atoms.len());
    atoms
        .enumerate()
        .map(|(index, atom)| {
            let element = resolve_element(elements, atom.element(), report);
            let r = sanitize_radius(radius.radius_for(element), report);
            MeshAttribute {
                color: element.color,
                index,
                texcoord: ColorAtlas::texel_uv(index, side),
                shape: Sphere::new(r, atom.position()),
            }
        })
        .collect()
}

/// One half-cylinder attribute per bond, in bond order.
///
/// Both halves of a bond end at the same midpoint, computed identically
/// for either `half`.
pub fn bonds_to_cylinder_attributes(
    bond_atoms: &[(&Atom, &Atom)],
    half: BondHalf,
    radius: f32,
    elements: &ElementTable,
    report: &mut BuildReport,
) -> Vec<CylinderMeshAttribute> {
    let side = ColorAtlas::side_for(bond_atoms.len());
    bond_atoms
        .iter()
        .enumerate()
        .map(|(index, &(atom1, atom2))| {
            let midpoint = (atom1.position() + atom2.position()) * 0.5;
            let near = match half {
                BondHalf::First => atom1,
                BondHalf::Second => atom2,
            };
            let element = resolve_element(elements, near.element(), report);
            let cylinder = Cylinder::new(
                near.position(),
                midpoint,
                sanitize_radius(radius, report),
            );
            if cylinder.is_degenerate() {
                report.note(&MolmeshError::DegenerateGeometry(DEGENERATE_AXIS));
            }
            MeshAttribute {
                color: element.color,
                index,
                texcoord: ColorAtlas::texel_uv(index, side),
                shape: cylinder,
            }
        })
        .collect()
}

/// Colors of an attribute list, in index order.
#[must_use]
pub fn attribute_colors<S>(attributes: &[MeshAttribute<S>]) -> Vec<Rgba8> {
    attributes.iter().map(|a| a.color).collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn spacefill_radius() -> AtomRadius {
        AtomRadius {
            policy: RadiusPolicy::VanDerWaals,
            size: 1.0,
            scale: SPACEFILL_RADIUS_SCALE,
        }
    }

    #[test]
    fn radius_policies() {
        let table = ElementTable::standard();
        let o = table.lookup("O").unwrap();
        let mut radius = spacefill_radius();
        assert_eq!(radius.radius_for(o), 1.52);
        radius.policy = RadiusPolicy::Covalent;
        radius.scale = BALL_AND_STICK_RADIUS_SCALE;
        assert_eq!(radius.radius_for(o), 0.33);
        radius.policy = RadiusPolicy::Fixed;
        radius.size = 0.4;
        assert_eq!(radius.radius_for(o), 0.2);
    }

    #[test]
    fn sphere_indices_are_dense_and_uvs_match_atlas() {
        let table = ElementTable::standard();
        let atoms: Vec<Atom> = (0..7)
            .map(|i| Atom::new(i, "C", "C").at(Vec3::splat(i as f32)))
            .collect();
        let mut report = BuildReport::default();
        let attrs = atoms_to_sphere_attributes(
            &atoms,
            spacefill_radius(),
            &table,
            &mut report,
        );
        assert!(report.is_clean());
        let atlas = ColorAtlas::pack(&attribute_colors(&attrs));
        for (i, a) in attrs.iter().enumerate() {
            assert_eq!(a.index, i);
            assert_eq!(a.shape.center, Vec3::splat(i as f32));
            assert_eq!(atlas.texel_at(a.texcoord), ColorAtlas::texel_coord(i, 3));
        }
    }

    #[test]
    fn unknown_element_uses_fallback() {
        let table = ElementTable::standard();
        let atoms = [Atom::new(1, "X1", "Xx")];
        let mut report = BuildReport::default();
        let attrs = atoms_to_sphere_attributes(
            &atoms,
            spacefill_radius(),
            &table,
            &mut report,
        );
        assert_eq!(report.fallback_elements, 1);
        assert_eq!(attrs[0].color, Rgba8::NEUTRAL_GRAY);
        assert_eq!(attrs[0].shape.radius, 1.0);
    }

    #[test]
    fn zero_radius_is_clamped() {
        let table = ElementTable::standard();
        let atoms = [Atom::new(1, "C", "C")];
        let mut radius = spacefill_radius();
        radius.size = 0.0;
        let mut report = BuildReport::default();
        let attrs =
            atoms_to_sphere_attributes(&atoms, radius, &table, &mut report);
        assert_eq!(attrs[0].shape.radius, MIN_SPHERE_RADIUS);
        assert_eq!(report.clamped_radii, 1);
    }

    #[test]
    fn bond_halves_meet_at_midpoint_with_near_atom_color() {
        let table = ElementTable::standard();
        let c = Atom::new(1, "C", "C").at(Vec3::new(0.0, 0.0, 0.0));
        let o = Atom::new(2, "O", "O").at(Vec3::new(1.2, 0.4, -0.3));
        let pairs = [(&c, &o)];
        let mut report = BuildReport::default();
        let first = bonds_to_cylinder_attributes(
            &pairs,
            BondHalf::First,
            0.15,
            &table,
            &mut report,
        );
        let second = bonds_to_cylinder_attributes(
            &pairs,
            BondHalf::Second,
            0.15,
            &table,
            &mut report,
        );
        assert!(report.is_clean());
        assert_eq!(first[0].shape.bottom, c.position());
        assert_eq!(second[0].shape.bottom, o.position());
        assert_eq!(first[0].shape.top, second[0].shape.top);
        assert_eq!(first[0].color, table.lookup("C").unwrap().color);
        assert_eq!(second[0].color, table.lookup("O").unwrap().color);
    }

    #[test]
    fn zero_length_bond_is_reported() {
        let table = ElementTable::standard();
        let a = Atom::new(1, "C", "C").at(Vec3::ONE);
        let b = Atom::new(2, "C", "C").at(Vec3::ONE);
        let mut report = BuildReport::default();
        let attrs = bonds_to_cylinder_attributes(
            &[(&a, &b)],
            BondHalf::First,
            0.15,
            &table,
            &mut report,
        );
        assert_eq!(attrs.len(), 1);
        assert_eq!(report.degenerate_cylinders, 1);
    }
}
