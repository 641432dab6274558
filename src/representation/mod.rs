//! Representation builders: molecule → attribute lists → buffer sets.
//!
//! A [`MoleculeDisplay`] pairs a [`RepresentationKind`] (what to draw) with
//! a [`RenderStrategy`] (how to lay out the buffers).
//! [`RepresentationBuilder`] owns the mesh builders, element table and
//! sizing options, and turns a molecule into an immutable
//! [`Representation`] in one synchronous pass.

mod atlas;
mod attribute;
mod ball_and_stick;
mod buffers;
mod layout;
mod spacefill;
mod strategy;

use std::fmt;
use std::num::NonZeroUsize;

pub use atlas::ColorAtlas;
pub use attribute::{
    atoms_to_sphere_attributes, attribute_colors, bonds_to_cylinder_attributes,
    AtomRadius, BondHalf, BuildReport, CylinderMeshAttribute, MeshAttribute,
    RadiusPolicy, SphereMeshAttribute, BALL_AND_STICK_RADIUS_SCALE,
    MIN_SPHERE_RADIUS, SPACEFILL_RADIUS_SCALE,
};
pub use ball_and_stick::BallAndStickBuffers;
pub use buffers::{
    BatchedBuffers, BufferSet, InstanceBlock, InstanceTransform,
    InstancedBuffers, ShapeBuffers,
};
pub use layout::{BlockLayout, DrawCall, DEFAULT_MAX_INSTANCES_PER_BLOCK};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use spacefill::SpacefillBuffers;
pub use strategy::{
    strategy_for, BatchedStrategy, BufferStrategy, InstancedStrategy,
};

use crate::error::MolmeshError;
use crate::mesh::{CylinderMeshBuilder, SphereMeshBuilder};
use crate::molecule::{ElementTable, MoleculeSource};
use crate::options::{BallAndStickOptions, Options, SpacefillOptions};

/// What a representation draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationKind {
    /// Every atom as a full-size sphere.
    Spacefill,
    /// Bonded atoms as small spheres plus half-cylinder bonds.
    BallAndStick,
}

/// How a representation lays out its buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStrategy {
    /// Geometry transformed per instance into one flat buffer.
    Batched,
    /// Canonical geometry with per-block instance streams.
    Instanced,
}

/// The four selectable display modes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MoleculeDisplay {
    /// Spacefill, batched.
    Spacefill,
    /// Ball-and-stick, batched.
    BallAndStick,
    /// Spacefill, instanced.
    SpacefillInstanced,
    /// Ball-and-stick, instanced.
    #[default]
    BallAndStickInstanced,
}

impl MoleculeDisplay {
    /// Every display mode.
    pub const ALL: [Self; 4] = [
        Self::Spacefill,
        Self::BallAndStick,
        Self::SpacefillInstanced,
        Self::BallAndStickInstanced,
    ];

    /// Display mode for a kind/strategy pair.
    #[must_use]
    pub fn new(kind: RepresentationKind, strategy: RenderStrategy) -> Self {
        match (kind, strategy) {
            (RepresentationKind::Spacefill, RenderStrategy::Batched) => {
                Self::Spacefill
            }
            (RepresentationKind::BallAndStick, RenderStrategy::Batched) => {
                Self::BallAndStick
            }
            (RepresentationKind::Spacefill, RenderStrategy::Instanced) => {
                Self::SpacefillInstanced
            }
            (RepresentationKind::BallAndStick, RenderStrategy::Instanced) => {
                Self::BallAndStickInstanced
            }
        }
    }

    /// What this mode draws.
    #[must_use]
    pub fn kind(self) -> RepresentationKind {
        match self {
            Self::Spacefill | Self::SpacefillInstanced => {
                RepresentationKind::Spacefill
            }
            Self::BallAndStick | Self::BallAndStickInstanced => {
                RepresentationKind::BallAndStick
            }
        }
    }

    /// How this mode lays out buffers.
    #[must_use]
    pub fn strategy(self) -> RenderStrategy {
        match self {
            Self::Spacefill | Self::BallAndStick => RenderStrategy::Batched,
            Self::SpacefillInstanced | Self::BallAndStickInstanced => {
                RenderStrategy::Instanced
            }
        }
    }
}

impl fmt::Display for MoleculeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Spacefill => "spacefill",
            Self::BallAndStick => "ball-and-stick",
            Self::SpacefillInstanced => "spacefill (instanced)",
            Self::BallAndStickInstanced => "ball-and-stick (instanced)",
        };
        f.write_str(label)
    }
}

/// Buffer sets of one representation.
#[derive(Debug, Clone, PartialEq)]
pub enum RepresentationBuffers {
    /// One sphere set.
    Spacefill(SpacefillBuffers),
    /// Sphere set plus one set per bond half.
    BallAndStick(BallAndStickBuffers),
}

/// An immutable, fully built representation of one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    display: MoleculeDisplay,
    buffers: RepresentationBuffers,
    report: BuildReport,
}

impl Representation {
    /// Display mode this was built for.
    #[must_use]
    pub fn display(&self) -> MoleculeDisplay {
        self.display
    }

    /// Kind-specific buffers.
    #[must_use]
    pub fn buffers(&self) -> &RepresentationBuffers {
        &self.buffers
    }

    /// Recoveries made during the build.
    #[must_use]
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Every buffer set in draw order (spheres first).
    #[must_use]
    pub fn buffer_sets(&self) -> Vec<&BufferSet> {
        match &self.buffers {
            RepresentationBuffers::Spacefill(s) => vec![&s.spheres],
            RepresentationBuffers::BallAndStick(b) => {
                vec![&b.spheres, &b.first_halves, &b.second_halves]
            }
        }
    }

    /// Instances across all buffer sets.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.buffer_sets()
            .into_iter()
            .map(BufferSet::instance_count)
            .sum()
    }

    /// Draw calls across all buffer sets.
    #[must_use]
    pub fn draw_call_count(&self) -> usize {
        self.buffer_sets()
            .iter()
            .map(|set| set.geometry.draw_call_count())
            .sum()
    }
}

/// Builds representations from molecules.
///
/// Mesh builders are injected so callers (and tests) pick the tessellation;
/// [`Self::from_options`] derives everything from [`Options`].
#[derive(Debug, Clone)]
pub struct RepresentationBuilder {
    sphere_mesh: SphereMeshBuilder,
    bond_mesh: CylinderMeshBuilder,
    elements: ElementTable,
    spacefill: SpacefillOptions,
    ball_and_stick: BallAndStickOptions,
    max_instances_per_block: NonZeroUsize,
}

impl RepresentationBuilder {
    /// Builder with default sizing and draw-call ceiling.
    #[must_use]
    pub fn new(
        sphere_mesh: SphereMeshBuilder,
        bond_mesh: CylinderMeshBuilder,
        elements: ElementTable,
    ) -> Self {
        Self {
            sphere_mesh,
            bond_mesh,
            elements,
            spacefill: SpacefillOptions::default(),
            ball_and_stick: BallAndStickOptions::default(),
            max_instances_per_block: NonZeroUsize::new(
                DEFAULT_MAX_INSTANCES_PER_BLOCK,
            )
            .unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Builder configured entirely from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::InvalidOptions`] if the options fail
    /// validation or override an unknown element.
    pub fn from_options(options: &Options) -> Result<Self, MolmeshError> {
        options.validate()?;
        let builder = Self::new(
            options.geometry.sphere_mesh(),
            options.geometry.bond_mesh(),
            ElementTable::configured(&options.elements)?,
        )
        .with_spacefill(options.spacefill.clone())
        .with_ball_and_stick(options.ball_and_stick.clone())
        .with_max_instances_per_block(options.geometry.instance_ceiling()?);
        Ok(builder)
    }

    /// Replace spacefill sizing.
    #[must_use]
    pub fn with_spacefill(mut self, spacefill: SpacefillOptions) -> Self {
        self.spacefill = spacefill;
        self
    }

    /// Replace ball-and-stick sizing.
    #[must_use]
    pub fn with_ball_and_stick(
        mut self,
        ball_and_stick: BallAndStickOptions,
    ) -> Self {
        self.ball_and_stick = ball_and_stick;
        self
    }

    /// Replace the instanced draw-call ceiling.
    #[must_use]
    pub fn with_max_instances_per_block(mut self, ceiling: NonZeroUsize) -> Self {
        self.max_instances_per_block = ceiling;
        self
    }

    /// Element table used for radii and colors.
    #[must_use]
    pub fn elements(&self) -> &ElementTable {
        &self.elements
    }

    /// Build `display` for `molecule`.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::MalformedTopology`] if a bond references an
    /// atom outside the molecule. Unknown elements and degenerate geometry
    /// are recovered and counted in [`Representation::report`].
    pub fn build(
        &self,
        display: MoleculeDisplay,
        molecule: &impl MoleculeSource,
    ) -> Result<Representation, MolmeshError> {
        let strategy =
            strategy_for(display.strategy(), self.max_instances_per_block);
        let mut report = BuildReport::default();
        let buffers = match display.kind() {
            RepresentationKind::Spacefill => {
                RepresentationBuffers::Spacefill(spacefill::build(
                    molecule,
                    self.spacefill.atom_radius(),
                    &self.elements,
                    &self.sphere_mesh,
                    strategy.as_ref(),
                    &mut report,
                )?)
            }
            RepresentationKind::BallAndStick => {
                let params = ball_and_stick::BallAndStickParams {
                    atom_radius: self.ball_and_stick.atom_radius(),
                    bond_radius: self.ball_and_stick.bond_radius,
                    sphere_mesh: &self.sphere_mesh,
                    bond_mesh: &self.bond_mesh,
                };
                RepresentationBuffers::BallAndStick(ball_and_stick::build(
                    molecule,
                    &params,
                    &self.elements,
                    strategy.as_ref(),
                    &mut report,
                )?)
            }
        };
        let representation = Representation {
            display,
            buffers,
            report,
        };
        log::debug!(
            "built {display}: {} instances, {} draw calls",
            representation.instance_count(),
            representation.draw_call_count(),
        );
        report.log_summary(&display.to_string());
        Ok(representation)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use glam::{Mat4, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::mesh::{CylinderEnd, MeshBuilder};
    use crate::molecule::{Atom, Bond, Molecule};

    const ELEMENTS: [&str; 6] = ["C", "N", "O", "S", "H", "Zz"];

    fn builder() -> RepresentationBuilder {
        RepresentationBuilder::new(
            SphereMeshBuilder::new(3, 4),
            CylinderMeshBuilder::new(4, None),
            ElementTable::standard(),
        )
    }

    fn random_molecule(rng: &mut StdRng) -> Molecule {
        let atom_count = rng.random_range(0..60);
        let atoms = (0..atom_count)
            .map(|i| {
                let element = ELEMENTS[rng.random_range(0..ELEMENTS.len())];
                let position = Vec3::new(
                    rng.random_range(-10.0..10.0),
                    rng.random_range(-10.0..10.0),
                    rng.random_range(-10.0..10.0),
                );
                Atom::new(i as u32 + 1, element, element).at(position)
            })
            .collect();
        let bond_count = if atom_count == 0 {
            0
        } else {
            rng.random_range(0..atom_count * 2)
        };
        let bonds = (0..bond_count)
            .map(|_| {
                Bond::new(
                    rng.random_range(0..atom_count),
                    rng.random_range(0..atom_count),
                )
            })
            .collect();
        Molecule::new(atoms, bonds)
    }

    /// C, C, O with bonds 0-1 and 1-2.
    fn cco() -> Molecule {
        Molecule::new(
            vec![
                Atom::new(1, "C1", "C").at(Vec3::new(0.0, 0.0, 0.0)),
                Atom::new(2, "C2", "C").at(Vec3::new(1.54, 0.0, 0.0)),
                Atom::new(3, "O1", "O").at(Vec3::new(2.0, 1.3, 0.0)),
            ],
            vec![Bond::new(0, 1), Bond::new(1, 2)],
        )
    }

    fn spheres_of(rep: &Representation) -> &BufferSet {
        match rep.buffers() {
            RepresentationBuffers::Spacefill(s) => &s.spheres,
            RepresentationBuffers::BallAndStick(b) => &b.spheres,
        }
    }

    fn halves_of(rep: &Representation) -> (&BufferSet, &BufferSet) {
        match rep.buffers() {
            RepresentationBuffers::BallAndStick(b) => {
                (&b.first_halves, &b.second_halves)
            }
            RepresentationBuffers::Spacefill(_) => {
                panic!("expected ball-and-stick")
            }
        }
    }

    fn instance_texcoords(set: &BufferSet) -> Vec<[f32; 2]> {
        match &set.geometry {
            ShapeBuffers::Instanced(i) => {
                i.blocks.iter().flat_map(|b| b.texcoords.clone()).collect()
            }
            ShapeBuffers::Batched(b) => b
                .texcoords
                .chunks_exact(b.vertices_per_instance)
                .map(|c| c[0])
                .collect(),
        }
    }

    #[test]
    fn display_decomposes_into_kind_and_strategy() {
        for display in MoleculeDisplay::ALL {
            assert_eq!(
                MoleculeDisplay::new(display.kind(), display.strategy()),
                display
            );
        }
        assert_eq!(MoleculeDisplay::default().to_string(), "ball-and-stick (instanced)");
    }

    #[test]
    fn cco_spacefill_uses_van_der_waals_radii() {
        let table = ElementTable::standard();
        let rep = builder().build(MoleculeDisplay::SpacefillInstanced, &cco()).unwrap();
        let spheres = spheres_of(&rep);
        assert_eq!(spheres.instance_count(), 3);
        let ShapeBuffers::Instanced(inst) = &spheres.geometry else {
            panic!("expected instanced buffers");
        };
        let scales: Vec<f32> = inst.blocks[0]
            .transforms
            .iter()
            .map(|t| t.model[0][0])
            .collect();
        let c = table.lookup("C").unwrap().van_der_waals_radius;
        let o = table.lookup("O").unwrap().van_der_waals_radius;
        assert_eq!(scales, vec![c, c, o]);
        assert!(rep.report().is_clean());
    }

    #[test]
    fn cco_ball_and_stick_colors_halves_by_nearer_atom() {
        let table = ElementTable::standard();
        let carbon = table.lookup("C").unwrap().color;
        let oxygen = table.lookup("O").unwrap().color;
        let rep = builder().build(MoleculeDisplay::BallAndStick, &cco()).unwrap();
        assert_eq!(spheres_of(&rep).instance_count(), 3);
        let (first, second) = halves_of(&rep);
        assert_eq!(first.instance_count() + second.instance_count(), 4);
        assert_eq!(&first.color_atlas.texels()[..2], &[carbon, carbon]);
        assert_eq!(&second.color_atlas.texels()[..2], &[carbon, oxygen]);
        assert_eq!(rep.buffer_sets().len(), 3);
        assert_eq!(rep.draw_call_count(), 3);
    }

    #[test]
    fn ball_and_stick_sphere_radius_is_half_scaled() {
        let rep = builder().build(MoleculeDisplay::BallAndStickInstanced, &cco()).unwrap();
        let ShapeBuffers::Instanced(inst) = &spheres_of(&rep).geometry else {
            panic!("expected instanced buffers");
        };
        let covalent_c = ElementTable::standard().lookup("C").unwrap().covalent_radius;
        assert_eq!(inst.blocks[0].transforms[0].model[0][0], covalent_c * 0.5);
    }

    #[test]
    fn sphere_counts_hold_for_random_molecules() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let builder = builder();
        for _ in 0..40 {
            let molecule = random_molecule(&mut rng);
            let bonded: BTreeSet<usize> = molecule
                .bonds()
                .iter()
                .flat_map(|b| [b.atom1, b.atom2])
                .collect();
            for display in MoleculeDisplay::ALL {
                let rep = builder.build(display, &molecule).unwrap();
                let expected = match display.kind() {
                    RepresentationKind::Spacefill => molecule.atoms().len(),
                    RepresentationKind::BallAndStick => bonded.len(),
                };
                assert_eq!(spheres_of(&rep).instance_count(), expected);
                let uvs = instance_texcoords(spheres_of(&rep));
                let atlas = &spheres_of(&rep).color_atlas;
                for (i, uv) in uvs.iter().enumerate() {
                    let side = atlas.side();
                    assert_eq!(atlas.texel_at(*uv), ColorAtlas::texel_coord(i, side));
                }
            }
        }
    }

    #[test]
    fn bond_halves_share_midpoint_for_random_molecules() {
        let mut rng = StdRng::seed_from_u64(42);
        let builder = builder();
        for _ in 0..20 {
            let molecule = random_molecule(&mut rng);
            let rep = builder.build(MoleculeDisplay::BallAndStickInstanced, &molecule).unwrap();
            let (first, second) = halves_of(&rep);
            let tops = |set: &BufferSet| -> Vec<Vec3> {
                let ShapeBuffers::Instanced(inst) = &set.geometry else {
                    panic!("expected instanced buffers");
                };
                inst.blocks
                    .iter()
                    .flat_map(|b| &b.transforms)
                    .map(|t| {
                        Mat4::from_cols_array_2d(&t.model)
                            .transform_point3(Vec3::Y)
                    })
                    .collect()
            };
            let (a, b) = (tops(first), tops(second));
            assert_eq!(a.len(), molecule.bonds().len());
            for (bond, (ta, tb)) in molecule.bonds().iter().zip(a.iter().zip(&b)) {
                let atoms = molecule.atoms();
                let mid = (atoms[bond.atom1].position() + atoms[bond.atom2].position()) * 0.5;
                assert!((*ta - mid).length() < 1e-4);
                assert!((*tb - mid).length() < 1e-4);
            }
        }
    }

    #[test]
    fn batched_cone_halves_meet_at_midpoint_for_random_molecules() {
        let mut rng = StdRng::seed_from_u64(7);
        let cones = CylinderMeshBuilder::new(5, Some(CylinderEnd::Top));
        let apex: Vec<usize> = cones
            .positions()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.y == 1.0)
            .map(|(i, _)| i)
            .collect();
        assert!(!apex.is_empty());
        let builder = RepresentationBuilder::new(
            SphereMeshBuilder::new(3, 4),
            cones.clone(),
            ElementTable::standard(),
        );
        for _ in 0..20 {
            let molecule = random_molecule(&mut rng);
            let rep = builder.build(MoleculeDisplay::BallAndStick, &molecule).unwrap();
            let (first, second) = halves_of(&rep);
            let baked = |set: &BufferSet| -> Vec<Vec<Vec3>> {
                let ShapeBuffers::Batched(b) = &set.geometry else {
                    panic!("expected batched buffers");
                };
                b.positions
                    .chunks_exact(b.vertices_per_instance)
                    .map(|chunk| apex.iter().map(|&i| Vec3::from(chunk[i])).collect())
                    .collect()
            };
            let (a, b) = (baked(first), baked(second));
            assert_eq!(a.len(), molecule.bonds().len());
            assert_eq!(b.len(), molecule.bonds().len());
            let atoms = molecule.atoms();
            for (bond, (ta, tb)) in molecule.bonds().iter().zip(a.iter().zip(&b)) {
                let mid = (atoms[bond.atom1].position() + atoms[bond.atom2].position()) * 0.5;
                for (pa, pb) in ta.iter().zip(tb) {
                    assert!((*pa - mid).length() < 1e-4);
                    assert!((*pa - *pb).length() < 1e-4);
                }
            }
        }
    }

    #[test]
    fn instanced_blocks_respect_ceiling() {
        let atoms = (0..185)
            .map(|i| Atom::new(i, "C", "C").at(Vec3::new(i as f32, 0.0, 0.0)))
            .collect();
        let molecule = Molecule::new(atoms, Vec::new());
        let rep = builder()
            .with_max_instances_per_block(NonZeroUsize::new(180).unwrap())
            .build(MoleculeDisplay::SpacefillInstanced, &molecule)
            .unwrap();
        let ShapeBuffers::Instanced(inst) = &spheres_of(&rep).geometry else {
            panic!("expected instanced buffers");
        };
        let sizes: Vec<usize> = inst.layout.draw_calls().map(|d| d.instance_count).collect();
        assert_eq!(sizes, vec![180, 5]);
        assert_eq!(spheres_of(&rep).color_atlas.side(), 14);
    }

    #[test]
    fn malformed_topology_aborts_every_mode() {
        let mut molecule = cco();
        molecule.set_bonds(vec![Bond::new(0, 3)]);
        for display in MoleculeDisplay::ALL {
            assert!(matches!(
                builder().build(display, &molecule),
                Err(MolmeshError::MalformedTopology { atom: 3, .. })
            ));
        }
    }

    #[test]
    fn unknown_elements_are_reported_not_fatal() {
        let molecule = Molecule::new(
            vec![
                Atom::new(1, "X1", "Zz"),
                Atom::new(2, "X2", "Zz").at(Vec3::X),
            ],
            vec![Bond::new(0, 1)],
        );
        let rep = builder().build(MoleculeDisplay::BallAndStick, &molecule).unwrap();
        // two spheres plus one lookup per bond half
        assert_eq!(rep.report().fallback_elements, 4);
        assert_eq!(rep.instance_count(), 4);
    }

    #[test]
    fn empty_molecule_builds_empty_sets() {
        for display in MoleculeDisplay::ALL {
            let rep = builder().build(display, &Molecule::default()).unwrap();
            assert_eq!(rep.instance_count(), 0);
            assert_eq!(rep.draw_call_count(), 0);
        }
    }

    #[test]
    fn from_options_applies_geometry() {
        let mut options = Options::default();
        options.geometry.sphere_lat_div = 4;
        options.geometry.sphere_long_div = 5;
        options.geometry.bond_style = crate::options::BondStyle::Cone;
        let builder = RepresentationBuilder::from_options(&options).unwrap();
        assert_eq!(builder.sphere_mesh.vertices_per_instance(), 4 * 5 * 6);
        assert_eq!(builder.bond_mesh.flare(), Some(CylinderEnd::Top));

        options.geometry.max_instances_per_block = 0;
        assert!(RepresentationBuilder::from_options(&options).is_err());
    }
}
