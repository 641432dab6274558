//! Representation registry: which representation is active, and the
//! drawables a renderer reads each frame.
//!
//! Representations are immutable and shared as [`Arc`]s. A rebuild
//! constructs the replacement completely before swapping it in, so a
//! renderer still holding the previous `Arc` for an in-flight frame keeps
//! valid buffers, and a failed build leaves the current state untouched.

pub mod processor;

use std::sync::Arc;

pub use processor::{
    PreparedRepresentation, RepresentationProcessor, RepresentationRequest,
};

use crate::error::MolmeshError;
use crate::molecule::{Molecule, MoleculeSource};
use crate::options::Options;
use crate::representation::{
    MoleculeDisplay, Representation, RepresentationBuilder,
};

/// The registry. Holds at most one populated representation.
#[derive(Debug)]
pub struct Scene {
    builder: RepresentationBuilder,
    current: Option<MoleculeDisplay>,
    drawables: Vec<Arc<Representation>>,
    /// Last ticket handed out, to background requests or synchronous swaps.
    issued_ticket: u64,
    /// Background results at or below this ticket are stale.
    installed_ticket: u64,
    /// Monotonically increasing generation; bumped on every swap.
    generation: u64,
    /// Generation that was last consumed by the renderer.
    rendered_generation: u64,
}

impl Scene {
    /// Empty registry that builds with `builder`.
    #[must_use]
    pub fn new(builder: RepresentationBuilder) -> Self {
        Self {
            builder,
            current: None,
            drawables: Vec::new(),
            issued_ticket: 0,
            installed_ticket: 0,
            generation: 0,
            rendered_generation: 0,
        }
    }

    /// Empty registry configured from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`MolmeshError::InvalidOptions`] if the options are invalid.
    pub fn from_options(options: &Options) -> Result<Self, MolmeshError> {
        Ok(Self::new(RepresentationBuilder::from_options(options)?))
    }

    // -- Mutation helpers --

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn issue_ticket(&mut self) -> u64 {
        self.issued_ticket += 1;
        self.issued_ticket
    }

    /// Make every background request issued so far stale.
    fn supersede_pending(&mut self) {
        self.installed_ticket = self.issue_ticket();
    }

    fn swap_in(&mut self, representation: Arc<Representation>) {
        let display = representation.display();
        self.drawables.clear();
        self.drawables.push(representation);
        self.current = Some(display);
        self.invalidate();
    }

    /// Whether the drawables changed since last `mark_rendered()`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Mark current generation as rendered (call after updating renderers).
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }

    /// Generation of the current drawables.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -- Representation management --

    /// Switch to `display` for `molecule`.
    ///
    /// Returns `Ok(false)` without rebuilding when `display` is already
    /// current. Otherwise builds the new representation and swaps it in.
    ///
    /// # Errors
    ///
    /// Returns the build error (e.g. [`MolmeshError::MalformedTopology`]);
    /// the previous representation stays current.
    pub fn set_representation(
        &mut self,
        display: MoleculeDisplay,
        molecule: &impl MoleculeSource,
    ) -> Result<bool, MolmeshError> {
        if self.current == Some(display) {
            return Ok(false);
        }
        log::info!("switching representation to {display}");
        self.build_and_swap(display, molecule)?;
        Ok(true)
    }

    /// Rebuild the current representation for a changed molecule.
    /// Returns `Ok(false)` when no representation is active.
    ///
    /// # Errors
    ///
    /// Returns the build error; the previous representation stays current.
    pub fn rebuild(
        &mut self,
        molecule: &impl MoleculeSource,
    ) -> Result<bool, MolmeshError> {
        let Some(display) = self.current else {
            return Ok(false);
        };
        log::info!(
            "molecule changed ({} atoms, {} bonds); rebuilding {display}",
            molecule.atoms().len(),
            molecule.bonds().len(),
        );
        self.build_and_swap(display, molecule)?;
        Ok(true)
    }

    fn build_and_swap(
        &mut self,
        display: MoleculeDisplay,
        molecule: &impl MoleculeSource,
    ) -> Result<(), MolmeshError> {
        match self.builder.build(display, molecule) {
            Ok(representation) => {
                self.supersede_pending();
                self.swap_in(Arc::new(representation));
                Ok(())
            }
            Err(e) => {
                log::warn!("failed to build {display}: {e}");
                Err(e)
            }
        }
    }

    /// Drop the active representation.
    pub fn reset_representation(&mut self) {
        self.supersede_pending();
        if self.current.take().is_some() || !self.drawables.is_empty() {
            self.drawables.clear();
            self.invalidate();
        }
    }

    /// Queue a background build of `display` on `processor`.
    ///
    /// Returns the request's ticket. Tickets share one sequence with
    /// synchronous swaps, so a result requested before a later
    /// [`Self::set_representation`], [`Self::rebuild`] or
    /// [`Self::reset_representation`] is ignored by [`Self::install`].
    pub fn submit(
        &mut self,
        processor: &RepresentationProcessor,
        display: MoleculeDisplay,
        molecule: Arc<Molecule>,
    ) -> u64 {
        let ticket = self.issue_ticket();
        processor.submit(ticket, display, molecule);
        ticket
    }

    /// Install a result from a [`RepresentationProcessor`].
    ///
    /// Results issued before the last installed result or the last
    /// synchronous swap are ignored (`Ok(false)`).
    ///
    /// # Errors
    ///
    /// Returns the background build error; the previous representation
    /// stays current.
    pub fn install(
        &mut self,
        prepared: PreparedRepresentation,
    ) -> Result<bool, Arc<MolmeshError>> {
        if prepared.ticket <= self.installed_ticket {
            log::debug!("ignoring stale representation {}", prepared.ticket);
            return Ok(false);
        }
        self.installed_ticket = prepared.ticket;
        self.issued_ticket = self.issued_ticket.max(prepared.ticket);
        match prepared.outcome {
            Ok(representation) => {
                log::info!("installing representation {}", prepared.display);
                self.swap_in(representation);
                Ok(true)
            }
            Err(e) => {
                log::warn!("failed to build {}: {e}", prepared.display);
                Err(e)
            }
        }
    }

    // -- Queries --

    /// Active display mode, if any.
    #[must_use]
    pub fn current(&self) -> Option<MoleculeDisplay> {
        self.current
    }

    /// The active representation, if any.
    #[must_use]
    pub fn representation(&self) -> Option<&Arc<Representation>> {
        self.drawables.first()
    }

    /// Drawable container (zero or one representation).
    #[must_use]
    pub fn drawables(&self) -> &[Arc<Representation>] {
        &self.drawables
    }

    /// Builder used for synchronous builds.
    #[must_use]
    pub fn builder(&self) -> &RepresentationBuilder {
        &self.builder
    }
}
