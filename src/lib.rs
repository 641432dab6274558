// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Mesh and buffer generation for molecular visualization.
//!
//! Molmesh turns a molecule (atoms, bonds, elements) into GPU-ready buffer
//! sets for two classic representations, spacefill and ball-and-stick, in
//! either a batched (pre-transformed) or an instanced layout.
//!
//! # Key entry points
//!
//! - [`representation::RepresentationBuilder`] - builds a
//!   [`representation::Representation`] from a [`molecule::Molecule`]
//! - [`scene::Scene`] - registry of the active representation, with
//!   atomic swaps and a generation counter
//! - [`options::Options`] - runtime configuration (tessellation, radii,
//!   element colors)
//! - [`gpu`] - wgpu upload and draw-call recording
//!
//! # Architecture
//!
//! Attribute extractors turn atoms and bonds into per-instance descriptors
//! (shape, color, atlas texcoord). A [`representation::BufferStrategy`]
//! then either bakes transformed mesh copies into flat buffers or emits
//! canonical geometry with per-block instance streams sized to the
//! draw-call ceiling. Builds can run on the caller's thread or on a
//! background [`scene::processor::RepresentationProcessor`] that delivers
//! results through a lock-free triple buffer.

pub mod color;
pub mod error;
pub mod gpu;
pub mod mesh;
pub mod molecule;
pub mod options;
pub mod representation;
pub mod scene;

pub use error::MolmeshError;
