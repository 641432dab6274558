//! GPU upload of buffer sets.
//!
//! Provides vertex layouts, color atlas textures, and per-set draw
//! recording. Pipelines and shaders belong to the renderer.

/// Buffer-set upload and draw-call recording.
pub mod buffer_set;
/// Color atlas texture, sampler, and bind group.
pub mod texture;
/// Vertex buffer layouts and shader locations.
pub mod vertex;

pub use buffer_set::{GpuBufferSet, GpuRepresentation};
pub use texture::{atlas_bind_group_layout, AtlasTexture};
pub use vertex::vertex_layouts;
