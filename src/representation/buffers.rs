//! CPU-side buffer sets handed to the renderer.

use glam::Mat4;

use super::atlas::ColorAtlas;
use super::layout::BlockLayout;

/// Per-instance model matrix, column-major, as streamed to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    /// Columns of the model matrix.
    pub model: [[f32; 4]; 4],
}

impl From<Mat4> for InstanceTransform {
    fn from(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

/// Geometry duplicated and transformed per instance into flat vertex
/// streams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchedBuffers {
    /// World-space positions.
    pub positions: Vec<[f32; 3]>,
    /// World-space unit normals.
    pub normals: Vec<[f32; 3]>,
    /// Atlas UV per vertex (each instance's UV repeated).
    pub texcoords: Vec<[f32; 2]>,
    /// Vertices emitted per instance.
    pub vertices_per_instance: usize,
    /// Number of instances baked in.
    pub instance_count: usize,
}

impl BatchedBuffers {
    /// Total vertices across all instances.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Transform and texcoord streams for one instanced draw call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceBlock {
    /// Model matrix per instance.
    pub transforms: Vec<InstanceTransform>,
    /// Atlas UV per instance.
    pub texcoords: Vec<[f32; 2]>,
}

impl InstanceBlock {
    /// Instances in this block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the block holds no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// Canonical geometry drawn once per instance, with per-block streams.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancedBuffers {
    /// Canonical unit-geometry positions.
    pub positions: Vec<[f32; 3]>,
    /// Canonical unit-geometry normals.
    pub normals: Vec<[f32; 3]>,
    /// Partition of the instances into blocks.
    pub layout: BlockLayout,
    /// One stream pair per block, in block order.
    pub blocks: Vec<InstanceBlock>,
}

impl InstancedBuffers {
    /// Vertices in the canonical geometry.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Geometry for one attribute list, in either strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeBuffers {
    /// Flat pre-transformed geometry.
    Batched(BatchedBuffers),
    /// Canonical geometry plus per-block instance streams.
    Instanced(InstancedBuffers),
}

impl ShapeBuffers {
    /// Instances represented.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        match self {
            Self::Batched(b) => b.instance_count,
            Self::Instanced(i) => i.layout.total_instances(),
        }
    }

    /// Draw calls needed: one for a non-empty batched set, one per block
    /// for an instanced set.
    #[must_use]
    pub fn draw_call_count(&self) -> usize {
        match self {
            Self::Batched(b) => usize::from(b.instance_count > 0),
            Self::Instanced(i) => i.layout.block_count(),
        }
    }
}

/// Geometry plus the color atlas its texcoords address.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSet {
    /// Vertex and instance streams.
    pub geometry: ShapeBuffers,
    /// One color texel per instance.
    pub color_atlas: ColorAtlas,
}

impl BufferSet {
    /// Instances represented.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.geometry.instance_count()
    }

    /// Whether the set draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instance_count() == 0
    }
}
