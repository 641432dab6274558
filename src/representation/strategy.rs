//! Batched vs instanced buffer emission.
//!
//! Both strategies consume the same attribute lists; only the layout of
//! the produced [`BufferSet`] differs.

use std::fmt;
use std::num::NonZeroUsize;

use glam::Vec3;

use super::atlas::ColorAtlas;
use super::attribute::{
    attribute_colors, CylinderMeshAttribute, MeshAttribute,
    SphereMeshAttribute,
};
use super::buffers::{
    BatchedBuffers, BufferSet, InstanceBlock, InstancedBuffers, ShapeBuffers,
};
use super::layout::BlockLayout;
use super::RenderStrategy;
use crate::mesh::{CylinderMeshBuilder, MeshBuilder, SphereMeshBuilder};

/// Turns attribute lists into buffer sets. Selected at runtime from the
/// active [`RenderStrategy`].
pub trait BufferStrategy: fmt::Debug + Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> RenderStrategy;

    /// Buffers for a list of atom spheres.
    fn sphere_buffers(
        &self,
        mesh: &SphereMeshBuilder,
        attributes: &[SphereMeshAttribute],
    ) -> BufferSet;

    /// Buffers for a list of bond half-cylinders.
    fn cylinder_buffers(
        &self,
        mesh: &CylinderMeshBuilder,
        attributes: &[CylinderMeshAttribute],
    ) -> BufferSet;
}

/// Pre-transformed geometry in one flat buffer per attribute list.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchedStrategy;

impl BufferStrategy for BatchedStrategy {
    fn kind(&self) -> RenderStrategy {
        RenderStrategy::Batched
    }

    fn sphere_buffers(
        &self,
        mesh: &SphereMeshBuilder,
        attributes: &[SphereMeshAttribute],
    ) -> BufferSet {
        batched(mesh, attributes)
    }

    fn cylinder_buffers(
        &self,
        mesh: &CylinderMeshBuilder,
        attributes: &[CylinderMeshAttribute],
    ) -> BufferSet {
        batched(mesh, attributes)
    }
}

/// Canonical geometry plus per-block transform/texcoord streams.
#[derive(Debug, Clone, Copy)]
pub struct InstancedStrategy {
    max_instances_per_block: NonZeroUsize,
}

impl InstancedStrategy {
    /// Instanced emission with at most `max_instances_per_block` instances
    /// per draw call.
    #[must_use]
    pub fn new(max_instances_per_block: NonZeroUsize) -> Self {
        Self {
            max_instances_per_block,
        }
    }

    /// Per-draw instance ceiling.
    #[must_use]
    pub fn max_instances_per_block(&self) -> NonZeroUsize {
        self.max_instances_per_block
    }
}

impl BufferStrategy for InstancedStrategy {
    fn kind(&self) -> RenderStrategy {
        RenderStrategy::Instanced
    }

    fn sphere_buffers(
        &self,
        mesh: &SphereMeshBuilder,
        attributes: &[SphereMeshAttribute],
    ) -> BufferSet {
        instanced(mesh, attributes, self.max_instances_per_block)
    }

    fn cylinder_buffers(
        &self,
        mesh: &CylinderMeshBuilder,
        attributes: &[CylinderMeshAttribute],
    ) -> BufferSet {
        instanced(mesh, attributes, self.max_instances_per_block)
    }
}

/// Strategy object for `strategy`.
#[must_use]
pub fn strategy_for(
    strategy: RenderStrategy,
    max_instances_per_block: NonZeroUsize,
) -> Box<dyn BufferStrategy> {
    match strategy {
        RenderStrategy::Batched => Box::new(BatchedStrategy),
        RenderStrategy::Instanced => {
            Box::new(InstancedStrategy::new(max_instances_per_block))
        }
    }
}

fn batched<M: MeshBuilder>(
    mesh: &M,
    attributes: &[MeshAttribute<M::Shape>],
) -> BufferSet {
    let per_instance = mesh.vertices_per_instance();
    let capacity = per_instance * attributes.len();
    let mut positions = Vec::with_capacity(capacity);
    let mut normals = Vec::with_capacity(capacity);
    let mut texcoords = Vec::with_capacity(capacity);
    for attribute in attributes {
        mesh.append_instance(&attribute.shape, &mut positions, &mut normals);
        texcoords.resize(texcoords.len() + per_instance, attribute.texcoord);
    }
    BufferSet {
        geometry: ShapeBuffers::Batched(BatchedBuffers {
            positions,
            normals,
            texcoords,
            vertices_per_instance: per_instance,
            instance_count: attributes.len(),
        }),
        color_atlas: ColorAtlas::pack(&attribute_colors(attributes)),
    }
}

fn instanced<M: MeshBuilder>(
    mesh: &M,
    attributes: &[MeshAttribute<M::Shape>],
    ceiling: NonZeroUsize,
) -> BufferSet {
    let layout = BlockLayout::new(attributes.len(), ceiling);
    let blocks = layout
        .block_ranges()
        .map(|range| {
            let block = &attributes[range];
            InstanceBlock {
                transforms: block
                    .iter()
                    .map(|a| mesh.model_matrix(&a.shape).into())
                    .collect(),
                texcoords: block.iter().map(|a| a.texcoord).collect(),
            }
        })
        .collect();
    BufferSet {
        geometry: ShapeBuffers::Instanced(InstancedBuffers {
            positions: mesh.positions().iter().map(Vec3::to_array).collect(),
            normals: mesh.normals().iter().map(Vec3::to_array).collect(),
            layout,
            blocks,
        }),
        color_atlas: ColorAtlas::pack(&attribute_colors(attributes)),
    }
}
