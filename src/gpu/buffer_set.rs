//! Upload of CPU buffer sets and draw-call recording.
//!
//! The renderer owns the pipeline (built with
//! [`vertex_layouts`](super::vertex::vertex_layouts)) and any camera or
//! lighting bind groups; this module only binds vertex streams and the
//! atlas, then issues one draw for a batched set or one draw per block
//! for an instanced set.

use wgpu::util::DeviceExt;

use super::texture::AtlasTexture;
use crate::representation::{
    BufferSet, InstanceBlock, RenderStrategy, Representation, ShapeBuffers,
};

fn vertex_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    label: &str,
    data: &[T],
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// Instance streams of one block.
struct GpuInstanceBlock {
    transforms: wgpu::Buffer,
    texcoords: wgpu::Buffer,
    instance_count: u32,
}

impl GpuInstanceBlock {
    fn upload(device: &wgpu::Device, label: &str, block: &InstanceBlock) -> Self {
        Self {
            transforms: vertex_buffer(
                device,
                &format!("{label} Transforms"),
                &block.transforms,
            ),
            texcoords: vertex_buffer(
                device,
                &format!("{label} Texcoords"),
                &block.texcoords,
            ),
            instance_count: block.len() as u32,
        }
    }
}

enum GpuGeometry {
    Batched {
        positions: wgpu::Buffer,
        normals: wgpu::Buffer,
        texcoords: wgpu::Buffer,
        vertex_count: u32,
    },
    Instanced {
        positions: wgpu::Buffer,
        normals: wgpu::Buffer,
        vertex_count: u32,
        blocks: Vec<GpuInstanceBlock>,
    },
}

/// A [`BufferSet`] resident on the GPU.
pub struct GpuBufferSet {
    geometry: GpuGeometry,
    atlas: AtlasTexture,
}

impl GpuBufferSet {
    /// Upload `set`. `atlas_layout` comes from
    /// [`atlas_bind_group_layout`](super::texture::atlas_bind_group_layout).
    #[must_use]
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        atlas_layout: &wgpu::BindGroupLayout,
        set: &BufferSet,
        label: &str,
    ) -> Self {
        let geometry = match &set.geometry {
            ShapeBuffers::Batched(b) => GpuGeometry::Batched {
                positions: vertex_buffer(
                    device,
                    &format!("{label} Positions"),
                    &b.positions,
                ),
                normals: vertex_buffer(
                    device,
                    &format!("{label} Normals"),
                    &b.normals,
                ),
                texcoords: vertex_buffer(
                    device,
                    &format!("{label} Texcoords"),
                    &b.texcoords,
                ),
                vertex_count: b.vertex_count() as u32,
            },
            ShapeBuffers::Instanced(i) => GpuGeometry::Instanced {
                positions: vertex_buffer(
                    device,
                    &format!("{label} Positions"),
                    &i.positions,
                ),
                normals: vertex_buffer(
                    device,
                    &format!("{label} Normals"),
                    &i.normals,
                ),
                vertex_count: i.vertex_count() as u32,
                blocks: i
                    .blocks
                    .iter()
                    .enumerate()
                    .map(|(n, block)| {
                        GpuInstanceBlock::upload(
                            device,
                            &format!("{label} Block {n}"),
                            block,
                        )
                    })
                    .collect(),
            },
        };
        let atlas = AtlasTexture::new(
            device,
            queue,
            atlas_layout,
            &set.color_atlas,
            &format!("{label} Atlas"),
        );
        Self { geometry, atlas }
    }

    /// Strategy the set was built with; selects the pipeline layout.
    #[must_use]
    pub fn strategy(&self) -> RenderStrategy {
        match self.geometry {
            GpuGeometry::Batched { .. } => RenderStrategy::Batched,
            GpuGeometry::Instanced { .. } => RenderStrategy::Instanced,
        }
    }

    /// The uploaded atlas.
    #[must_use]
    pub fn atlas(&self) -> &AtlasTexture {
        &self.atlas
    }

    /// Bind streams and atlas, then draw.
    ///
    /// Caller must set the pipeline and its other bind groups first; the
    /// atlas is bound at `atlas_group`.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        atlas_group: u32,
    ) {
        match &self.geometry {
            GpuGeometry::Batched {
                positions,
                normals,
                texcoords,
                vertex_count,
            } => {
                if *vertex_count == 0 {
                    return;
                }
                render_pass.set_bind_group(atlas_group, &self.atlas.bind_group, &[]);
                render_pass.set_vertex_buffer(0, positions.slice(..));
                render_pass.set_vertex_buffer(1, normals.slice(..));
                render_pass.set_vertex_buffer(2, texcoords.slice(..));
                render_pass.draw(0..*vertex_count, 0..1);
            }
            GpuGeometry::Instanced {
                positions,
                normals,
                vertex_count,
                blocks,
            } => {
                if blocks.is_empty() {
                    return;
                }
                render_pass.set_bind_group(atlas_group, &self.atlas.bind_group, &[]);
                render_pass.set_vertex_buffer(0, positions.slice(..));
                render_pass.set_vertex_buffer(1, normals.slice(..));
                for block in blocks {
                    render_pass.set_vertex_buffer(2, block.texcoords.slice(..));
                    render_pass.set_vertex_buffer(3, block.transforms.slice(..));
                    render_pass.draw(0..*vertex_count, 0..block.instance_count);
                }
            }
        }
    }
}

/// Every buffer set of a representation, uploaded.
pub struct GpuRepresentation {
    sets: Vec<GpuBufferSet>,
}

impl GpuRepresentation {
    /// Upload each of `representation`'s buffer sets.
    #[must_use]
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        atlas_layout: &wgpu::BindGroupLayout,
        representation: &Representation,
    ) -> Self {
        let label = representation.display().to_string();
        let sets = representation
            .buffer_sets()
            .into_iter()
            .enumerate()
            .map(|(n, set)| {
                GpuBufferSet::upload(
                    device,
                    queue,
                    atlas_layout,
                    set,
                    &format!("{label} #{n}"),
                )
            })
            .collect();
        log::debug!("uploaded {label}");
        Self { sets }
    }

    /// Uploaded sets in draw order.
    #[must_use]
    pub fn sets(&self) -> &[GpuBufferSet] {
        &self.sets
    }

    /// Draw every set. See [`GpuBufferSet::draw`].
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        atlas_group: u32,
    ) {
        for set in &self.sets {
            set.draw(render_pass, atlas_group);
        }
    }
}
