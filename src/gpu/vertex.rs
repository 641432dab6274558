//! Vertex buffer layouts for uploaded buffer sets.
//!
//! Each stream lives in its own buffer slot. Shader locations are shared
//! between strategies:
//!
//! | location | stream                | batched step | instanced step |
//! |----------|-----------------------|--------------|----------------|
//! | 0        | position `vec3<f32>`  | vertex       | vertex         |
//! | 1        | normal `vec3<f32>`    | vertex       | vertex         |
//! | 2        | texcoord `vec2<f32>`  | vertex       | instance       |
//! | 3..=6    | model matrix columns  | n/a          | instance       |

use crate::representation::{InstanceTransform, RenderStrategy};

/// Location of the position attribute.
pub const POSITION_LOCATION: u32 = 0;
/// Location of the normal attribute.
pub const NORMAL_LOCATION: u32 = 1;
/// Location of the atlas texcoord attribute.
pub const TEXCOORD_LOCATION: u32 = 2;
/// Location of the first model-matrix column (columns use 3 through 6).
pub const TRANSFORM_LOCATION: u32 = 3;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: POSITION_LOCATION,
}];

const NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: NORMAL_LOCATION,
}];

fn vec3_layout(
    attributes: &'static [wgpu::VertexAttribute],
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

fn texcoord_layout(
    step_mode: wgpu::VertexStepMode,
) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<[f32; 2]>() as wgpu::BufferAddress,
        step_mode,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: TEXCOORD_LOCATION,
        }],
    }
}

const COLUMN_BYTES: wgpu::BufferAddress =
    size_of::<[f32; 4]>() as wgpu::BufferAddress;

const TRANSFORM_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 0,
        shader_location: TRANSFORM_LOCATION,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: COLUMN_BYTES,
        shader_location: TRANSFORM_LOCATION + 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: COLUMN_BYTES * 2,
        shader_location: TRANSFORM_LOCATION + 2,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: COLUMN_BYTES * 3,
        shader_location: TRANSFORM_LOCATION + 3,
    },
];

fn transform_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<InstanceTransform>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &TRANSFORM_ATTRIBUTES,
    }
}

/// Buffer layouts, in slot order, for sets built with `strategy`.
/// Pass these to the pipeline's `VertexState::buffers`.
#[must_use]
pub fn vertex_layouts(
    strategy: RenderStrategy,
) -> Vec<wgpu::VertexBufferLayout<'static>> {
    match strategy {
        RenderStrategy::Batched => vec![
            vec3_layout(&POSITION_ATTRIBUTES),
            vec3_layout(&NORMAL_ATTRIBUTES),
            texcoord_layout(wgpu::VertexStepMode::Vertex),
        ],
        RenderStrategy::Instanced => vec![
            vec3_layout(&POSITION_ATTRIBUTES),
            vec3_layout(&NORMAL_ATTRIBUTES),
            texcoord_layout(wgpu::VertexStepMode::Instance),
            transform_layout(),
        ],
    }
}
