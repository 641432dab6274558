//! Color atlas texture upload.

use wgpu::util::DeviceExt;

use crate::color::Rgba8;
use crate::representation::ColorAtlas;

/// Bind group layout for one atlas: texture at binding 0, nearest sampler
/// at binding 1, visible to the fragment stage.
#[must_use]
pub fn atlas_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Color Atlas Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float {
                        filterable: false,
                    },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(
                    wgpu::SamplerBindingType::NonFiltering,
                ),
                count: None,
            },
        ],
    })
}

/// An uploaded color atlas with its nearest-filtering sampler and bind
/// group.
///
/// Empty atlases upload as a single transparent texel so the bind group
/// is always valid.
pub struct AtlasTexture {
    /// The underlying `Rgba8Unorm` texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Nearest, clamp-to-edge sampler.
    pub sampler: wgpu::Sampler,
    /// Bind group for [`atlas_bind_group_layout`].
    pub bind_group: wgpu::BindGroup,
}

impl AtlasTexture {
    /// Upload `atlas`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        atlas: &ColorAtlas,
        label: &str,
    ) -> Self {
        let (side, texels) = padded_texels(atlas);
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: side,
                    height: side,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            bytemuck::cast_slice(texels),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });
        Self {
            texture,
            view,
            sampler,
            bind_group,
        }
    }
}

const EMPTY_ATLAS: [Rgba8; 1] = [Rgba8::TRANSPARENT];

/// Side length and texels to upload; an empty atlas becomes 1×1.
fn padded_texels(atlas: &ColorAtlas) -> (u32, &[Rgba8]) {
    if atlas.side() == 0 {
        (1, &EMPTY_ATLAS)
    } else {
        (atlas.side() as u32, atlas.texels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_atlas_uploads_one_texel() {
        let empty = ColorAtlas::default();
        let (side, texels) = padded_texels(&empty);
        assert_eq!(side, 1);
        assert_eq!(bytemuck::cast_slice::<Rgba8, u8>(texels), &[0, 0, 0, 0]);
    }

    #[test]
    fn texel_bytes_are_tightly_packed() {
        let atlas = ColorAtlas::pack(&[Rgba8::opaque(1, 2, 3); 5]);
        let (side, texels) = padded_texels(&atlas);
        assert_eq!(side, 3);
        let bytes: &[u8] = bytemuck::cast_slice(texels);
        assert_eq!(bytes.len(), 3 * 3 * 4);
        assert_eq!(&bytes[..4], &[1, 2, 3, 255]);
    }
}
