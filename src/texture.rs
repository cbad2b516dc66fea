use std::path::Path;

use crate::gpu::GpuContext;

/// Edge length of the generated fallback texture.
const FALLBACK_SIZE: u32 = 64;

/// A GPU texture that can be bound to shaders.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Over-generated rings push UVs past the atlas edge
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// Load an atlas image from disk.
    ///
    /// Rows are flipped so `v = 0` addresses the bottom of the image, the way
    /// the generated texture coordinates expect.
    pub fn from_file(gpu: &GpuContext, path: &Path) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.flipv().to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(gpu, &img, width, height, &path.display().to_string()))
    }

    /// Load an atlas image, or generate a checkerboard in `tint` if it cannot be read.
    pub fn from_file_or_fallback(gpu: &GpuContext, path: &Path, tint: [u8; 3]) -> Self {
        match Self::from_file(gpu, path) {
            Ok(texture) => {
                tracing::debug!(
                    path = %path.display(),
                    width = texture.width,
                    height = texture.height,
                    "loaded texture"
                );
                texture
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "texture unavailable, using fallback: {e}");
                let data = checkerboard(FALLBACK_SIZE, tint);
                Self::from_rgba(gpu, &data, FALLBACK_SIZE, FALLBACK_SIZE, "Fallback Texture")
            }
        }
    }
}

/// An RGBA checkerboard of 8×8 cells alternating `tint` and a darker shade.
fn checkerboard(size: u32, tint: [u8; 3]) -> Vec<u8> {
    let mut data = vec![0u8; (size * size * 4) as usize];

    for y in 0..size {
        for x in 0..size {
            let idx = ((y * size + x) * 4) as usize;
            let dark = ((x / 8) + (y / 8)) % 2 == 1;
            let shade = |c: u8| if dark { c / 2 } else { c };

            data[idx] = shade(tint[0]);
            data[idx + 1] = shade(tint[1]);
            data[idx + 2] = shade(tint[2]);
            data[idx + 3] = 255;
        }
    }

    data
}
