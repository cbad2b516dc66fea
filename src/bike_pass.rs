//! Render pass that draws a frame's [`DrawInstruction`]s.
//!
//! # Architecture
//!
//! Both pipeline families share two uniform groups:
//! - **Group 0**: frame uniforms (view, projection, light)
//! - **Group 1**: draw uniforms (world, model-view, normal matrix), one slot
//!   per draw at a dynamic offset so every draw keeps its own matrices
//!
//! Lit pipelines add **group 2**, the atlas texture and sampler of the
//! mesh's [`TextureSlot`]. There is one lit pipeline per primitive topology
//! the generators emit (triangle list and triangle strip) plus an unlit
//! line-list pipeline for the debug axes. Triangle fans have no wgpu
//! topology and are uploaded with `[0, i, i + 1]` indices instead.
//!
//! Culling is disabled: circles and open cylinders are seen from both sides.

use std::num::NonZeroU64;

use crate::camera::Camera;
use crate::config::{LightConfig, TextureConfig};
use crate::gpu::GpuContext;
use crate::mesh::{LineVertex, Mesh, Topology, Vertex3d};
use crate::model::{MeshLibrary, TextureSlot};
use crate::scene::DrawInstruction;
use crate::texture::Texture;

/// Per-frame uniforms (group 0).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// World-space light position, `w` unused.
    pub light_position: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_ambient: [f32; 4],
}

impl FrameUniforms {
    pub fn new(camera: &Camera, aspect: f32, light: &LightConfig) -> Self {
        let extend = |v: [f32; 3]| [v[0], v[1], v[2], 1.0];
        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix(aspect).to_cols_array_2d(),
            light_position: extend(light.position),
            light_diffuse: extend(light.diffuse),
            light_ambient: extend(light.ambient),
        }
    }
}

/// Per-draw uniforms (group 1).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub world: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl DrawUniforms {
    pub fn new(draw: &DrawInstruction, camera: &Camera) -> Self {
        Self {
            world: draw.world.to_cols_array_2d(),
            model_view: draw.model_view(&camera.view_matrix()).to_cols_array_2d(),
            normal_matrix: draw.normal_matrix().to_cols_array_2d(),
        }
    }
}

/// Rounds `size` up to a multiple of `alignment`.
fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// Which pipeline a mesh is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PipelineKind {
    TriangleList,
    TriangleStrip,
    Lines,
}

/// GPU buffers for one library mesh.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    /// Vertices for non-indexed draws, indices otherwise.
    element_count: u32,
    kind: PipelineKind,
    texture: Option<TextureSlot>,
}

impl GpuMesh {
    fn upload(gpu: &GpuContext, name: &str, mesh: &Mesh, texture: Option<TextureSlot>) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_bytes = match mesh.topology() {
            Topology::Lines => bytemuck::cast_slice(&mesh.line_vertices()).to_vec(),
            _ => bytemuck::cast_slice(&mesh.vertices()).to_vec(),
        };
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{name} Vertex Buffer")),
                contents: &vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX,
            });

        let indices = mesh.triangle_list_indices();
        let index_buffer = indices.as_ref().map(|indices| {
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{name} Index Buffer")),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
        });

        let element_count = indices.map_or(mesh.vertex_count(), |i| i.len()) as u32;
        let kind = match mesh.topology() {
            Topology::Lines => PipelineKind::Lines,
            Topology::TriangleStrip => PipelineKind::TriangleStrip,
            Topology::TriangleFan | Topology::IndexedTriangles | Topology::Triangles => {
                PipelineKind::TriangleList
            }
        };

        Self {
            vertex_buffer,
            index_buffer,
            element_count,
            kind,
            texture,
        }
    }
}

/// Draws the bike with depth testing.
pub struct BikePass {
    list_pipeline: wgpu::RenderPipeline,
    strip_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_bind_group_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,
    draw_stride: u64,
    texture_bind_groups: Vec<wgpu::BindGroup>,
    meshes: Vec<GpuMesh>,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    light: LightConfig,
    clear_color: wgpu::Color,
}

impl BikePass {
    /// Uploads every library mesh, loads the atlas textures and builds the pipelines.
    pub fn new(
        gpu: &GpuContext,
        library: &MeshLibrary,
        textures: &TextureConfig,
        light: LightConfig,
        clear_color: [f32; 4],
    ) -> Self {
        let device = &gpu.device;

        let lit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bike Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/bike.wgsl").into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lines.wgsl").into()),
        });

        // Frame uniform buffer (group 0)
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // Draw uniform buffer (group 1), one aligned slot per draw
        let draw_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<DrawUniforms>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let draw_stride = align_to(
            std::mem::size_of::<DrawUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let draw_capacity = 32;
        let (draw_buffer, draw_bind_group) =
            Self::create_draw_buffer(gpu, &draw_bind_group_layout, draw_stride, draw_capacity);

        // Texture bind group layout (group 2)
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let texture_bind_groups = TextureSlot::ALL
            .iter()
            .map(|&slot| {
                let (path, tint) = match slot {
                    TextureSlot::Wheel => (&textures.wheel, [90, 90, 90]),
                    TextureSlot::Metal => (&textures.metal, [170, 170, 180]),
                    TextureSlot::Black => (&textures.black, [20, 20, 20]),
                };
                let texture = Texture::from_file_or_fallback(gpu, path, tint);
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Atlas Bind Group"),
                    layout: &texture_bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&texture.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&texture.sampler),
                        },
                    ],
                })
            })
            .collect();

        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Bike Pipeline Layout"),
            bind_group_layouts: &[
                &frame_bind_group_layout,
                &draw_bind_group_layout,
                &texture_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });
        let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &draw_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = |label: &str,
                        layout: &wgpu::PipelineLayout,
                        shader: &wgpu::ShaderModule,
                        vertex: wgpu::VertexBufferLayout<'static>,
                        topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs"),
                    buffers: &[vertex],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let list_pipeline = pipeline(
            "Bike Triangle List Pipeline",
            &lit_layout,
            &lit_shader,
            Vertex3d::LAYOUT,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let strip_pipeline = pipeline(
            "Bike Triangle Strip Pipeline",
            &lit_layout,
            &lit_shader,
            Vertex3d::LAYOUT,
            wgpu::PrimitiveTopology::TriangleStrip,
        );
        let line_pipeline = pipeline(
            "Axes Pipeline",
            &line_layout,
            &line_shader,
            LineVertex::LAYOUT,
            wgpu::PrimitiveTopology::LineList,
        );

        let meshes = library
            .iter()
            .map(|(_, entry)| GpuMesh::upload(gpu, entry.name, &entry.mesh, entry.texture))
            .collect();

        let depth_view = Self::create_depth_view(gpu);

        Self {
            list_pipeline,
            strip_pipeline,
            line_pipeline,
            frame_buffer,
            frame_bind_group,
            draw_bind_group_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity,
            draw_stride,
            texture_bind_groups,
            meshes,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
            light,
            clear_color: wgpu::Color {
                r: clear_color[0] as f64,
                g: clear_color[1] as f64,
                b: clear_color[2] as f64,
                a: clear_color[3] as f64,
            },
        }
    }

    fn create_draw_buffer(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Grows the draw uniform buffer to hold `draws` slots.
    fn ensure_draw_capacity(&mut self, gpu: &GpuContext, draws: usize) {
        if draws <= self.draw_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        let (buffer, bind_group) =
            Self::create_draw_buffer(gpu, &self.draw_bind_group_layout, self.draw_stride, capacity);
        self.draw_buffer = buffer;
        self.draw_bind_group = bind_group;
        self.draw_capacity = capacity;
        tracing::debug!(capacity, "grew draw uniform buffer");
    }

    /// Clears `target` and draws `draws` in order.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        camera: &Camera,
        draws: &[DrawInstruction],
    ) {
        self.ensure_depth_size(gpu);
        self.ensure_draw_capacity(gpu, draws.len());

        let frame = FrameUniforms::new(camera, gpu.aspect(), &self.light);
        gpu.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame]));

        let stride = self.draw_stride as usize;
        let mut slots = vec![0u8; stride * draws.len()];
        for (slot, draw) in slots.chunks_exact_mut(stride).zip(draws) {
            let uniforms = DrawUniforms::new(draw, camera);
            let bytes = bytemuck::bytes_of(&uniforms);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        if !slots.is_empty() {
            gpu.queue.write_buffer(&self.draw_buffer, 0, &slots);
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Bike Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (i, draw) in draws.iter().enumerate() {
            let Some(mesh) = self.meshes.get(draw.mesh.index()) else {
                tracing::warn!(part = draw.part, "draw references unknown mesh");
                continue;
            };

            let pipeline = match mesh.kind {
                PipelineKind::TriangleList => &self.list_pipeline,
                PipelineKind::TriangleStrip => &self.strip_pipeline,
                PipelineKind::Lines => &self.line_pipeline,
            };
            render_pass.set_pipeline(pipeline);

            let offset = (i as u64 * self.draw_stride) as u32;
            render_pass.set_bind_group(1, &self.draw_bind_group, &[offset]);

            if mesh.kind != PipelineKind::Lines {
                let slot = mesh.texture.unwrap_or(TextureSlot::Metal);
                render_pass.set_bind_group(2, &self.texture_bind_groups[slot.index()], &[]);
            }

            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            match &mesh.index_buffer {
                Some(indices) => {
                    render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.element_count, 0, 0..1);
                }
                None => render_pass.draw(0..mesh.element_count, 0..1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix4;
    use crate::model::MeshId;

    #[test]
    fn uniform_sizes_fit_std140() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 192);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 176);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }

    #[test]
    fn draw_slots_align_to_device_offsets() {
        assert_eq!(align_to(192, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
        assert_eq!(align_to(192, 64), 192);
    }

    #[test]
    fn draw_uniforms_carry_model_view() {
        let camera = Camera::new().at(0.0, -10.0, 0.0).looking_at(0.0, 0.0, 0.0);
        let draw = DrawInstruction {
            mesh: MeshId(0),
            part: "test",
            world: Matrix4::identity().translate(1.0, 0.0, 0.0),
        };
        let uniforms = DrawUniforms::new(&draw, &camera);
        assert_eq!(uniforms.world, draw.world.to_cols_array_2d());

        let expected = camera.view_matrix().multiply(draw.world);
        assert_eq!(uniforms.model_view, expected.to_cols_array_2d());
    }

    #[test]
    fn frame_uniforms_pad_light_vectors() {
        let light = LightConfig::default();
        let frame = FrameUniforms::new(&Camera::new(), 4.0 / 3.0, &light);
        assert_eq!(frame.light_position, [5.0, 5.0, 10.0, 1.0]);
        assert_eq!(frame.light_ambient, [0.0, 0.0, 0.0, 1.0]);
    }
}
