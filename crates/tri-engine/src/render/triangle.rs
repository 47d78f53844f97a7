use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::math::Mat4;
use crate::paint::Color;
use crate::render::shader::{self, ShaderError, ShaderStage};
use crate::render::{RenderCtx, RenderTarget};

const SHADER_LABEL: &str = "tri triangle shader";
const SHADER_SRC: &str = include_str!("shaders/triangle.wgsl");
const ENTRY_POINTS: [(&str, ShaderStage); 2] = [
    ("vs_main", ShaderStage::Vertex),
    ("fs_main", ShaderStage::Fragment),
];

/// The three matrices uploaded each frame, in shader declaration order.
///
/// Matches the WGSL `Transforms` block: three column-major `mat4x4<f32>`,
/// 192 bytes with no padding.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Transforms {
    pub proj: Mat4,
    pub view: Mat4,
    pub model: Mat4,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FillUniform {
    color: [f32; 4],
}

impl From<Color> for FillUniform {
    fn from(c: Color) -> Self {
        Self { color: c.to_array() }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TriangleVertex {
    pos: [f32; 3],
}

impl TriangleVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TriangleVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const TRIANGLE_VERTICES: [TriangleVertex; 3] = [
    TriangleVertex { pos: [-0.5, -0.5, 0.0] },
    TriangleVertex { pos: [0.5, -0.5, 0.0] },
    TriangleVertex { pos: [0.0, 0.5, 0.0] },
];

/// Draws one solid triangle transformed by `proj * view * model`.
///
/// GPU objects are created on the first `render` call and the pipeline is
/// rebuilt if the surface format changes.
pub struct TriangleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    transforms_ubo: Option<wgpu::Buffer>,
    fill_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,

    fill: Color,
}

impl TriangleRenderer {
    pub fn new(fill: Color) -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            transforms_ubo: None,
            fill_ubo: None,
            vbo: None,
            fill,
        }
    }

    /// Uploads `transforms` and draws the triangle over the existing target contents.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        transforms: &Transforms,
    ) -> Result<(), ShaderError> {
        self.ensure_pipeline(ctx)?;
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        self.write_transforms(ctx, transforms);

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(()) };
        let Some(bind_group) = self.bind_group.as_ref() else { return Ok(()) };
        let Some(vbo) = self.vbo.as_ref() else { return Ok(()) };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tri triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..TRIANGLE_VERTICES.len() as u32, 0..1);

        Ok(())
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), ShaderError> {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return Ok(());
        }

        let shader = shader::create_checked_module(ctx.device, SHADER_LABEL, SHADER_SRC, &ENTRY_POINTS)?;

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("tri triangle bgl"),
                    entries: &[
                        uniform_entry(0, wgpu::ShaderStages::VERTEX, size_of_nonzero::<Transforms>()),
                        uniform_entry(1, wgpu::ShaderStages::FRAGMENT, size_of_nonzero::<FillUniform>()),
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("tri triangle pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tri triangle pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[TriangleVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Both faces are visible while the triangle spins.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("triangle pipeline built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        // The bind group belongs to the old layout.
        self.bind_group = None;

        Ok(())
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let transforms_ubo = self.transforms_ubo.get_or_insert_with(|| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("tri transforms ubo"),
                size: std::mem::size_of::<Transforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        // The fill never changes, so it is written once at creation.
        let fill = FillUniform::from(self.fill);
        let fill_ubo = self.fill_ubo.get_or_insert_with(|| {
            ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tri fill ubo"),
                contents: bytemuck::bytes_of(&fill),
                usage: wgpu::BufferUsages::UNIFORM,
            })
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tri triangle bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transforms_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: fill_ubo.as_entire_binding(),
                },
            ],
        });

        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.vbo.is_some() {
            return;
        }

        self.vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tri triangle vbo"),
            contents: bytemuck::cast_slice(&TRIANGLE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    fn write_transforms(&self, ctx: &RenderCtx<'_>, transforms: &Transforms) {
        if let Some(ubo) = self.transforms_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(transforms));
        }
    }
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    min_binding_size: std::num::NonZeroU64,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(min_binding_size),
        },
        count: None,
    }
}

/// Size of a uniform type as a binding size.
///
/// Uniform types here are fixed-size structs, so `size_of::<T>()` is never 0;
/// the fallback only exists to avoid a panic path.
fn size_of_nonzero<T>() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64).unwrap_or(std::num::NonZeroU64::MIN)
}
