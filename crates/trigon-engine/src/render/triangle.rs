use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::component::Component;
use crate::render::{RenderCtx, RenderTarget};

/// Two overlapping colored triangles forming a quad.
///
/// Geometry is a quad of half-extent 0.2 in clip space, centered at
/// `(offset, 0)`, split along the diagonal into two triangles. One indexed
/// draw call of six indices per frame.
pub struct TrianglePair {
    offset: f32,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
}

impl TrianglePair {
    /// Creates the component; GPU resources are built in `initialize`.
    pub fn new(offset: f32) -> Self {
        Self {
            offset,
            pipeline_format: None,
            pipeline: None,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/triangle.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trigon triangle shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("trigon triangle pipeline layout"),
                    bind_group_layouts: &[],
                    immediate_size: 0,
                });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("trigon triangle pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
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

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // The index pattern winds one triangle each way; draw both.
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

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.vertex_buffer.is_some() && self.index_buffer.is_some() {
            return;
        }

        let vertices = quad_vertices(self.offset);

        self.vertex_buffer = Some(ctx.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("trigon triangle vbo"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));

        self.index_buffer = Some(ctx.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("trigon triangle ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
    }
}

impl Component for TrianglePair {
    fn initialize(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.ensure_pipeline(ctx);
        self.ensure_buffers(ctx);
        log::debug!("triangle pair at offset {} initialized", self.offset);
        Ok(())
    }

    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        // Surface format can change across reconfigures; rebuild lazily.
        if self.pipeline_format != Some(ctx.surface_format) && self.pipeline.is_some() {
            self.ensure_pipeline(ctx);
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(vertex_buffer) = self.vertex_buffer.as_ref() else { return };
        let Some(index_buffer) = self.index_buffer.as_ref() else { return };

        let mut rpass = target
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("trigon triangle pass"),
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
        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    fn destroy_resources(&mut self) {
        self.pipeline = None;
        self.pipeline_format = None;
        self.vertex_buffer = None;
        self.index_buffer = None;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x4, // position (clip space)
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Index pattern splitting the quad into two triangles sharing vertices 0/1.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 1, 0, 3];

/// Quad corners around `(offset, 0)`, each with its fixed color.
pub fn quad_vertices(offset: f32) -> [Vertex; 4] {
    [
        Vertex {
            position: [0.2 + offset, 0.2, 0.2, 1.0],
            color: [1.0, 0.0, 0.0, 1.0], // red
        },
        Vertex {
            position: [-0.2 + offset, -0.2, 0.2, 1.0],
            color: [0.0, 0.0, 1.0, 1.0], // blue
        },
        Vertex {
            position: [0.2 + offset, -0.2, 0.2, 1.0],
            color: [0.0, 1.0, 0.0, 1.0], // green
        },
        Vertex {
            position: [-0.2 + offset, 0.2, 0.2, 1.0],
            color: [1.0, 1.0, 1.0, 1.0], // white
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn quad_vertices_are_offset_on_x_only() {
        let base = quad_vertices(0.0);
        let shifted = quad_vertices(0.5);

        for (b, s) in base.iter().zip(shifted.iter()) {
            assert_eq!(s.position[0], b.position[0] + 0.5);
            assert_eq!(s.position[1], b.position[1]);
            assert_eq!(s.position[2], b.position[2]);
            assert_eq!(s.position[3], 1.0);
            assert_eq!(s.color, b.color);
        }
    }

    #[test]
    fn quad_spans_expected_extent() {
        let v = quad_vertices(-0.5);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();

        let close = |a: f32, b: f32| (a - b).abs() < 1e-6;
        assert!(close(xs.iter().cloned().fold(f32::MAX, f32::min), -0.7));
        assert!(close(xs.iter().cloned().fold(f32::MIN, f32::max), -0.3));
        assert!(close(ys.iter().cloned().fold(f32::MAX, f32::min), -0.2));
        assert!(close(ys.iter().cloned().fold(f32::MIN, f32::max), 0.2));
    }

    // ── indices ───────────────────────────────────────────────────────────

    #[test]
    fn indices_cover_all_four_vertices() {
        let mut seen = [false; 4];
        for &i in &QUAD_INDICES {
            seen[i as usize] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn two_triangles_share_the_diagonal() {
        let (a, b) = (&QUAD_INDICES[..3], &QUAD_INDICES[3..]);
        let shared: Vec<u16> = a.iter().copied().filter(|i| b.contains(i)).collect();
        assert_eq!(shared.len(), 2);
    }

    // ── vertex layout ─────────────────────────────────────────────────────

    #[test]
    fn vertex_stride_matches_two_float4s() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }
}
