use std::f32::consts::TAU;

use wgpu::util::DeviceExt;

use crate::{
    color::Color,
    surface::{Circle, Fill, FrameScheduler, Rect, Shadow, Surface},
};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x2,
        },
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x4,
        },
    ];

    fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// How strong a glow is where it meets the shape it surrounds.
const GLOW_STRENGTH: f32 = 0.5;

/// CPU side of the canvas: turns draw calls into a triangle list in clip space.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    width: f32,
    height: f32,
    linear: bool,
}

impl Mesh {
    /// `linear` converts colours to linear light for sRGB render targets.
    pub fn new(width: f32, height: f32, linear: bool) -> Self {
        Self {
            vertices: Vec::new(),
            width,
            height,
            linear,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn to_clip(&self, [x, y]: [f32; 2]) -> [f32; 2] {
        [
            x / self.width.max(1.0) * 2.0 - 1.0,
            1.0 - y / self.height.max(1.0) * 2.0,
        ]
    }

    fn push(&mut self, point: [f32; 2], color: Color) {
        let color = if self.linear { color.to_linear() } else { color };
        self.vertices.push(Vertex {
            position: self.to_clip(point),
            color: [color.r, color.g, color.b, color.a],
        });
    }

    fn triangle(&mut self, corners: [([f32; 2], Color); 3]) {
        for (point, color) in corners {
            self.push(point, color);
        }
    }

    fn segments(radius: f32) -> usize {
        ((radius * 2.0).ceil() as usize).clamp(12, 48)
    }

    fn disc(&mut self, center: [f32; 2], radius: f32, color: Color) {
        let segments = Self::segments(radius);
        for i in 0..segments {
            let a = rim(center, radius, i, segments);
            let b = rim(center, radius, i + 1, segments);
            self.triangle([(center, color), (a, color), (b, color)]);
        }
    }

    /// Band between `inner` and `outer` fading from `color` to fully transparent.
    fn halo(&mut self, center: [f32; 2], inner: f32, outer: f32, color: Color) {
        let faded = color.with_alpha(0.0);
        let segments = Self::segments(outer);
        for i in 0..segments {
            let a = rim(center, inner, i, segments);
            let b = rim(center, inner, i + 1, segments);
            let c = rim(center, outer, i, segments);
            let d = rim(center, outer, i + 1, segments);
            self.triangle([(a, color), (c, faded), (d, faded)]);
            self.triangle([(a, color), (d, faded), (b, color)]);
        }
    }
}

fn rim(center: [f32; 2], radius: f32, i: usize, segments: usize) -> [f32; 2] {
    let angle = TAU * i as f32 / segments as f32;
    [
        center[0] + radius * angle.cos(),
        center[1] + radius * angle.sin(),
    ]
}

impl Surface for Mesh {
    fn clear(&mut self, _region: Rect) {
        self.vertices.clear();
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        let corners = [
            [rect.x, rect.y],
            [rect.x + rect.width, rect.y],
            [rect.x + rect.width, rect.y + rect.height],
            [rect.x, rect.y + rect.height],
        ];
        let [a, b, c, d] = corners.map(|corner| (corner, fill.color_at(corner)));
        self.triangle([a, b, c]);
        self.triangle([a, c, d]);
    }

    fn fill_circle(&mut self, circle: Circle, color: Color, shadow: Shadow) {
        let center = [circle.x, circle.y];
        let glow = shadow.color.with_alpha(shadow.color.a * color.a * GLOW_STRENGTH);
        if shadow.blur > 0.0 && glow.a > 0.0 {
            self.disc(center, circle.radius, glow);
            self.halo(center, circle.radius, circle.radius + shadow.blur, glow);
        }
        if circle.radius > 0.0 {
            self.disc(center, circle.radius, color);
        }
    }

    fn fill_polygon(&mut self, points: &[[f32; 2]], color: Color) {
        if let Some((&first, rest)) = points.split_first() {
            for pair in rest.windows(2) {
                self.triangle([(first, color), (pair[0], color), (pair[1], color)]);
            }
        }
    }
}

/// GPU canvas the sky paints into. Geometry is rebuilt every frame and drawn
/// in a single pass.
pub struct SkyCanvas {
    pipeline: wgpu::RenderPipeline,
    mesh: Mesh,
}

impl SkyCanvas {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: f32, height: f32) -> Self {
        let shader = device.create_shader_module(&wgpu::ShaderModuleDescriptor {
            label: Some("Sky shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sky.wgsl").into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sky pipeline layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sky pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                }],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
        });

        let linear = matches!(
            format,
            wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
        );
        Self {
            pipeline,
            mesh: Mesh::new(width, height, linear),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.mesh.resize(width, height);
    }

    pub fn render(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let vertices = self.mesh.vertices();
        let buffer = (!vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sky vertex buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Sky pass"),
            color_attachments: &[wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.0,
                        g: 0.0,
                        b: 0.0,
                        a: 1.0,
                    }),
                    store: true,
                },
            }],
            depth_stencil_attachment: None,
        });
        if let Some(buffer) = &buffer {
            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, buffer.slice(..));
            pass.draw(0..vertices.len() as u32, 0..1);
        }
    }
}

impl Surface for SkyCanvas {
    fn clear(&mut self, region: Rect) {
        self.mesh.clear(region);
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        self.mesh.fill_rect(rect, fill);
    }

    fn fill_circle(&mut self, circle: Circle, color: Color, shadow: Shadow) {
        self.mesh.fill_circle(circle, color, shadow);
    }

    fn fill_polygon(&mut self, points: &[[f32; 2]], color: Color) {
        self.mesh.fill_polygon(points, color);
    }
}

impl FrameScheduler for winit::window::Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}
