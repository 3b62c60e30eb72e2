//! WebGPU render pipeline setup
//!
//! Scene builders emit vertices in field coordinates; this maps them to NDC,
//! letterboxed so the field keeps its aspect ratio on any canvas.

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::vertex::{Vertex, colors};
use crate::error::RenderError;

/// Map a field-space point to NDC. The field is centered and scaled to fit
/// inside the viewport; y is flipped (field y grows downward).
pub fn field_to_ndc(field: Vec2, viewport: (u32, u32), p: Vec2) -> Vec2 {
    let (w, h) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);
    if field.x <= 0.0 || field.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (w / field.x).min(h / field.y);
    // Fraction of each NDC axis the field occupies
    let extent = Vec2::new(field.x * scale / w, field.y * scale / h);
    let unit = p / field * 2.0 - Vec2::ONE;
    Vec2::new(unit.x * extent.x, -unit.y * extent.y)
}

/// Inverse of [`field_to_ndc`] for pointer input: `p` is in viewport pixels
/// (origin top-left). Points in the letterbox bars land outside the field.
pub fn viewport_to_field(field: Vec2, viewport: (f32, f32), p: Vec2) -> Vec2 {
    let (w, h) = (viewport.0.max(1.0), viewport.1.max(1.0));
    if field.x <= 0.0 || field.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (w / field.x).min(h / field.y);
    let offset = (Vec2::new(w, h) - field * scale) / 2.0;
    (p - offset) / scale
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Logical field the current game draws in
    pub field: Vec2,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        field: Vec2,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("fable-dash-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Create shader module
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Create pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
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

        // Create initial vertex buffer (will be updated each frame)
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        log::info!("render pipeline ready ({surface_format:?}, {width}x{height})");
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
            field,
        })
    }

    /// Switch the logical field (a different game was selected)
    pub fn set_field(&mut self, field: Vec2) {
        self.field = field;
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload vertices and render
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        let ndc_vertices: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let p = field_to_ndc(self.field, self.size, Vec2::from(v.position));
                Vertex::new(p.x, p.y, v.color)
            })
            .collect();

        // Recreated every frame; scene sizes vary a lot between games
        if !ndc_vertices.is_empty() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: colors::CLEAR[0] as f64,
                            g: colors::CLEAR[1] as f64,
                            b: colors::CLEAR[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_matching_aspect_fills_viewport() {
        let field = Vec2::new(800.0, 450.0);
        let view = (1600, 900);
        assert!(close(field_to_ndc(field, view, Vec2::ZERO), Vec2::new(-1.0, 1.0)));
        assert!(close(field_to_ndc(field, view, field), Vec2::new(1.0, -1.0)));
        assert!(close(field_to_ndc(field, view, field / 2.0), Vec2::ZERO));
    }

    #[test]
    fn test_wide_viewport_letterboxes_sideways() {
        let field = Vec2::new(800.0, 600.0);
        let p = field_to_ndc(field, (1600, 600), Vec2::new(0.0, 0.0));
        assert!(close(p, Vec2::new(-0.5, 1.0)));
    }

    #[test]
    fn test_tall_viewport_letterboxes_vertically() {
        let field = Vec2::new(352.0, 198.0);
        let p = field_to_ndc(field, (352, 396), Vec2::new(352.0, 198.0));
        assert!(close(p, Vec2::new(1.0, -0.5)));
    }

    #[test]
    fn test_viewport_to_field_undoes_letterbox() {
        let field = Vec2::new(800.0, 600.0);
        // 1600x600 viewport: field drawn 800px wide, 400px bars on each side
        let view = (1600.0, 600.0);
        assert!(close(viewport_to_field(field, view, Vec2::new(400.0, 0.0)), Vec2::ZERO));
        assert!(close(viewport_to_field(field, view, Vec2::new(800.0, 300.0)), field / 2.0));
        assert!(viewport_to_field(field, view, Vec2::new(100.0, 10.0)).x < 0.0);
    }

    #[test]
    fn test_degenerate_field_maps_to_origin() {
        assert_eq!(field_to_ndc(Vec2::ZERO, (100, 100), Vec2::ONE), Vec2::ZERO);
    }
}
