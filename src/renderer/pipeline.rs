//! WebGPU render pipeline setup

use wgpu::util::DeviceExt;

use super::vertex::Vertex;
use crate::sim::Viewport;

/// Map viewport coordinates (origin top-left, y down) to NDC
pub fn viewport_to_ndc(viewport: Viewport, x: f32, y: f32) -> (f32, f32) {
    (
        x / viewport.width() * 2.0 - 1.0,
        1.0 - y / viewport.height() * 2.0,
    )
}

/// Convert a frame from viewport units to clip space
fn to_ndc(vertices: &[Vertex], viewport: Viewport) -> Vec<Vertex> {
    vertices
        .iter()
        .map(|v| {
            let (x, y) = viewport_to_ndc(viewport, v.position[0], v.position[1]);
            Vertex::new(x, y, v.color)
        })
        .collect()
}

/// Colour-only triangle list pipeline for the flat scene
fn flat_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("gate-flap-flat-shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("gate-flap-flat-layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("gate-flap-flat-pipeline"),
        layout: Some(&layout),
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
                format,
                // Game-over shade is translucent
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// GPU handles for drawing the game canvas
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    /// Rebuilt each frame; `None` until the first non-empty frame
    frame_buffer: Option<wgpu::Buffer>,
    frame_vertices: u32,
    /// Surface size in physical pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gate-flap-device"),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("Canvas surface {}x{} ({:?})", width, height, format);

        let pipeline = flat_pipeline(&device, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            frame_buffer: None,
            frame_vertices: 0,
            size: (width, height),
        })
    }

    /// Reconfigure the surface; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame given in viewport units
    pub fn render(
        &mut self,
        vertices: &[Vertex],
        viewport: Viewport,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = to_ndc(vertices, viewport);
        self.frame_vertices = frame.len() as u32;
        if !frame.is_empty() {
            self.frame_buffer = Some(self.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("gate-flap-frame-vertices"),
                    contents: bytemuck::cast_slice(&frame),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            ));
        }

        let output = self.surface.get_current_texture()?;
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("gate-flap-frame-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gate-flap-scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = self.frame_buffer.as_ref().filter(|_| self.frame_vertices > 0) {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..self.frame_vertices, 0..1);
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

    #[test]
    fn test_viewport_corners_to_ndc() {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        assert_eq!(viewport_to_ndc(viewport, 0.0, 0.0), (-1.0, 1.0));
        assert_eq!(viewport_to_ndc(viewport, 800.0, 600.0), (1.0, -1.0));
        assert_eq!(viewport_to_ndc(viewport, 400.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn test_frame_converted_to_ndc_keeps_colors() {
        let viewport = Viewport::new(200.0, 100.0).unwrap();
        let frame = [
            Vertex::new(0.0, 100.0, [1.0, 0.0, 0.0, 1.0]),
            Vertex::new(50.0, 25.0, [0.0, 1.0, 0.0, 0.5]),
        ];
        let ndc = to_ndc(&frame, viewport);
        assert_eq!(ndc[0].position, [-1.0, -1.0]);
        assert_eq!(ndc[1].position, [-0.5, 0.5]);
        assert_eq!(ndc[1].color, frame[1].color);
    }
}
