//! wgpu backend shared by the web and native frontends.
//!
//! Draws every scene instance from one sphere mesh with a per-instance model
//! matrix, then the helper lines, into a depth-tested pass.

use glam::Mat4;
use halo_core::{
    uv_sphere, Camera, InstanceRaw, RenderBackend, Scene, SceneError, Viewport, SPHERE_RADIUS,
    SPHERE_SEGMENTS,
};
use wgpu::util::DeviceExt;

mod pipelines;
mod targets;

use pipelines::{create_pipelines, Pipelines};
use targets::DepthTarget;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

pub struct GpuRenderer<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    mesh_vb: wgpu::Buffer,
    mesh_ib: wgpu::Buffer,
    index_count: u32,
    instance_vb: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instance_data: Vec<InstanceRaw>,
    line_vb: Option<wgpu::Buffer>,
    line_count: u32,
    depth: DepthTarget,
    clear_color: wgpu::Color,
}

impl<'w> GpuRenderer<'w> {
    /// Create device, pipelines and mesh buffers for `surface`. `width` and
    /// `height` are the initial physical size.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'w>,
        width: u32,
        height: u32,
        clear_color: [f32; 4],
    ) -> anyhow::Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {e:?}"))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] adapter '{}' format {:?} {}x{}",
            adapter.get_info().name,
            format,
            config.width,
            config.height
        );

        let pipelines = create_pipelines(&device, format);
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bg"),
            layout: &pipelines.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mesh = uv_sphere(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
        let mesh_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_vb"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let mesh_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_ib"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let depth = DepthTarget::new(&device, config.width, config.height);
        let [r, g, b, a] = clear_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            uniform_buffer,
            bind_group,
            mesh_vb,
            mesh_ib,
            index_count: mesh.indices.len() as u32,
            instance_vb: None,
            instance_capacity: 0,
            instance_data: Vec::new(),
            line_vb: None,
            line_count: 0,
            depth,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn configure(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthTarget::new(&self.device, self.config.width, self.config.height);
    }

    /// Upload per-instance matrices, growing the buffer when the scene has
    /// more instances than it was sized for.
    fn upload_instances(&mut self, scene: &Scene) {
        scene.write_instance_data(&mut self.instance_data);
        let needed = self.instance_data.len().max(1);
        if self.instance_vb.is_none() || needed > self.instance_capacity {
            self.instance_vb = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("instance_vb"),
                size: (std::mem::size_of::<InstanceRaw>() * needed) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.instance_capacity = needed;
        }
        if let Some(vb) = &self.instance_vb {
            self.queue
                .write_buffer(vb, 0, bytemuck::cast_slice(&self.instance_data));
        }
    }

    /// Helpers never animate, so their vertices are uploaded once.
    fn upload_lines(&mut self, scene: &Scene) {
        if self.line_vb.is_some() || scene.helpers().is_empty() {
            return;
        }
        let lines = scene.helper_lines();
        self.line_vb = Some(
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("helper_lines_vb"),
                    contents: bytemuck::cast_slice(&lines),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
        );
        self.line_count = lines.len() as u32;
    }
}

impl RenderBackend for GpuRenderer<'_> {
    fn resize(&mut self, width: u32, height: u32, pixel_scale: f32) {
        let (w, h) = Viewport {
            width,
            height,
            pixel_scale,
        }
        .physical_size();
        if (w, h) == self.size() {
            return;
        }
        self.configure(w, h);
        log::debug!("[gpu] surface {}x{}", w, h);
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> halo_core::Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Stale surface; skip this frame and draw on the next tick.
                log::warn!("[gpu] surface lost, reconfiguring");
                let (w, h) = self.size();
                self.configure(w, h);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("[gpu] surface timeout");
                return Ok(());
            }
            Err(e) => return Err(SceneError::Backend(e.to_string())),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let view_proj: Mat4 = camera.view_projection();
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );
        self.upload_instances(scene);
        self.upload_lines(scene);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);

            if let (Some(instances), false) = (&self.instance_vb, scene.is_empty()) {
                rpass.set_pipeline(&self.pipelines.spheres);
                rpass.set_vertex_buffer(0, self.mesh_vb.slice(..));
                rpass.set_vertex_buffer(1, instances.slice(..));
                rpass.set_index_buffer(self.mesh_ib.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..self.index_count, 0, 0..scene.len() as u32);
            }
            if let Some(lines) = &self.line_vb {
                rpass.set_pipeline(&self.pipelines.lines);
                rpass.set_vertex_buffer(0, lines.slice(..));
                rpass.draw(0..self.line_count, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
