//! Main renderer managing wgpu state and rendering.

use crate::{
    camera::{Camera, CameraUniform},
    mesh::Mesh,
    pipeline::{create_frame_bind_group_layout, create_mesh_pipeline, create_star_pipeline},
    texture::Texture,
    vertex::{InstanceData, StarInstance},
};
use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Upper bound on mesh draws per frame (one instance slot each).
pub const MAX_INSTANCES: u32 = 256;

/// Background clear color: near-black deep space.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.002,
    g: 0.002,
    b: 0.006,
    a: 1.0,
};

/// Light uniform (must match mesh.wgsl Light).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// xyz = position, w = intensity
    pub position: [f32; 4],
    /// rgb = color, w = range
    pub color: [f32; 4],
    /// xyz = direction towards the sun, w = intensity
    pub sun_direction: [f32; 4],
    /// rgb = ambient, w = exposure
    pub ambient: [f32; 4],
}

impl Default for LightUniform {
    fn default() -> Self {
        Self {
            position: [0.0, 3.0, 2.0, 1.0],
            color: [1.0, 1.0, 1.0, 100.0],
            sun_direction: [0.0, 0.0, -1.0, 0.3],
            ambient: [0.04, 0.04, 0.06, 1.0],
        }
    }
}

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    // Pipelines
    mesh_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,

    // Frame uniforms
    frame_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    camera_uniform: CameraUniform,
    light_buffer: wgpu::Buffer,

    depth_texture: Texture,

    /// One slot per mesh draw; each draw writes its own region so
    /// `queue.write_buffer` calls within a frame don't clobber each other.
    instance_buffer: wgpu::Buffer,
    frame_instance_offset: u32,

    star_buffer: Option<wgpu::Buffer>,
    star_count: u32,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

        // Mailbox when available, otherwise whatever vsync mode the platform picks.
        let present_mode = if vsync {
            surface_caps
                .present_modes
                .iter()
                .find(|m| matches!(m, wgpu::PresentMode::Mailbox))
                .copied()
                .unwrap_or(wgpu::PresentMode::AutoVsync)
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[LightUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = create_frame_bind_group_layout(&device);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        let mesh_pipeline = create_mesh_pipeline(&device, &config, &frame_layout);
        let star_pipeline = create_star_pipeline(&device, &config, &frame_layout);

        let depth_texture = Texture::create_depth_texture(&device, &config, "Depth Texture");

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (std::mem::size_of::<InstanceData>() as u64) * MAX_INSTANCES as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!(
            "Renderer ready: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            mesh_pipeline,
            star_pipeline,
            frame_bind_group,
            camera_buffer,
            camera_uniform,
            light_buffer,
            depth_texture,
            instance_buffer,
            frame_instance_offset: 0,
            star_buffer: None,
            star_count: 0,
        })
    }

    /// Handle window resize. Zero-sized (minimized) windows are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(&self.device, &self.config, "Depth Texture");
        }
    }

    /// Update camera uniform.
    pub fn update_camera(&mut self, camera: &Camera) {
        self.camera_uniform
            .update(camera, self.config.width, self.config.height);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Update light uniform.
    pub fn update_light(&mut self, light: &LightUniform) {
        self.queue
            .write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[*light]));
    }

    /// Replace the star cloud. An empty slice disables the star pass.
    pub fn upload_stars(&mut self, stars: &[StarInstance]) {
        if stars.is_empty() {
            self.star_buffer = None;
            self.star_count = 0;
            return;
        }
        self.star_buffer = Some(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Star Buffer"),
            contents: bytemuck::cast_slice(stars),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.star_count = stars.len() as u32;
        log::debug!("Uploaded {} stars", self.star_count);
    }

    /// Begin a new frame. Returns `None` when the surface had to be
    /// reconfigured or timed out; the caller skips that frame.
    pub fn begin_frame(&mut self) -> Result<Option<(wgpu::SurfaceTexture, wgpu::CommandEncoder)>> {
        self.frame_instance_offset = 0;
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(None);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Ok(Some((output, encoder)))
    }

    /// Clear color and depth, then draw the star cloud.
    pub fn render_stars(&mut self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Star Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let Some(star_buffer) = &self.star_buffer else {
            return;
        };
        pass.set_pipeline(&self.star_pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_vertex_buffer(0, star_buffer.slice(..));
        pass.draw(0..6, 0..self.star_count);
    }

    /// Draw lit meshes on top of the existing frame content (no clear).
    pub fn render_meshes(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        draws: &[(&Mesh, InstanceData)],
    ) {
        if draws.is_empty() {
            return;
        }

        let offset = self.frame_instance_offset;
        let remaining = MAX_INSTANCES.saturating_sub(offset) as usize;
        let count = draws.len().min(remaining);
        if count == 0 {
            log::warn!("Instance buffer full, dropping {} draws", draws.len());
            return;
        }
        let instances: Vec<InstanceData> = draws[..count].iter().map(|(_, instance)| *instance).collect();
        let byte_offset = (offset as usize * std::mem::size_of::<InstanceData>()) as u64;
        self.queue
            .write_buffer(&self.instance_buffer, byte_offset, bytemuck::cast_slice(&instances));
        self.frame_instance_offset = offset + count as u32;

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Mesh Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.mesh_pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        for (i, (mesh, _)) in draws[..count].iter().enumerate() {
            let slot = offset + i as u32;
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.num_indices, 0, slot..slot + 1);
        }
    }

    /// End frame and present.
    pub fn end_frame(&self, output: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Get surface dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Access the device for mesh creation.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
}
