use std::{iter, sync::Arc};

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{CameraResources, CameraUniform},
    data_structures::{model::Model, texture::Texture},
    pipelines::{
        Pipelines,
        light::{LightResources, LightUniform},
    },
    render::encode_scene,
    resources::gpu::GpuModel,
    screenshot::PendingCapture,
    viewer::Viewer,
};

/// Everything that lives on the GPU: surface, device, uniforms, pipelines and
/// the uploaded model.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    pub gpu_model: Option<GpuModel>,
    is_surface_configured: bool,
}

impl Context {
    pub async fn new(
        window: Arc<Window>,
        light_uniform: LightUniform,
        clear_colour: wgpu::Color,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("Cannot open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shader writes linear colours and relies on an Srgb surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface reports no supported formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                label: Some("camera_bind_group_layout"),
            });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        let camera = CameraResources {
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");
        let light = LightResources::new(&device, light_uniform);
        let pipelines = Pipelines::new(
            &device,
            config.format,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            light,
            pipelines,
            clear_colour,
            gpu_model: None,
            is_surface_configured: false,
        })
    }

    /// Reconfigure the surface. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.is_surface_configured = true;
            self.depth_texture =
                Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        }
    }

    /// Create GPU buffers for `model`, destroying those of the previous model.
    pub fn upload_model(&mut self, model: &Model) {
        let gpu_model = GpuModel::new(&self.device, model, &self.pipelines.mesh_bind_group_layout);
        if let Some(previous) = self.gpu_model.replace(gpu_model) {
            previous.destroy();
        }
    }

    /// Write camera, light and mesh uniforms for the current viewer state.
    fn prepare(&mut self, viewer: &Viewer) {
        self.camera
            .uniform
            .update_view_proj(&viewer.camera, &viewer.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
        self.light.update(&self.queue, &viewer.scene);
        if let (Some(gpu), Some(model)) = (&self.gpu_model, viewer.scene.model()) {
            gpu.write_uniforms(&self.queue, model);
        }
    }

    /// Draw one frame to the window.
    pub fn paint(&mut self, viewer: &Viewer) -> Result<(), wgpu::SurfaceError> {
        if !self.is_surface_configured {
            return Ok(());
        }
        self.prepare(viewer);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        encode_scene(self, &mut encoder, &view, &self.depth_texture.view, &viewer.scene);
        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Render the current view into an offscreen texture and schedule a copy
    /// into a mappable buffer.
    pub fn capture(&mut self, viewer: &Viewer) -> PendingCapture {
        self.prepare(viewer);

        let extent = wgpu::Extent3d {
            width: self.config.width,
            height: self.config.height,
            depth_or_array_layers: 1,
        };
        let target = Texture::create_render_target(
            &self.device,
            extent,
            self.config.format,
            "screenshot_target",
        );
        let depth = Texture::create_depth_texture(
            &self.device,
            [extent.width, extent.height],
            "screenshot_depth",
        );
        let capture = PendingCapture::new(&self.device, extent, self.config.format);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Screenshot Encoder"),
            });
        encode_scene(self, &mut encoder, &target.view, &depth.view, &viewer.scene);
        capture.copy_from(&mut encoder, &target.texture);
        self.queue.submit(iter::once(encoder.finish()));
        capture
    }
}
