//! Application loop.
//!
//! [`App`] drives the [`Viewer`] from winit's event loop. Work that finishes
//! asynchronously (GPU setup on the web, the model load, screenshots on the
//! web) reports back through [`ViewerEvent`]s sent with the event loop proxy.
//!
//! Each frame:
//! 1. expire the error banner
//! 2. [`Viewer::tick`]: rotate the model, step the orbit controller, hit test
//! 3. paint and request the next frame

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::ViewerConfig,
    context::Context,
    controls::Action,
    data_structures::model::Model,
    error::LoadError,
    interaction::InteractionEvent,
    pipelines::light::LightUniform,
    resources::{self, LoadProgress},
    screenshot,
    viewer::Viewer,
};

pub enum ViewerEvent {
    #[cfg(target_arch = "wasm32")]
    Initialized(anyhow::Result<Context>),
    LoadProgress(LoadProgress),
    ModelLoaded(Result<Model, LoadError>),
    Action(Action),
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<ViewerEvent>,
    ctx: Option<Context>,
    viewer: Viewer,
    load_started: bool,
}

impl App {
    pub fn new(event_loop: &EventLoop<ViewerEvent>, config: ViewerConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            ctx: None,
            viewer: Viewer::new(config, 1, 1),
            load_started: false,
        })
    }

    fn on_context_ready(&mut self, mut ctx: Context) {
        let size = ctx.window.inner_size();
        if self.viewer.resize(size.width, size.height) {
            ctx.resize(size.width, size.height);
        }
        if let Some(model) = self.viewer.scene.model() {
            ctx.upload_model(model);
        }
        ctx.window.request_redraw();
        self.ctx = Some(ctx);
    }

    /// Start the one model load of this session.
    fn start_loading(&mut self) {
        if self.load_started {
            return;
        }
        self.load_started = true;

        let file_name = self.viewer.config.model_file.clone();
        let default_color = self.viewer.config.default_mesh_color;
        let proxy = self.proxy.clone();
        log::info!("Loading {}", file_name);

        let load = move || async move {
            let progress_proxy = proxy.clone();
            let result = resources::load_model_obj(&file_name, default_color, move |progress| {
                let _ = progress_proxy.send_event(ViewerEvent::LoadProgress(progress));
            })
            .await;
            if proxy.send_event(ViewerEvent::ModelLoaded(result)).is_err() {
                log::warn!("Event loop closed before the model finished loading");
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            // Keep the event loop responsive while a large file is read and parsed.
            let handle = self.async_runtime.handle().clone();
            self.async_runtime
                .spawn_blocking(move || handle.block_on(load()));
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(load());
    }

    fn on_model_loaded(&mut self, result: Result<Model, LoadError>) {
        #[cfg(target_arch = "wasm32")]
        let message = result.as_ref().err().map(LoadError::banner_message);

        if self.viewer.on_model_loaded(result) {
            if let (Some(ctx), Some(model)) = (&mut self.ctx, self.viewer.scene.model()) {
                ctx.upload_model(model);
            }
        }

        #[cfg(target_arch = "wasm32")]
        if let Some(message) = message {
            let duration_ms = self.viewer.banner.duration().as_millis() as i32;
            if let Err(e) = crate::web::show_banner(&message, duration_ms) {
                log::error!("Cannot show the error banner: {:?}", e);
            }
        }
    }

    fn perform(&mut self, action: Action) {
        log::debug!("{:?}", action);
        match action {
            Action::Screenshot => self.screenshot(),
            other => self.viewer.perform(other),
        }
    }

    fn screenshot(&mut self) {
        let Some(ctx) = &mut self.ctx else {
            log::warn!("Screenshot requested before the renderer is ready");
            return;
        };
        let capture = ctx.capture(&self.viewer);
        let device = ctx.device.clone();
        let file_name = self.viewer.config.screenshot_file_name.clone();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let saved = self
                .async_runtime
                .block_on(capture.read(&device))
                .and_then(|image| screenshot::encode_png(&image))
                .and_then(|png| screenshot::save(&png, &file_name));
            match saved {
                Ok(path) => log::info!("Screenshot saved to {}", path.display()),
                Err(e) => log::error!("Screenshot failed: {:#}", e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let png = capture
                .read(&device)
                .await
                .and_then(|image| screenshot::encode_png(&image));
            match png {
                Ok(png) => {
                    if let Err(e) = crate::web::download_png(&png, &file_name) {
                        log::error!("Screenshot download failed: {:?}", e);
                    }
                }
                Err(e) => log::error!("Screenshot failed: {:#}", e),
            }
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.viewer.resize(width, height) {
            if let Some(ctx) = &mut self.ctx {
                ctx.resize(width, height);
            }
        }
    }

    fn redraw(&mut self) {
        if self.viewer.banner.expire(Instant::now()) {
            log::debug!("Error banner expired");
        }
        for event in self.viewer.tick() {
            match event {
                InteractionEvent::Click { mesh, distance } => {
                    log::info!("Model clicked! (mesh {}, distance {:.2})", mesh, distance)
                }
                InteractionEvent::PointerOver { mesh } => log::trace!("Pointer over mesh {}", mesh),
                InteractionEvent::PointerOut { mesh } => log::trace!("Pointer left mesh {}", mesh),
            }
        }

        let Some(ctx) = &mut self.ctx else {
            return;
        };
        match ctx.paint(&self.viewer) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = ctx.window.inner_size();
                ctx.resize(size.width, size.height);
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
        ctx.window.request_redraw();
    }
}

impl ApplicationHandler<ViewerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() {
            return;
        }
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("OBJ Viewer");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            match crate::web::mount(&self.viewer.config, &self.proxy) {
                Ok(canvas) => window_attributes = window_attributes.with_canvas(Some(canvas)),
                Err(e) => log::error!("Cannot build the page: {:?}", e),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.start_loading();

        let init_future = Context::new(
            window,
            LightUniform::from_scene(&self.viewer.scene),
            self.viewer.config.clear_colour,
        );

        #[cfg(not(target_arch = "wasm32"))]
        match self.async_runtime.block_on(init_future) {
            Ok(ctx) => self.on_context_ready(ctx),
            Err(e) => {
                log::error!("App initialization failed: {:#}", e);
                event_loop.exit();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let ctx = init_future.await;
                if proxy.send_event(ViewerEvent::Initialized(ctx)).is_err() {
                    log::error!("Event loop closed during initialization");
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            #[cfg(target_arch = "wasm32")]
            ViewerEvent::Initialized(ctx) => match ctx {
                Ok(ctx) => self.on_context_ready(ctx),
                Err(e) => log::error!("App initialization failed: {:#}", e),
            },
            ViewerEvent::LoadProgress(progress) => match progress.percent() {
                Some(percent) => log::info!("{:.0}% loaded", percent),
                None => log::info!("{} bytes loaded", progress.loaded),
            },
            ViewerEvent::ModelLoaded(result) => self.on_model_loaded(result),
            ViewerEvent::Action(action) => self.perform(action),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let viewer = &mut self.viewer;
        viewer.controller.handle_window_events(
            &event,
            &viewer.camera,
            &viewer.projection,
            viewer.viewport.height,
        );
        viewer.interaction.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(action) = Action::from_key(&logical_key) {
                    self.perform(action);
                }
            }
            _ => {}
        }
    }
}

/// Set up logging, create the event loop and run the viewer until the window closes.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn"),
        )
        .try_init()
        {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info)?;
    }

    let event_loop: EventLoop<ViewerEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
