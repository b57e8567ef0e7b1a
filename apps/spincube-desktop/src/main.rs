mod config;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use config::DemoConfig;
use glam::Vec2;
use spincube_input::{Action, InputState, Key};
use spincube_render::ShaderProgramBuilder;
use spincube_render_wgpu::{CubeRenderer, ShaderProgram, WgpuShaderBackend};
use spincube_scene::{FrameClock, FrameTiming, Scene, clock::DEFAULT_FIXED_STEP};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "spincube-desktop", about = "Spinning cube with a first-person camera")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file layered over the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Vertex shader source (WGSL)
    #[arg(long)]
    vertex: Option<PathBuf>,

    /// Fragment shader source (WGSL)
    #[arg(long)]
    fragment: Option<PathBuf>,

    /// Step every frame by a fixed delta in seconds instead of measuring it
    #[arg(long, num_args = 0..=1, default_missing_value = "0.0166667")]
    fixed_step: Option<f32>,

    /// Exit if the shaders cannot be read, compiled or linked
    #[arg(long)]
    strict_shaders: bool,
}

impl Cli {
    fn apply(&self, mut config: DemoConfig) -> DemoConfig {
        if let Some(vertex) = &self.vertex {
            config.shaders.vertex = vertex.clone();
        }
        if let Some(fragment) = &self.fragment {
            config.shaders.fragment = fragment.clone();
        }
        if let Some(step) = self.fixed_step {
            let step = if step > 0.0 { step } else { DEFAULT_FIXED_STEP };
            config.timing = FrameTiming::Fixed(step);
        }
        if self.strict_shaders {
            config.shaders.strict = true;
        }
        config
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::Forward),
        KeyCode::KeyS => Some(Key::Back),
        KeyCode::KeyA => Some(Key::Left),
        KeyCode::KeyD => Some(Key::Right),
        KeyCode::Tab => Some(Key::ToggleLook),
        KeyCode::Escape => Some(Key::Quit),
        _ => None,
    }
}

/// Simulation-side state: scene, input and timing.
struct AppState {
    scene: Scene,
    input: InputState,
    clock: FrameClock,
    look_sensitivity: f32,
    look_captured: bool,
    /// False once the platform refuses to warp the cursor; look input then
    /// comes from raw mouse motion.
    cursor_warp: bool,
}

impl AppState {
    fn new(config: &DemoConfig) -> Self {
        Self {
            scene: Scene::from_config(&config.scene),
            input: InputState::new(),
            clock: FrameClock::new(config.timing),
            look_sensitivity: config.scene.camera.look_sensitivity,
            look_captured: true,
            cursor_warp: true,
        }
    }

    fn update(&mut self) {
        let dt = self.clock.tick();
        let intent = self.input.take_frame_intent(self.look_sensitivity);
        self.scene.advance(intent.movement, intent.spin, dt);
    }
}

/// GPU objects. Field order is drop order: program and renderer go before the
/// device and surface they were created from.
struct Gpu {
    program: ShaderProgram,
    renderer: CubeRenderer,
    config: wgpu::SurfaceConfiguration,
    queue: wgpu::Queue,
    device: wgpu::Device,
    surface: wgpu::Surface<'static>,
}

impl Gpu {
    fn new(window: Arc<Window>, demo: &DemoConfig) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("spincube_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        device.on_uncaptured_error(Box::new(|e| {
            tracing::error!("wgpu uncaptured error: {e}");
        }));

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let builder = ShaderProgramBuilder::new(&demo.shaders.vertex, &demo.shaders.fragment)
            .with_label("cube_program");
        let mut backend = WgpuShaderBackend::new(&device, surface_format);
        let program = if demo.shaders.strict {
            builder
                .build_strict(&mut backend)
                .context("building shader program")?
        } else {
            let build = builder.build(&mut backend);
            for diag in &build.diagnostics {
                tracing::error!("{diag}");
            }
            build.program
        };

        let renderer = CubeRenderer::new(&device, config.width, config.height, demo.clear_color);

        tracing::info!(
            program = program.label(),
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            program,
            renderer,
            config,
            queue,
            device,
            surface,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn render(&mut self, scene: &Scene) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer
            .render(&self.device, &self.queue, &view, &mut self.program, scene);
        output.present();
    }
}

struct App {
    config: DemoConfig,
    state: AppState,
    gpu: Option<Gpu>,
    window: Option<Arc<Window>>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        let state = AppState::new(&config);
        Self {
            config,
            state,
            gpu: None,
            window: None,
        }
    }

    fn window_center(window: &Window) -> Vec2 {
        let size = window.inner_size();
        Vec2::new(size.width as f32 / 2.0, size.height as f32 / 2.0)
    }

    fn warp_to_center(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        if !self.state.cursor_warp {
            return;
        }
        let center = Self::window_center(window);
        let target = PhysicalPosition::new(center.x as f64, center.y as f64);
        if let Err(e) = window.set_cursor_position(target) {
            tracing::warn!("cursor warp unavailable ({e}); using raw mouse motion");
            self.state.cursor_warp = false;
        }
    }

    fn set_look_captured(&mut self, captured: bool) {
        self.state.look_captured = captured;
        let Some(window) = &self.window else {
            return;
        };
        window.set_cursor_visible(!captured);
        let grab = if captured {
            window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = grab {
            tracing::debug!("cursor grab change failed: {e}");
        }
        if captured {
            self.warp_to_center();
        }
    }

    fn handle_action(&mut self, action: Action, event_loop: &ActiveEventLoop) {
        match action {
            Action::ToggleLook => {
                let captured = !self.state.look_captured;
                self.set_look_captured(captured);
                tracing::debug!(captured, "mouse look toggled");
            }
            Action::Quit => event_loop.exit(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match Gpu::new(window.clone(), &self.config) {
            Ok(gpu) => {
                self.state
                    .scene
                    .camera
                    .projection
                    .set_viewport(gpu.config.width, gpu.config.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
        self.set_look_captured(true);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                    self.state
                        .scene
                        .camera
                        .projection
                        .set_viewport(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.input.clear();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    let pressed = key_state == ElementState::Pressed;
                    if let Some(action) = self.state.input.set_key(key, pressed) {
                        self.handle_action(action, event_loop);
                    }
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } if !self.state.look_captured => {
                self.set_look_captured(true);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.state.look_captured && self.state.cursor_warp {
                    if let Some(window) = &self.window {
                        let center = Self::window_center(window);
                        self.state
                            .input
                            .record_cursor(Vec2::new(position.x as f32, position.y as f32), center);
                    }
                    self.warp_to_center();
                }
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                if let Some(gpu) = &mut self.gpu {
                    gpu.render(&self.state.scene);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.look_captured && !self.state.cursor_warp {
                self.state
                    .input
                    .record_motion(Vec2::new(delta.0 as f32, delta.1 as f32));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // GPU objects must go before the window their surface targets.
        self.gpu.take();
        tracing::info!("spincube-desktop exiting");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = cli.apply(DemoConfig::load(cli.config.as_deref())?);
    tracing::info!(
        vertex = %config.shaders.vertex.display(),
        fragment = %config.shaders.fragment.display(),
        timing = ?config.timing,
        "spincube-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
