//! canvas_root demo
//!
//! Opens a window, binds a root to it and drives the root from the winit
//! event loop: resizes go through the debouncer, scale factor changes update
//! the pixel ratio and redraws tick the frameloop. Clicks report pointer
//! misses and Space invalidates under `demand`.
//!
//! Usage: canvas_root_demo [config.json]

use std::time::Instant;

use canvas_root::canvas::backend::HeadlessBackend;
use canvas_root::canvas::config::{ConfigPatch, Frameloop, Shadows};
use canvas_root::canvas::events::{PointerButton, PointerEvent};
use canvas_root::canvas::log::FacadeLogger;
use canvas_root::canvas::scene::{SceneNode, SceneTree};
use canvas_root::canvas::surface::{ResizeCause, ResizeDebouncer, Surface};
use canvas_root::canvas::{Engine, FrameState, Root};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

fn demo_scene() -> SceneTree {
    SceneTree::from(
        SceneNode::new("scene").children([
            SceneNode::new("ambientLight").prop("intensity", 0.4),
            SceneNode::new("directionalLight")
                .prop("position", [5.0f32, 5.0, 5.0])
                .prop("castShadow", true),
            SceneNode::new("mesh")
                .key("cube")
                .child(SceneNode::new("boxGeometry").prop("args", [1.0f32, 1.0, 1.0]))
                .child(SceneNode::new("meshStandardMaterial").prop("color", "hotpink")),
        ]),
    )
}

fn load_patch() -> Result<ConfigPatch, Box<dyn std::error::Error>> {
    let patch = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading root configuration from {}", path);
            ConfigPatch::from_json(&std::fs::read_to_string(path)?)?
        }
        None => ConfigPatch::new().shadows(Shadows::Toggle(true)),
    };

    Ok(patch
        .on_created(|root: &Root| {
            log::info!("Root ready, {} backend, frameloop {:?}", root.backend_name(), root.config().frameloop);
        })
        .on_pointer_missed(|event: &PointerEvent| {
            log::info!("Pointer missed at ({:.0}, {:.0})", event.x, event.y);
        }))
}

struct DemoApp {
    // Dropped before the window it is bound to
    root: Option<Root>,
    window: Option<Window>,
    patch: Option<ConfigPatch>,
    resize: ResizeDebouncer,
    cursor: (f32, f32),
    last_frame: Instant,
}

impl DemoApp {
    fn new(patch: ConfigPatch) -> Self {
        Self {
            root: None,
            window: None,
            patch: Some(patch),
            resize: ResizeDebouncer::new(Default::default()),
            cursor: (0.0, 0.0),
            last_frame: Instant::now(),
        }
    }

    fn create_root(&mut self, window: &Window) -> canvas_root::canvas::Result<Root> {
        let patch = self.patch.take().unwrap_or_default();
        let mut root = Root::create(window, HeadlessBackend::new(), patch)?;

        let mut frames = 0u64;
        root.subscribe(0, move |state: &FrameState| {
            frames += 1;
            if frames % 120 == 0 {
                log::debug!("{} frames, {:.1}s elapsed", state.frame, state.elapsed.as_secs_f32());
            }
        })?;
        root.render(demo_scene())?;

        self.resize.set_options(root.config().resize);
        self.resize.observe(root.size()?, ResizeCause::Resize, Instant::now());
        Ok(root)
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut root) = self.root.take() {
            root.unmount();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("canvas_root demo")
            .with_inner_size(LogicalSize::new(960.0, 540.0));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(err) => {
                log::error!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        match self.create_root(&window) {
            Ok(root) => self.root = Some(root),
            Err(err) => {
                log::error!("Failed to create root: {}", err);
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.last_frame = Instant::now();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let (Some(window), Some(root)) = (self.window.as_ref(), self.root.as_mut()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Err(err) = root.set_device_pixel_ratio(scale_factor) {
                    log::warn!("Scale factor {} rejected: {}", scale_factor, err);
                }
                window.request_redraw();
            }

            WindowEvent::Resized(_) => {
                if let Some(size) = self.resize.observe(window.logical_size(), ResizeCause::Resize, Instant::now()) {
                    if let Err(err) = root.configure(ConfigPatch::new().size(size)) {
                        log::warn!("Resize to {}x{} rejected: {}", size.width, size.height, err);
                    }
                }
                window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(window.scale_factor());
                self.cursor = (logical.x, logical.y);
            }

            WindowEvent::MouseInput { state: ElementState::Pressed, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    _ => PointerButton::Auxiliary,
                };
                // The headless backend has no hit testing: every click misses
                let event = PointerEvent::new(self.cursor.0, self.cursor.1).with_button(button);
                if let Err(err) = root.pointer_missed(&event) {
                    log::warn!("Pointer miss not delivered: {}", err);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if event.logical_key == Key::Named(NamedKey::Space) && root.invalidate().is_ok() {
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(size) = self.resize.poll(Instant::now()) {
                    if let Err(err) = root.configure(ConfigPatch::new().size(size)) {
                        log::warn!("Resize to {}x{} rejected: {}", size.width, size.height, err);
                    }
                }

                let now = Instant::now();
                let delta = now - self.last_frame;
                self.last_frame = now;

                if let Err(err) = root.tick(delta) {
                    log::warn!("Frame failed: {}", err);
                }

                let more = match root.config().frameloop {
                    Frameloop::Always => true,
                    Frameloop::Demand => root.pending_frames() > 0,
                    Frameloop::Never => false,
                };
                if more || self.resize.is_pending() {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    Engine::set_logger(FacadeLogger);

    let patch = load_patch()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = DemoApp::new(patch);
    event_loop.run_app(&mut app)?;
    Ok(())
}
