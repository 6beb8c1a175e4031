/// Root - lifecycle of one render target bound to a surface
///
/// A root claims a surface, allocates a render target on its backend, mounts
/// scene trees on it, and releases everything at `unmount` (or on drop).
/// All mutating operations take `&mut self`: a root has a single owner and a
/// resize is never observed half-applied.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::{Backend, FrameSubmission, RendererSettings, TargetDesc};
use crate::camera::CameraState;
use crate::config::{
    ConfigChanges, ConfigPatch, CreatedCallback, Frameloop, PointerMissedCallback,
    RootConfiguration,
};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::events::{EventManager, PointerEvent};
use crate::scene::{SceneHandle, SceneTree};
use crate::surface::{Size, Surface, SurfaceId};
use crate::{canvas_debug, canvas_error, canvas_info, canvas_trace};
use super::frame::{FrameState, FrameSubscribers, SubscriptionId};
use super::render_target::{Extent, RenderTarget};

const SOURCE: &str = "canvas::Root";

/// Upper bound of frames queued by `invalidate` under `Frameloop::Demand`
pub const MAX_PENDING_FRAMES: u32 = 60;

/// Lifecycle state of a root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Active,
    /// Terminal. Every operation but `unmount` fails with `Error::DisposedRoot`
    Disposed,
}

pub struct Root {
    lifecycle: Lifecycle,
    surface: SurfaceId,
    device_pixel_ratio: f64,
    config: RootConfiguration,
    settings: RendererSettings,
    camera: CameraState,
    /// `None` once unmounted
    target: Option<RenderTarget>,
    scene: Option<SceneHandle>,
    backend: Box<dyn Backend>,
    events: Option<Box<dyn EventManager>>,
    on_created: Option<CreatedCallback>,
    on_pointer_missed: Option<PointerMissedCallback>,
    subscribers: FrameSubscribers,
    frame_count: u64,
    elapsed: Duration,
    pending_frames: u32,
    created: bool,
}

impl Root {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        canvas_error!(SOURCE, "{}", error);
        error
    }

    /// Bind a new root to `surface`
    ///
    /// `patch` is merged over the default configuration and validated before
    /// anything is acquired. On error nothing stays bound or allocated.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidSurface` if the surface has no handle or is already
    ///   bound to another live root
    /// - `Error::Configuration` if the merged configuration is invalid
    /// - `Error::Backend` if the backend cannot allocate the render target
    ///
    /// # Example
    ///
    /// ```
    /// use canvas_root::canvas::{Root, backend::HeadlessBackend, config::ConfigPatch};
    /// use canvas_root::canvas::surface::HeadlessSurface;
    ///
    /// let surface = HeadlessSurface::new(0xD0C, 640, 480);
    /// let mut root = Root::create(&surface, HeadlessBackend::new(), ConfigPatch::new())?;
    /// assert_eq!(root.size()?.width, 640);
    /// root.unmount();
    /// # Ok::<(), canvas_root::canvas::Error>(())
    /// ```
    pub fn create<S, B>(surface: &S, backend: B, mut patch: ConfigPatch) -> Result<Root>
    where
        S: Surface + ?Sized,
        B: Backend + 'static,
    {
        let surface_id = surface.surface_id().ok_or_else(|| {
            Self::log_and_return_error(Error::InvalidSurface("surface handle is null".to_string()))
        })?;

        let (config, _) = RootConfiguration::default().merged(&patch);
        config.validate().map_err(Self::log_and_return_error)?;

        let device_pixel_ratio = surface.device_pixel_ratio();
        let extent = Extent {
            size: config.size.unwrap_or_else(|| surface.logical_size()),
            pixel_ratio: config.pixel_ratio.resolve(device_pixel_ratio),
        }
        .checked()
        .map_err(Self::log_and_return_error)?;
        let settings = RendererSettings::from(&config);

        Engine::bind_surface(surface_id)?;

        let mut backend: Box<dyn Backend> = Box::new(backend);
        let target_id = match backend.create_target(&TargetDesc {
            surface: surface_id,
            size: extent.size,
            pixel_ratio: extent.pixel_ratio,
            settings,
        }) {
            Ok(id) => id,
            Err(error) => {
                Engine::release_surface(surface_id);
                return Err(Self::log_and_return_error(error));
            }
        };

        let camera = CameraState::new(&config.camera, config.orthographic, extent.size);

        let mut events = patch.events.take();
        if config.events_enabled {
            if let Some(events) = events.as_mut() {
                events.connect(surface_id);
            }
        }

        canvas_info!(
            SOURCE,
            "Root created on surface {:?} ({}x{} @{}x, {} backend, frameloop {:?})",
            surface_id,
            extent.size.width,
            extent.size.height,
            extent.pixel_ratio,
            backend.name(),
            config.frameloop
        );

        Ok(Root {
            lifecycle: Lifecycle::Active,
            surface: surface_id,
            device_pixel_ratio,
            config,
            settings,
            camera,
            target: Some(RenderTarget::new(target_id, surface_id, extent)),
            scene: None,
            backend,
            events,
            on_created: patch.on_created.take(),
            on_pointer_missed: patch.on_pointer_missed.take(),
            subscribers: FrameSubscribers::default(),
            frame_count: 0,
            elapsed: Duration::ZERO,
            pending_frames: 0,
            created: false,
        })
    }

    // ===== LIFECYCLE =====

    fn active_target(&self) -> Result<RenderTarget> {
        match (self.lifecycle, self.target) {
            (Lifecycle::Active, Some(target)) => Ok(target),
            _ => Err(Self::log_and_return_error(Error::DisposedRoot)),
        }
    }

    /// Mount `tree` and request a frame
    ///
    /// A tree equal to the mounted one (same `Arc` or same content) keeps
    /// the mounted scene. If the backend rejects the tree, the previous
    /// scene stays mounted. The first successful call fires `on-created`.
    pub fn render(&mut self, tree: impl Into<Arc<SceneTree>>) -> Result<()> {
        let target = self.active_target()?;
        let tree: Arc<SceneTree> = tree.into();

        let changed = !matches!(&self.scene, Some(handle) if handle.matches(&tree));
        if changed {
            let scene_id = self
                .backend
                .mount_scene(target.id(), &tree)
                .map_err(Self::log_and_return_error)?;

            if let Some(previous) = self.scene.replace(SceneHandle::new(scene_id, tree.clone())) {
                self.backend.release_scene(previous.id());
            }
            if let Some(events) = self.events.as_mut() {
                events.update_scene(&tree);
            }
            canvas_debug!(SOURCE, "Mounted scene {:?} ({} node(s))", scene_id, tree.node_count());
        }

        self.request_frame(changed)?;

        if !self.created {
            self.created = true;
            if let Some(callback) = self.on_created.take() {
                callback(self);
            }
        }
        Ok(())
    }

    /// Shallow-merge `patch` into the active configuration
    ///
    /// All or nothing: if validation or a backend call fails, the
    /// configuration, render target and renderer settings are left as they
    /// were.
    pub fn configure(&mut self, mut patch: ConfigPatch) -> Result<()> {
        let target = self.active_target()?;

        let (candidate, changes) = self.config.merged(&patch);
        candidate.validate().map_err(Self::log_and_return_error)?;

        let previous = target.extent();
        let extent = Extent {
            size: candidate.size.unwrap_or(previous.size),
            pixel_ratio: candidate.pixel_ratio.resolve(self.device_pixel_ratio),
        }
        .checked()
        .map_err(Self::log_and_return_error)?;
        let resized = extent != previous;
        if resized {
            self.backend
                .resize_target(target.id(), extent.size, extent.pixel_ratio)
                .map_err(Self::log_and_return_error)?;
        }

        let settings = RendererSettings::from(&candidate);
        if settings != self.settings {
            if let Err(error) = self.backend.apply_settings(target.id(), &settings) {
                if resized {
                    // Roll back so the target matches the kept configuration
                    if let Err(rollback) =
                        self.backend.resize_target(target.id(), previous.size, previous.pixel_ratio)
                    {
                        canvas_error!(SOURCE, "Resize rollback failed: {}", rollback);
                    }
                }
                return Err(Self::log_and_return_error(error));
            }
        }

        // ----- commit -----
        if resized {
            if let Some(target) = self.target.as_mut() {
                target.set_extent(extent);
            }
        }
        if changes.intersects(ConfigChanges::CAMERA | ConfigChanges::ORTHOGRAPHIC) {
            self.camera = CameraState::new(&candidate.camera, candidate.orthographic, extent.size);
        } else if resized {
            self.camera.resize(extent.size);
        }
        self.settings = settings;

        let events_replaced = match patch.events.take() {
            Some(events) => {
                if let Some(mut old) = self.events.replace(events) {
                    if old.is_connected() {
                        old.disconnect();
                    }
                }
                true
            }
            None => false,
        };
        self.sync_events(candidate.events_enabled);
        if events_replaced {
            if let (Some(events), Some(scene)) = (self.events.as_mut(), self.scene.as_ref()) {
                events.update_scene(scene.tree());
            }
        }

        if let Some(callback) = patch.on_created.take() {
            self.on_created = Some(callback);
        }
        if let Some(callback) = patch.on_pointer_missed.take() {
            self.on_pointer_missed = Some(callback);
        }

        if changes.contains(ConfigChanges::FRAMELOOP) {
            self.pending_frames = 0;
            canvas_debug!(SOURCE, "Frameloop switched to {:?}", candidate.frameloop);
        }
        self.config = candidate;

        if !changes.is_empty() {
            canvas_debug!(SOURCE, "Configured ({:?})", changes);
        }
        self.request_frame(!changes.is_empty() || events_replaced)
    }

    /// Follow a device pixel ratio change of the bound surface
    ///
    /// `pixel-ratio-bounds` is resolved again against `ratio` and the render
    /// target is resized if the resolved ratio changed. On error the root
    /// keeps its previous ratio and target.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) -> Result<()> {
        let target = self.active_target()?;
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(Self::log_and_return_error(Error::Configuration(format!(
                "device pixel ratio must be positive, got {}", ratio
            ))));
        }

        let previous = target.extent();
        let extent = Extent {
            size: previous.size,
            pixel_ratio: self.config.pixel_ratio.resolve(ratio),
        }
        .checked()
        .map_err(Self::log_and_return_error)?;

        let resized = extent != previous;
        if resized {
            self.backend
                .resize_target(target.id(), extent.size, extent.pixel_ratio)
                .map_err(Self::log_and_return_error)?;
            if let Some(target) = self.target.as_mut() {
                target.set_extent(extent);
            }
            canvas_debug!(SOURCE, "Device pixel ratio {} resolved to {}", ratio, extent.pixel_ratio);
        }
        self.device_pixel_ratio = ratio;

        self.request_frame(resized)
    }

    /// Device pixel ratio last reported by the surface
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn sync_events(&mut self, enabled: bool) {
        let surface = self.surface;
        if let Some(events) = self.events.as_mut() {
            match (enabled, events.is_connected()) {
                (true, false) => events.connect(surface),
                (false, true) => events.disconnect(),
                _ => {}
            }
        }
    }

    /// Release everything the root holds and mark it disposed
    ///
    /// Idempotent and infallible. Called by `Drop` as well.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }

        if let Some(scene) = self.scene.take() {
            self.backend.release_scene(scene.id());
        }
        if let Some(target) = self.target.take() {
            self.backend.release_target(target.id());
        }
        if let Some(mut events) = self.events.take() {
            if events.is_connected() {
                events.disconnect();
            }
        }
        self.subscribers.clear();
        self.on_created = None;
        self.on_pointer_missed = None;
        self.pending_frames = 0;

        Engine::release_surface(self.surface);
        self.lifecycle = Lifecycle::Disposed;

        canvas_info!(SOURCE, "Root on surface {:?} unmounted after {} frame(s)", self.surface, self.frame_count);
    }

    // ===== FRAMES =====

    /// Draw (or queue) a frame after `render`/`configure`
    fn request_frame(&mut self, changed: bool) -> Result<()> {
        match self.config.frameloop {
            Frameloop::Always => self.draw_frame(Duration::ZERO),
            Frameloop::Demand if changed => self.draw_frame(Duration::ZERO),
            Frameloop::Demand | Frameloop::Never => Ok(()),
        }
    }

    fn draw_frame(&mut self, delta: Duration) -> Result<()> {
        let target = self.active_target()?;
        let frame = self.frame_count + 1;
        let elapsed = self.elapsed + delta;

        self.subscribers.notify(&FrameState {
            frame,
            delta,
            elapsed,
            size: target.size(),
            pixel_ratio: target.pixel_ratio(),
        });

        let submission = FrameSubmission {
            target: target.id(),
            scene: self.scene.as_ref().map(|s| s.id()),
            camera: &self.camera,
            frame,
        };
        self.backend.draw(&submission).map_err(Self::log_and_return_error)?;

        self.frame_count = frame;
        self.elapsed = elapsed;
        canvas_trace!(SOURCE, "Frame {} submitted", frame);
        Ok(())
    }

    /// External frame tick. Returns whether a frame was drawn.
    ///
    /// - `Always`: every tick draws
    /// - `Demand`: draws while `invalidate` left frames pending
    /// - `Never`: never draws
    pub fn tick(&mut self, delta: Duration) -> Result<bool> {
        self.active_target()?;

        let due = match self.config.frameloop {
            Frameloop::Always => true,
            Frameloop::Demand => self.pending_frames > 0,
            Frameloop::Never => false,
        };
        if !due {
            return Ok(false);
        }

        self.draw_frame(delta)?;
        self.pending_frames = self.pending_frames.saturating_sub(1);
        Ok(true)
    }

    /// Queue one frame for the next tick under `Frameloop::Demand`
    ///
    /// No-op in the other modes. At most `MAX_PENDING_FRAMES` are queued.
    pub fn invalidate(&mut self) -> Result<()> {
        self.active_target()?;
        if self.config.frameloop == Frameloop::Demand {
            self.pending_frames = (self.pending_frames + 1).min(MAX_PENDING_FRAMES);
        }
        Ok(())
    }

    /// Draw one frame now, whatever the frameloop
    pub fn advance(&mut self, delta: Duration) -> Result<()> {
        self.draw_frame(delta)
    }

    /// Run `callback` before each draw. Lower priorities run first.
    pub fn subscribe<F>(&mut self, priority: i32, callback: F) -> Result<SubscriptionId>
    where
        F: FnMut(&FrameState) + Send + 'static,
    {
        self.active_target()?;
        Ok(self.subscribers.add(priority, Box::new(callback)))
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Forward a pointer event that hit nothing to `on-pointer-missed`
    pub fn pointer_missed(&mut self, event: &PointerEvent) -> Result<()> {
        self.active_target()?;
        if let Some(callback) = self.on_pointer_missed.as_mut() {
            callback(event);
        }
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    pub fn config(&self) -> &RootConfiguration {
        &self.config
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn render_target(&self) -> Result<RenderTarget> {
        self.active_target()
    }

    /// Logical size of the render target
    pub fn size(&self) -> Result<Size> {
        self.active_target().map(|t| t.size())
    }

    pub fn pixel_ratio(&self) -> Result<f64> {
        self.active_target().map(|t| t.pixel_ratio())
    }

    pub fn drawing_buffer_size(&self) -> Result<Size> {
        self.active_target().map(|t| t.drawing_buffer_size())
    }

    /// Currently mounted scene
    pub fn scene(&self) -> Option<&SceneHandle> {
        self.scene.as_ref()
    }

    /// Frames drawn so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn pending_frames(&self) -> u32 {
        self.pending_frames
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn events_connected(&self) -> bool {
        self.events.as_ref().is_some_and(|e| e.is_connected())
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Root")
            .field("lifecycle", &self.lifecycle)
            .field("surface", &self.surface)
            .field("target", &self.target)
            .field("scene", &self.scene.as_ref().map(|s| s.id()))
            .field("frameloop", &self.config.frameloop)
            .field("frame_count", &self.frame_count)
            .finish()
    }
}

#[cfg(test)]
#[path = "root_tests.rs"]
mod tests;
