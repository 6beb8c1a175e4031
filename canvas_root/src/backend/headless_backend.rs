/// Headless backend (no GPU required)
///
/// Keeps every allocated target and scene in slot maps and counts draws, so
/// callers can check that a root releases everything it acquired and how
/// often it redraws. Clones share the same state: keep a clone as a probe
/// after handing the backend to a root.

use std::sync::{Arc, Mutex, MutexGuard};
use glam::Mat4;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::scene::{Element, ElementRegistry, SceneTree};
use crate::surface::{Size, SurfaceId};
use crate::{canvas_bail, canvas_debug, canvas_trace, canvas_warn};
use super::backend::{Backend, FrameSubmission, SceneId, TargetDesc, TargetId};
use super::settings::RendererSettings;

const SOURCE: &str = "canvas::HeadlessBackend";

/// Operation that can be made to fail once, for error-path tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    CreateTarget,
    ResizeTarget,
    ApplySettings,
    MountScene,
    Draw,
}

/// Resource and activity counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    pub live_targets: usize,
    pub live_scenes: usize,
    pub targets_created: usize,
    pub scenes_mounted: usize,
    pub resizes: usize,
    pub settings_applied: usize,
    pub draw_calls: u64,
}

/// What the last draw call looked like
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecord {
    pub target: TargetId,
    pub scene: Option<SceneId>,
    pub frame: u64,
    pub drawing_buffer: Size,
    pub view_projection: Mat4,
}

struct HeadlessTarget {
    surface: SurfaceId,
    drawing_buffer: Size,
    settings: RendererSettings,
}

struct HeadlessScene {
    target: TargetId,
    elements: Vec<Element>,
}

#[derive(Default)]
struct HeadlessState {
    targets: SlotMap<TargetId, HeadlessTarget>,
    scenes: SlotMap<SceneId, HeadlessScene>,
    armed_failures: FxHashSet<FailPoint>,
    stats: HeadlessStats,
    last_draw: Option<DrawRecord>,
}

impl HeadlessState {
    fn take_failure(&mut self, point: FailPoint) -> bool {
        self.armed_failures.remove(&point)
    }

    fn refresh_live_counts(&mut self) {
        self.stats.live_targets = self.targets.len();
        self.stats.live_scenes = self.scenes.len();
    }
}

#[derive(Clone)]
pub struct HeadlessBackend {
    registry: Arc<ElementRegistry>,
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessBackend {
    /// Headless backend resolving tags through the built-in catalog
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ElementRegistry::with_defaults()))
    }

    pub fn with_registry(registry: Arc<ElementRegistry>) -> Self {
        Self {
            registry,
            state: Arc::new(Mutex::new(HeadlessState::default())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HeadlessState>> {
        self.state
            .lock()
            .map_err(|_| Error::Backend("Headless backend state lock poisoned".to_string()))
    }

    /// Make the next call of `point` fail with `Error::Backend`
    pub fn fail_next(&self, point: FailPoint) {
        if let Ok(mut state) = self.state.lock() {
            state.armed_failures.insert(point);
        }
    }

    pub fn stats(&self) -> HeadlessStats {
        self.state.lock().map(|state| state.stats).unwrap_or_default()
    }

    pub fn last_draw(&self) -> Option<DrawRecord> {
        self.state.lock().ok().and_then(|state| state.last_draw)
    }

    /// Drawing-buffer size of a live target
    pub fn drawing_buffer_size(&self, target: TargetId) -> Option<Size> {
        let state = self.state.lock().ok()?;
        state.targets.get(target).map(|t| t.drawing_buffer)
    }

    /// Settings last applied to a live target
    pub fn target_settings(&self, target: TargetId) -> Option<RendererSettings> {
        let state = self.state.lock().ok()?;
        state.targets.get(target).map(|t| t.settings)
    }

    /// Surface a live target is bound to
    pub fn target_surface(&self, target: TargetId) -> Option<SurfaceId> {
        let state = self.state.lock().ok()?;
        state.targets.get(target).map(|t| t.surface)
    }

    /// Elements instantiated for a live scene
    pub fn scene_elements(&self, scene: SceneId) -> Option<Vec<Element>> {
        let state = self.state.lock().ok()?;
        state.scenes.get(scene).map(|s| s.elements.clone())
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for HeadlessBackend {
    fn name(&self) -> &str {
        "headless"
    }

    fn create_target(&mut self, desc: &TargetDesc) -> Result<TargetId> {
        let mut state = self.lock()?;
        if state.take_failure(FailPoint::CreateTarget) {
            canvas_bail!(SOURCE, "Target allocation failed for surface {:?}", desc.surface);
        }

        let drawing_buffer = desc.size.scaled(desc.pixel_ratio);
        let id = state.targets.insert(HeadlessTarget {
            surface: desc.surface,
            drawing_buffer,
            settings: desc.settings,
        });
        state.stats.targets_created += 1;
        state.refresh_live_counts();

        canvas_debug!(SOURCE, "Created target {:?} ({}x{} device px)", id, drawing_buffer.width, drawing_buffer.height);
        Ok(id)
    }

    fn resize_target(&mut self, target: TargetId, size: Size, pixel_ratio: f64) -> Result<()> {
        let mut state = self.lock()?;
        if state.take_failure(FailPoint::ResizeTarget) {
            canvas_bail!(SOURCE, "Resize failed for target {:?}", target);
        }

        let drawing_buffer = size.scaled(pixel_ratio);
        match state.targets.get_mut(target) {
            Some(t) => t.drawing_buffer = drawing_buffer,
            None => canvas_bail!(SOURCE, "Resize of unknown target {:?}", target),
        }
        state.stats.resizes += 1;

        canvas_debug!(SOURCE, "Resized target {:?} to {}x{} device px", target, drawing_buffer.width, drawing_buffer.height);
        Ok(())
    }

    fn apply_settings(&mut self, target: TargetId, settings: &RendererSettings) -> Result<()> {
        let mut state = self.lock()?;
        if state.take_failure(FailPoint::ApplySettings) {
            canvas_bail!(SOURCE, "Settings rejected for target {:?}", target);
        }

        match state.targets.get_mut(target) {
            Some(t) => t.settings = *settings,
            None => canvas_bail!(SOURCE, "Settings for unknown target {:?}", target),
        }
        state.stats.settings_applied += 1;
        Ok(())
    }

    fn release_target(&mut self, target: TargetId) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.targets.remove(target).is_none() {
            canvas_warn!(SOURCE, "Release of unknown target {:?}", target);
            return;
        }

        let orphaned = state.scenes.iter().filter(|(_, s)| s.target == target).count();
        if orphaned > 0 {
            canvas_warn!(SOURCE, "Target {:?} released with {} scene(s) still mounted", target, orphaned);
            state.scenes.retain(|_, s| s.target != target);
        }
        state.refresh_live_counts();

        canvas_debug!(SOURCE, "Released target {:?}", target);
    }

    fn mount_scene(&mut self, target: TargetId, tree: &SceneTree) -> Result<SceneId> {
        let mut state = self.lock()?;
        if state.take_failure(FailPoint::MountScene) {
            canvas_bail!(SOURCE, "Scene mount failed for target {:?}", target);
        }
        if !state.targets.contains_key(target) {
            canvas_bail!(SOURCE, "Scene mount on unknown target {:?}", target);
        }

        let elements = self.registry.instantiate_tree(tree)?;
        let element_count = elements.len();
        let id = state.scenes.insert(HeadlessScene { target, elements });
        state.stats.scenes_mounted += 1;
        state.refresh_live_counts();

        canvas_debug!(SOURCE, "Mounted scene {:?} with {} element(s)", id, element_count);
        Ok(id)
    }

    fn release_scene(&mut self, scene: SceneId) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.scenes.remove(scene).is_none() {
            canvas_warn!(SOURCE, "Release of unknown scene {:?}", scene);
            return;
        }
        state.refresh_live_counts();
    }

    fn draw(&mut self, frame: &FrameSubmission<'_>) -> Result<()> {
        let mut state = self.lock()?;
        if state.take_failure(FailPoint::Draw) {
            canvas_bail!(SOURCE, "Draw failed for target {:?}", frame.target);
        }

        let drawing_buffer = match state.targets.get(frame.target) {
            Some(t) => t.drawing_buffer,
            None => canvas_bail!(SOURCE, "Draw on unknown target {:?}", frame.target),
        };
        if let Some(scene) = frame.scene {
            match state.scenes.get(scene) {
                Some(s) if s.target == frame.target => {}
                _ => canvas_bail!(SOURCE, "Scene {:?} is not mounted on target {:?}", scene, frame.target),
            }
        }

        state.stats.draw_calls += 1;
        state.last_draw = Some(DrawRecord {
            target: frame.target,
            scene: frame.scene,
            frame: frame.frame,
            drawing_buffer,
            view_projection: frame.camera.view_projection_matrix(),
        });

        canvas_trace!(SOURCE, "Frame {} drawn on target {:?}", frame.frame, frame.target);
        Ok(())
    }
}

#[cfg(test)]
#[path = "headless_backend_tests.rs"]
mod tests;
