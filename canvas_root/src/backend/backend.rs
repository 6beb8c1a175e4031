/// Backend trait - drawing backend interface used by roots

use slotmap::new_key_type;

use crate::camera::CameraState;
use crate::error::Result;
use crate::scene::SceneTree;
use crate::surface::{Size, SurfaceId};
use super::settings::RendererSettings;

new_key_type! {
    /// Render target allocated by a backend
    pub struct TargetId;
    /// Scene mounted by a backend
    pub struct SceneId;
}

/// Render target descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetDesc {
    pub surface: SurfaceId,
    /// Logical size
    pub size: Size,
    /// Resolved pixel ratio (drawing buffer = size * pixel_ratio)
    pub pixel_ratio: f64,
    pub settings: RendererSettings,
}

/// One frame submitted for drawing
#[derive(Debug, Clone, Copy)]
pub struct FrameSubmission<'a> {
    pub target: TargetId,
    /// `None` draws a cleared frame
    pub scene: Option<SceneId>,
    pub camera: &'a CameraState,
    /// Frame number within the root, starting at 1
    pub frame: u64,
}

/// Drawing backend
///
/// Every resource returned by a `create_*`/`mount_*` call is released by the
/// matching `release_*` call. Release calls are infallible: a backend that
/// cannot free a resource logs it and moves on.
pub trait Backend: Send {
    /// Backend name, used in logs
    fn name(&self) -> &str;

    /// Allocate a render target bound to a surface
    fn create_target(&mut self, desc: &TargetDesc) -> Result<TargetId>;

    /// Reallocate the drawing buffer of a target
    fn resize_target(&mut self, target: TargetId, size: Size, pixel_ratio: f64) -> Result<()>;

    /// Apply new renderer settings to a target
    fn apply_settings(&mut self, target: TargetId, settings: &RendererSettings) -> Result<()>;

    /// Release a render target
    fn release_target(&mut self, target: TargetId);

    /// Instantiate a scene tree for a target
    fn mount_scene(&mut self, target: TargetId, tree: &SceneTree) -> Result<SceneId>;

    /// Release a mounted scene
    fn release_scene(&mut self, scene: SceneId);

    /// Draw one frame
    fn draw(&mut self, frame: &FrameSubmission<'_>) -> Result<()>;
}
