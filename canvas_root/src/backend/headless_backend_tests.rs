/// Tests for HeadlessBackend
///
/// Validate target/scene bookkeeping, draw accounting and armed failures.

use super::*;
use crate::camera::CameraState;
use crate::config::CameraOptions;
use crate::scene::SceneNode;

fn desc(width: u32, height: u32, pixel_ratio: f64) -> TargetDesc {
    TargetDesc {
        surface: SurfaceId::new(1).unwrap(),
        size: Size::new(width, height),
        pixel_ratio,
        settings: RendererSettings::default(),
    }
}

fn camera() -> CameraState {
    CameraState::new(&CameraOptions::default(), false, Size::new(100, 100))
}

fn mesh_tree() -> SceneTree {
    SceneTree::from(SceneNode::new("mesh").child(SceneNode::new("boxGeometry")))
}

// ============================================================================
// Tests: Targets
// ============================================================================

#[test]
fn test_create_target_tracks_drawing_buffer() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(400, 300, 2.0)).unwrap();

    assert_eq!(backend.drawing_buffer_size(target), Some(Size::new(800, 600)));
    assert_eq!(backend.target_surface(target), SurfaceId::new(1));
    assert_eq!(backend.stats().live_targets, 1);
    assert_eq!(backend.stats().targets_created, 1);
}

#[test]
fn test_resize_target() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(400, 300, 1.0)).unwrap();

    backend.resize_target(target, Size::new(200, 100), 1.5).unwrap();

    assert_eq!(backend.drawing_buffer_size(target), Some(Size::new(300, 150)));
    assert_eq!(backend.stats().resizes, 1);
}

#[test]
fn test_resize_unknown_target_fails() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();
    backend.release_target(target);

    assert!(backend.resize_target(target, Size::new(1, 1), 1.0).is_err());
}

#[test]
fn test_apply_settings() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();
    let settings = RendererSettings { antialias: false, ..RendererSettings::default() };

    backend.apply_settings(target, &settings).unwrap();

    assert_eq!(backend.target_settings(target), Some(settings));
    assert_eq!(backend.stats().settings_applied, 1);
}

#[test]
fn test_release_target_drops_orphaned_scenes() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();
    backend.mount_scene(target, &mesh_tree()).unwrap();

    backend.release_target(target);

    let stats = backend.stats();
    assert_eq!(stats.live_targets, 0);
    assert_eq!(stats.live_scenes, 0);
}

#[test]
fn test_release_twice_is_harmless() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();
    backend.release_target(target);
    backend.release_target(target);
    assert_eq!(backend.stats().live_targets, 0);
}

// ============================================================================
// Tests: Scenes
// ============================================================================

#[test]
fn test_mount_scene_instantiates_elements() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();

    let scene = backend.mount_scene(target, &mesh_tree()).unwrap();

    let elements = backend.scene_elements(scene).unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(backend.stats().live_scenes, 1);
}

#[test]
fn test_mount_scene_unknown_tag_leaves_nothing() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();

    let result = backend.mount_scene(target, &SceneTree::from(SceneNode::new("notAThing")));

    assert!(result.is_err());
    assert_eq!(backend.stats().live_scenes, 0);
}

#[test]
fn test_mount_scene_custom_registry() {
    let mut registry = ElementRegistry::new();
    registry.register("widget", crate::scene::ElementKind::Object);
    let mut backend = HeadlessBackend::with_registry(Arc::new(registry));
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();

    assert!(backend.mount_scene(target, &SceneTree::from(SceneNode::new("widget"))).is_ok());
    assert!(backend.mount_scene(target, &mesh_tree()).is_err());
}

#[test]
fn test_release_scene() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();
    let scene = backend.mount_scene(target, &mesh_tree()).unwrap();

    backend.release_scene(scene);

    assert!(backend.scene_elements(scene).is_none());
    assert_eq!(backend.stats().live_scenes, 0);
}

// ============================================================================
// Tests: Draw
// ============================================================================

#[test]
fn test_draw_records_frame() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();
    let scene = backend.mount_scene(target, &mesh_tree()).unwrap();
    let cam = camera();

    backend.draw(&FrameSubmission { target, scene: Some(scene), camera: &cam, frame: 1 }).unwrap();

    let record = backend.last_draw().unwrap();
    assert_eq!(record.frame, 1);
    assert_eq!(record.scene, Some(scene));
    assert_eq!(record.drawing_buffer, Size::new(10, 10));
    assert_eq!(record.view_projection, cam.view_projection_matrix());
    assert_eq!(backend.stats().draw_calls, 1);
}

#[test]
fn test_draw_without_scene_is_cleared_frame() {
    let mut backend = HeadlessBackend::new();
    let target = backend.create_target(&desc(10, 10, 1.0)).unwrap();
    let cam = camera();

    backend.draw(&FrameSubmission { target, scene: None, camera: &cam, frame: 1 }).unwrap();

    assert_eq!(backend.last_draw().unwrap().scene, None);
}

#[test]
fn test_draw_with_foreign_scene_fails() {
    let mut backend = HeadlessBackend::new();
    let a = backend.create_target(&desc(10, 10, 1.0)).unwrap();
    let b = backend.create_target(&desc(10, 10, 1.0)).unwrap();
    let scene = backend.mount_scene(a, &mesh_tree()).unwrap();
    let cam = camera();

    let result = backend.draw(&FrameSubmission { target: b, scene: Some(scene), camera: &cam, frame: 1 });

    assert!(result.is_err());
    assert_eq!(backend.stats().draw_calls, 0);
}

// ============================================================================
// Tests: Armed failures and shared state
// ============================================================================

#[test]
fn test_fail_next_fires_once() {
    let mut backend = HeadlessBackend::new();
    backend.fail_next(FailPoint::CreateTarget);

    assert!(matches!(backend.create_target(&desc(10, 10, 1.0)), Err(Error::Backend(_))));
    assert!(backend.create_target(&desc(10, 10, 1.0)).is_ok());
    assert_eq!(backend.stats().live_targets, 1);
}

#[test]
fn test_clones_share_state() {
    let mut backend = HeadlessBackend::new();
    let probe = backend.clone();

    backend.create_target(&desc(10, 10, 1.0)).unwrap();

    assert_eq!(probe.stats().live_targets, 1);
}

#[test]
fn test_backend_name() {
    assert_eq!(HeadlessBackend::new().name(), "headless");
}
