//! Integration tests for the root lifecycle
//!
//! These tests drive roots through the public API against the headless
//! backend, which reports live resources and draw counts.
//!
//! Run with: cargo test --test root_integration_tests

use canvas_root::canvas::backend::{HeadlessBackend, HeadlessStats};
use canvas_root::canvas::config::{ConfigPatch, Frameloop, RendererOptions};
use canvas_root::canvas::scene::{SceneNode, SceneTree};
use canvas_root::canvas::surface::{HeadlessSurface, Size, SurfaceId};
use canvas_root::canvas::{Engine, Error, Lifecycle, Root};
use std::sync::Arc;
use std::time::Duration;
use serial_test::serial;

const FRAME: Duration = Duration::from_millis(16);

fn scene() -> SceneTree {
    SceneTree::from(
        SceneNode::new("group").children([
            SceneNode::new("ambientLight").prop("intensity", 0.3),
            SceneNode::new("mesh")
                .prop("position", [1.0f32, 0.0, 0.0])
                .child(SceneNode::new("sphereGeometry"))
                .child(SceneNode::new("meshBasicMaterial").prop("wireframe", true)),
        ]),
    )
}

// ============================================================================
// LIFECYCLE TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_create_unmount_leaks_nothing() {
    let backend = HeadlessBackend::new();
    let surface = HeadlessSurface::new(0x2_0001, 640, 480);
    let bound_before = Engine::bound_surface_count();

    let mut root = Root::create(&surface, backend.clone(), ConfigPatch::new()).unwrap();
    root.render(scene()).unwrap();
    root.unmount();

    let stats = backend.stats();
    assert_eq!(stats.live_targets, 0);
    assert_eq!(stats.live_scenes, 0);
    assert_eq!(stats.targets_created, 1);
    assert_eq!(Engine::bound_surface_count(), bound_before);
}

#[test]
#[serial]
fn test_integration_create_then_unmount_without_render_leaks_nothing() {
    let backend = HeadlessBackend::new();
    let surface = HeadlessSurface::new(0x2_0008, 640, 480);
    let id = SurfaceId::new(0x2_0008).unwrap();

    let mut root = Root::create(&surface, backend.clone(), ConfigPatch::new()).unwrap();
    assert!(Engine::is_surface_bound(id));
    root.unmount();

    let stats = backend.stats();
    assert_eq!(stats.live_targets, 0);
    assert_eq!(stats.live_scenes, 0);
    assert_eq!(stats.draw_calls, 0);
    assert!(!Engine::is_surface_bound(id));
    assert_eq!(root.lifecycle(), Lifecycle::Disposed);
}

#[test]
#[serial]
fn test_integration_many_cycles_leave_no_residue() {
    let backend = HeadlessBackend::new();
    let surface = HeadlessSurface::new(0x2_0002, 320, 240);

    for _ in 0..25 {
        let mut root = Root::create(&surface, backend.clone(), ConfigPatch::new()).unwrap();
        root.render(scene()).unwrap();
        root.configure(ConfigPatch::new().size(Size::new(100, 100))).unwrap();
        root.unmount();
    }

    let stats = backend.stats();
    assert_eq!((stats.live_targets, stats.live_scenes), (0, 0));
    assert_eq!(stats.targets_created, 25);
}

#[test]
#[serial]
fn test_integration_unmount_twice_is_noop() {
    let backend = HeadlessBackend::new();
    let surface = HeadlessSurface::new(0x2_0003, 10, 10);
    let mut root = Root::create(&surface, backend.clone(), ConfigPatch::new()).unwrap();

    root.unmount();
    let after_first: HeadlessStats = backend.stats();
    root.unmount();

    assert_eq!(backend.stats(), after_first);
    assert_eq!(root.lifecycle(), Lifecycle::Disposed);
}

#[test]
#[serial]
fn test_integration_render_and_configure_after_unmount_fail() {
    let surface = HeadlessSurface::new(0x2_0004, 10, 10);
    let mut root = Root::create(&surface, HeadlessBackend::new(), ConfigPatch::new()).unwrap();
    root.unmount();

    assert_eq!(root.render(scene()), Err(Error::DisposedRoot));
    assert_eq!(root.configure(ConfigPatch::new().orthographic(true)), Err(Error::DisposedRoot));
}

#[test]
#[serial]
fn test_integration_null_surface_rejected() {
    let backend = HeadlessBackend::new();

    let result = Root::create(&HeadlessSurface::null(), backend.clone(), ConfigPatch::new());

    assert!(matches!(result, Err(Error::InvalidSurface(_))));
    assert_eq!(backend.stats().targets_created, 0);
}

#[test]
#[serial]
fn test_integration_surface_bound_twice_rejected() {
    let surface = HeadlessSurface::new(0x2_0005, 10, 10);
    let first = Root::create(&surface, HeadlessBackend::new(), ConfigPatch::new()).unwrap();

    let second = Root::create(&surface, HeadlessBackend::new(), ConfigPatch::new());
    assert!(matches!(second, Err(Error::InvalidSurface(_))));

    // Dropping the first root frees the surface
    drop(first);
    assert!(Root::create(&surface, HeadlessBackend::new(), ConfigPatch::new()).is_ok());
}

#[test]
#[serial]
fn test_integration_roots_on_distinct_surfaces_coexist() {
    let backend = HeadlessBackend::new();
    let a = HeadlessSurface::new(0x2_0006, 10, 10);
    let b = HeadlessSurface::new(0x2_0007, 20, 20);

    let mut root_a = Root::create(&a, backend.clone(), ConfigPatch::new()).unwrap();
    let root_b = Root::create(&b, backend.clone(), ConfigPatch::new()).unwrap();
    root_a.unmount();

    assert_eq!(backend.stats().live_targets, 1);
    assert!(Engine::is_surface_bound(SurfaceId::new(0x2_0007).unwrap()));
    assert!(!Engine::is_surface_bound(SurfaceId::new(0x2_0006).unwrap()));
    drop(root_b);
}

// ============================================================================
// CONFIGURATION TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_configure_is_shallow_merge() {
    let surface = HeadlessSurface::new(0x2_0010, 10, 10);
    let patch = ConfigPatch::new()
        .frameloop(Frameloop::Demand)
        .renderer(RendererOptions { stencil: true, ..RendererOptions::default() });
    let mut root = Root::create(&surface, HeadlessBackend::new(), patch).unwrap();

    root.configure(ConfigPatch::new().orthographic(true)).unwrap();

    let config = root.config();
    assert!(config.orthographic);
    assert_eq!(config.frameloop, Frameloop::Demand);
    assert!(config.renderer.stencil);
}

#[test]
#[serial]
fn test_integration_configure_replaces_whole_group() {
    let surface = HeadlessSurface::new(0x2_0011, 10, 10);
    let patch = ConfigPatch::new().renderer(RendererOptions { stencil: true, ..RendererOptions::default() });
    let mut root = Root::create(&surface, HeadlessBackend::new(), patch).unwrap();

    // A group given in a patch replaces the previous group entirely
    root.configure(ConfigPatch::from_json(r#"{ "renderer-options": { "alpha": false } }"#).unwrap())
        .unwrap();

    assert!(!root.config().renderer.alpha);
    assert!(!root.config().renderer.stencil);
}

#[test]
#[serial]
fn test_integration_resize_updates_drawing_buffer() {
    let backend = HeadlessBackend::new();
    let surface = HeadlessSurface::new(0x2_0012, 300, 200).with_device_pixel_ratio(1.5);
    let mut root = Root::create(&surface, backend.clone(), ConfigPatch::new()).unwrap();
    root.render(scene()).unwrap();

    root.configure(ConfigPatch::new().size(Size::new(600, 400))).unwrap();

    assert_eq!(root.drawing_buffer_size().unwrap(), Size::new(900, 600));
    assert_eq!(backend.last_draw().unwrap().drawing_buffer, Size::new(900, 600));
}

// ============================================================================
// FRAMELOOP TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_never_does_not_draw_from_render() {
    let backend = HeadlessBackend::new();
    let surface = HeadlessSurface::new(0x2_0020, 10, 10);
    let mut root = Root::create(&surface, backend.clone(), ConfigPatch::new().frameloop(Frameloop::Never)).unwrap();

    root.render(scene()).unwrap();
    root.render(SceneTree::from(SceneNode::new("group"))).unwrap();
    for _ in 0..10 {
        assert!(!root.tick(FRAME).unwrap());
    }

    assert_eq!(backend.stats().draw_calls, 0);
}

#[test]
#[serial]
fn test_integration_always_draws_every_tick() {
    let backend = HeadlessBackend::new();
    let surface = HeadlessSurface::new(0x2_0021, 10, 10);
    let mut root = Root::create(&surface, backend.clone(), ConfigPatch::new()).unwrap();
    root.render(scene()).unwrap();
    let after_render = backend.stats().draw_calls;

    for _ in 0..30 {
        assert!(root.tick(FRAME).unwrap());
    }

    assert_eq!(backend.stats().draw_calls, after_render + 30);
    assert_eq!(root.frame_count(), after_render + 30);
}

#[test]
#[serial]
fn test_integration_demand_draws_on_change_only() {
    let backend = HeadlessBackend::new();
    let surface = HeadlessSurface::new(0x2_0022, 10, 10);
    let mut root = Root::create(&surface, backend.clone(), ConfigPatch::new().frameloop(Frameloop::Demand)).unwrap();
    let tree = Arc::new(scene());

    root.render(tree.clone()).unwrap();
    for _ in 0..5 {
        root.tick(FRAME).unwrap();
    }
    root.render(tree).unwrap();
    assert_eq!(backend.stats().draw_calls, 1);

    root.invalidate().unwrap();
    assert!(root.tick(FRAME).unwrap());
    assert_eq!(backend.stats().draw_calls, 2);
}

#[test]
#[serial]
fn test_integration_switching_frameloop_at_runtime() {
    let backend = HeadlessBackend::new();
    let surface = HeadlessSurface::new(0x2_0023, 10, 10);
    let mut root = Root::create(&surface, backend.clone(), ConfigPatch::new().frameloop(Frameloop::Never)).unwrap();

    root.configure(ConfigPatch::new().frameloop(Frameloop::Always)).unwrap();
    let drawn = backend.stats().draw_calls;

    assert!(root.tick(FRAME).unwrap());
    assert_eq!(backend.stats().draw_calls, drawn + 1);
}
