use glam::{Mat4, Vec3, Vec4};
use super::*;

fn default_camera(size: Size) -> CameraState {
    CameraState::new(&CameraOptions::default(), false, size)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_default_camera_is_perspective() {
    let camera = default_camera(Size::new(800, 400));

    match camera.projection() {
        Projection::Perspective { fov, aspect, near, far } => {
            assert_eq!(*fov, 75.0);
            assert_eq!(*aspect, 2.0);
            assert_eq!(*near, 0.1);
            assert_eq!(*far, 1000.0);
        }
        other => panic!("Expected perspective projection, got {:?}", other),
    }
    assert!(!camera.is_orthographic());
    assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0));
}

#[test]
fn test_perspective_matrix_matches_glam() {
    let camera = default_camera(Size::new(800, 400));
    let expected = Mat4::perspective_rh(75.0f32.to_radians(), 2.0, 0.1, 1000.0);
    assert_eq!(*camera.projection_matrix(), expected);
}

#[test]
fn test_view_looks_at_origin() {
    let camera = default_camera(Size::new(100, 100));
    let origin_in_view = *camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);

    // Right-handed view space: the origin is 5 units in front (negative z).
    assert!((origin_in_view.z + 5.0).abs() < 1e-5);
    assert!(origin_in_view.x.abs() < 1e-5);
    assert!(origin_in_view.y.abs() < 1e-5);
}

#[test]
fn test_camera_above_origin_is_not_degenerate() {
    let options = CameraOptions { position: [0.0, 10.0, 0.0], ..CameraOptions::default() };
    let camera = CameraState::new(&options, false, Size::new(100, 100));
    assert!(camera.view_matrix().is_finite());
}

#[test]
fn test_orthographic_camera_bounds() {
    let options = CameraOptions { zoom: 2.0, ..CameraOptions::default() };
    let camera = CameraState::new(&options, true, Size::new(800, 600));

    match camera.projection() {
        Projection::Orthographic { left, right, top, bottom, zoom, .. } => {
            assert_eq!(*left, -400.0);
            assert_eq!(*right, 400.0);
            assert_eq!(*top, 300.0);
            assert_eq!(*bottom, -300.0);
            assert_eq!(*zoom, 2.0);
        }
        other => panic!("Expected orthographic projection, got {:?}", other),
    }
    let expected = Mat4::orthographic_rh(-200.0, 200.0, -150.0, 150.0, 0.1, 1000.0);
    assert_eq!(*camera.projection_matrix(), expected);
}

#[test]
fn test_orthographic_zero_size_stays_finite() {
    let camera = CameraState::new(&CameraOptions::default(), true, Size::new(0, 0));
    assert!(camera.projection_matrix().is_finite());
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_updates_aspect() {
    let mut camera = default_camera(Size::new(800, 400));
    camera.resize(Size::new(400, 400));

    match camera.projection() {
        Projection::Perspective { aspect, .. } => assert_eq!(*aspect, 1.0),
        other => panic!("Expected perspective projection, got {:?}", other),
    }
}

#[test]
fn test_manual_camera_ignores_resize() {
    let options = CameraOptions { manual: true, ..CameraOptions::default() };
    let mut camera = CameraState::new(&options, false, Size::new(800, 400));
    let before = *camera.projection_matrix();

    camera.resize(Size::new(100, 900));

    assert!(camera.is_manual());
    assert_eq!(*camera.projection_matrix(), before);
}

#[test]
fn test_view_projection_matrix() {
    let camera = default_camera(Size::new(640, 480));
    assert_eq!(
        camera.view_projection_matrix(),
        *camera.projection_matrix() * *camera.view_matrix()
    );
}
