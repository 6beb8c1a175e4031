/// Default camera of a root.
///
/// Built from `camera-options` and the render target size. The camera looks
/// from its configured position toward the origin; perspective cameras keep
/// their aspect ratio in sync with the target, orthographic cameras map one
/// world unit to one logical pixel (divided by zoom).

use glam::{Mat4, Vec3};
use crate::config::CameraOptions;
use crate::surface::Size;

/// Projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
        zoom: f32,
    },
}

impl Projection {
    fn for_size(options: &CameraOptions, orthographic: bool, size: Size) -> Self {
        if orthographic {
            let half_width = size.width.max(1) as f32 / 2.0;
            let half_height = size.height.max(1) as f32 / 2.0;
            Projection::Orthographic {
                left: -half_width,
                right: half_width,
                top: half_height,
                bottom: -half_height,
                near: options.near,
                far: options.far,
                zoom: options.zoom,
            }
        } else {
            Projection::Perspective {
                fov: options.fov,
                aspect: size.aspect(),
                near: options.near,
                far: options.far,
            }
        }
    }

    fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective { fov, aspect, near, far } => {
                Mat4::perspective_rh(fov.to_radians(), aspect, near, far)
            }
            Projection::Orthographic { left, right, top, bottom, near, far, zoom } => {
                Mat4::orthographic_rh(left / zoom, right / zoom, bottom / zoom, top / zoom, near, far)
            }
        }
    }
}

/// Camera state computed for the current configuration and size
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    projection: Projection,
    position: Vec3,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    options: CameraOptions,
    orthographic: bool,
}

impl CameraState {
    pub fn new(options: &CameraOptions, orthographic: bool, size: Size) -> Self {
        let position = Vec3::from_array(options.position);
        let projection = Projection::for_size(options, orthographic, size);
        Self {
            projection,
            position,
            view_matrix: Self::look_at_origin(position),
            projection_matrix: projection.matrix(),
            options: *options,
            orthographic,
        }
    }

    /// Follow a render target resize. Manual cameras keep their projection.
    pub fn resize(&mut self, size: Size) {
        if self.options.manual {
            return;
        }
        self.projection = Projection::for_size(&self.options, self.orthographic, size);
        self.projection_matrix = self.projection.matrix();
    }

    fn look_at_origin(position: Vec3) -> Mat4 {
        // Looking straight down the up axis would make look_at degenerate.
        let up = if position.cross(Vec3::Y).length_squared() < f32::EPSILON {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(position, Vec3::ZERO, up)
    }

    // ===== GETTERS =====

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn is_orthographic(&self) -> bool {
        self.orthographic
    }

    pub fn is_manual(&self) -> bool {
        self.options.manual
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
