//! Camera module: default camera derived from the root configuration

mod camera;

pub use camera::{CameraState, Projection};
