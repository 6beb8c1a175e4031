//! Event collaborator interface
//!
//! Roots do not translate input themselves. An `EventManager` supplied via
//! the configuration is connected to the bound surface, kept informed of
//! the mounted scene for hit testing, and disconnected at unmount.

use crate::scene::SceneTree;
use crate::surface::SurfaceId;

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

/// Pointer event in logical surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub button: Option<PointerButton>,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, button: None }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }
}

/// Input collaborator attached to a root
pub trait EventManager: Send {
    /// Start receiving input from a surface
    fn connect(&mut self, surface: SurfaceId);

    /// Stop receiving input
    fn disconnect(&mut self);

    /// The mounted scene changed; hit tests run against `scene` from now on
    fn update_scene(&mut self, _scene: &SceneTree) {}

    fn is_connected(&self) -> bool;
}
