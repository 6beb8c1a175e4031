//! Typed option groups of a root configuration
//!
//! Every group carries the documented default through `Default`, and
//! deserializes with struct-level defaults so a JSON patch may name only the
//! fields it changes inside a group.

use serde::{Deserialize, Serialize};

/// GPU power preference hint passed to the drawing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    Default,
    #[default]
    HighPerformance,
    LowPower,
}

/// Options passed through to the drawing backend when the target is created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct RendererOptions {
    pub alpha: bool,
    pub antialias: bool,
    pub depth: bool,
    pub stencil: bool,
    pub power_preference: PowerPreference,
    pub preserve_drawing_buffer: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            alpha: true,
            antialias: true,
            depth: true,
            stencil: false,
            power_preference: PowerPreference::HighPerformance,
            preserve_drawing_buffer: false,
        }
    }
}

/// Default camera parameters
///
/// `manual` keeps the projection untouched on resize, for callers that drive
/// the camera themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct CameraOptions {
    /// Vertical field of view in degrees (perspective only)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    /// Orthographic zoom factor
    pub zoom: f32,
    pub manual: bool,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 5.0],
            zoom: 1.0,
            manual: false,
        }
    }
}

/// Shadow map algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadowMapType {
    Basic,
    Pcf,
    PcfSoft,
    Vsm,
}

/// `shadows` key: a plain toggle or an explicit map type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Shadows {
    Toggle(bool),
    Map(ShadowMapType),
}

impl Default for Shadows {
    fn default() -> Self {
        Shadows::Toggle(false)
    }
}

impl Shadows {
    /// Shadow map type in effect, `None` when shadows are disabled
    pub fn map_type(&self) -> Option<ShadowMapType> {
        match self {
            Shadows::Toggle(false) => None,
            Shadows::Toggle(true) => Some(ShadowMapType::PcfSoft),
            Shadows::Map(map) => Some(*map),
        }
    }
}

/// Picking ray parameters forwarded to the event system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct RaycasterOptions {
    pub near: f32,
    /// `None` casts to infinity
    pub far: Option<f32>,
    pub line_threshold: f32,
    pub points_threshold: f32,
}

impl Default for RaycasterOptions {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: None,
            line_threshold: 1.0,
            points_threshold: 1.0,
        }
    }
}

/// Redraw policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frameloop {
    /// Redraw on every external tick
    #[default]
    Always,
    /// Redraw only when state changed or a frame was invalidated
    Demand,
    /// Redraw only on an explicit `advance`
    Never,
}

/// Debounce delays in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebounceOptions {
    pub scroll: u32,
    pub resize: u32,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self { scroll: 50, resize: 0 }
    }
}

/// How surface measurements are turned into resizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ResizeOptions {
    /// Track scroll-induced position changes
    pub scroll: bool,
    pub debounce: DebounceOptions,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            scroll: true,
            debounce: DebounceOptions::default(),
        }
    }
}

/// `pixel-ratio-bounds` key: a fixed ratio or a `[min, max]` clamp of the
/// device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PixelRatio {
    Fixed(f64),
    Range(f64, f64),
}

impl Default for PixelRatio {
    fn default() -> Self {
        PixelRatio::Range(1.0, 2.0)
    }
}

impl PixelRatio {
    /// Resolve against the device pixel ratio reported by the surface
    pub fn resolve(&self, device_pixel_ratio: f64) -> f64 {
        match *self {
            PixelRatio::Fixed(ratio) => ratio,
            PixelRatio::Range(min, max) => device_pixel_ratio.max(min).min(max),
        }
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
