//! Root configuration, partial patches and change sets
//!
//! `RootConfiguration` is the active, fully-populated configuration of a
//! root. `ConfigPatch` names only the keys a caller wants to change; merging a
//! patch replaces those top-level keys and leaves every other key untouched.

use std::fmt;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::events::{EventManager, PointerEvent};
use crate::root::Root;
use crate::surface::Size;
use super::options::{
    CameraOptions, Frameloop, PixelRatio, RaycasterOptions, RendererOptions, ResizeOptions, Shadows,
};

/// Callback fired once after the first successful render
pub type CreatedCallback = Box<dyn FnOnce(&Root) + Send>;

/// Callback fired when a pointer event hits nothing in the scene
pub type PointerMissedCallback = Box<dyn FnMut(&PointerEvent) + Send>;

/// Active configuration of a root
///
/// The field names follow the Rust side; the serialized keys follow the
/// configuration catalog (`renderer-options`, `pixel-ratio-bounds`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootConfiguration {
    #[serde(rename = "renderer-options")]
    pub renderer: RendererOptions,
    #[serde(rename = "camera-options")]
    pub camera: CameraOptions,
    pub shadows: Shadows,
    #[serde(rename = "raycaster-options")]
    pub raycaster: RaycasterOptions,
    pub frameloop: Frameloop,
    #[serde(rename = "resize-behavior")]
    pub resize: ResizeOptions,
    pub orthographic: bool,
    #[serde(rename = "pixel-ratio-bounds")]
    pub pixel_ratio: PixelRatio,
    /// Disables color management when set
    #[serde(rename = "color-management-mode")]
    pub legacy: bool,
    /// Output in linear color space instead of sRGB
    #[serde(rename = "linear-color-space")]
    pub linear: bool,
    /// Disables tone mapping
    #[serde(rename = "flat-tone-mapping")]
    pub flat: bool,
    #[serde(rename = "events-enabled")]
    pub events_enabled: bool,
    /// Explicit logical size overriding the surface measurement
    pub size: Option<Size>,
}

impl Default for RootConfiguration {
    fn default() -> Self {
        Self {
            renderer: RendererOptions::default(),
            camera: CameraOptions::default(),
            shadows: Shadows::default(),
            raycaster: RaycasterOptions::default(),
            frameloop: Frameloop::default(),
            resize: ResizeOptions::default(),
            orthographic: false,
            pixel_ratio: PixelRatio::default(),
            legacy: false,
            linear: false,
            flat: false,
            events_enabled: true,
            size: None,
        }
    }
}

bitflags! {
    /// Keys whose value changed during a merge
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigChanges: u32 {
        const RENDERER = 1 << 0;
        const CAMERA = 1 << 1;
        const SHADOWS = 1 << 2;
        const RAYCASTER = 1 << 3;
        const FRAMELOOP = 1 << 4;
        const RESIZE = 1 << 5;
        const ORTHOGRAPHIC = 1 << 6;
        const PIXEL_RATIO = 1 << 7;
        const COLOR = 1 << 8;
        const EVENTS = 1 << 9;
        const SIZE = 1 << 10;

        /// Changes that resize the render target
        const TARGET = Self::SIZE.bits() | Self::PIXEL_RATIO.bits();
        /// Changes that alter backend renderer settings
        const SETTINGS = Self::RENDERER.bits() | Self::SHADOWS.bits() | Self::COLOR.bits();
        /// Changes that recompute the default camera
        const PROJECTION = Self::CAMERA.bits() | Self::ORTHOGRAPHIC.bits() | Self::SIZE.bits();
    }
}

impl RootConfiguration {
    /// Shallow-merge a patch, returning the candidate configuration and the
    /// set of keys whose value actually changed. `self` is left untouched.
    pub fn merged(&self, patch: &ConfigPatch) -> (RootConfiguration, ConfigChanges) {
        let mut next = self.clone();
        let mut changes = ConfigChanges::empty();

        macro_rules! merge_key {
            ($field:ident, $flag:ident) => {
                if let Some(value) = patch.$field {
                    if next.$field != value {
                        changes |= ConfigChanges::$flag;
                    }
                    next.$field = value;
                }
            };
        }

        merge_key!(renderer, RENDERER);
        merge_key!(camera, CAMERA);
        merge_key!(shadows, SHADOWS);
        merge_key!(raycaster, RAYCASTER);
        merge_key!(frameloop, FRAMELOOP);
        merge_key!(resize, RESIZE);
        merge_key!(orthographic, ORTHOGRAPHIC);
        merge_key!(pixel_ratio, PIXEL_RATIO);
        merge_key!(legacy, COLOR);
        merge_key!(linear, COLOR);
        merge_key!(flat, COLOR);
        merge_key!(events_enabled, EVENTS);

        if let Some(size) = patch.size {
            if next.size != Some(size) {
                changes |= ConfigChanges::SIZE;
            }
            next.size = Some(size);
        }

        (next, changes)
    }

    /// Check value ranges that the type system cannot express
    pub fn validate(&self) -> Result<()> {
        match self.pixel_ratio {
            PixelRatio::Fixed(ratio) if !(ratio.is_finite() && ratio > 0.0) => {
                return Err(Error::Configuration(format!(
                    "pixel-ratio-bounds must be positive, got {}", ratio
                )));
            }
            PixelRatio::Range(min, max) if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) => {
                return Err(Error::Configuration(format!(
                    "pixel-ratio-bounds must satisfy 0 < min <= max, got [{}, {}]", min, max
                )));
            }
            _ => {}
        }

        let camera = &self.camera;
        if !self.orthographic && !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(Error::Configuration(format!(
                "camera-options.fov must be in (0, 180), got {}", camera.fov
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(Error::Configuration(format!(
                "camera-options must satisfy 0 < near < far, got near={} far={}", camera.near, camera.far
            )));
        }
        if !(camera.zoom > 0.0) {
            return Err(Error::Configuration(format!(
                "camera-options.zoom must be positive, got {}", camera.zoom
            )));
        }
        if camera.position.iter().any(|c| !c.is_finite()) {
            return Err(Error::Configuration("camera-options.position must be finite".to_string()));
        }
        // The default camera looks at the origin
        if camera.position.iter().all(|&c| c == 0.0) {
            return Err(Error::Configuration(
                "camera-options.position must not be the origin".to_string(),
            ));
        }

        let raycaster = &self.raycaster;
        if !(raycaster.near >= 0.0) {
            return Err(Error::Configuration(format!(
                "raycaster-options.near must be non-negative, got {}", raycaster.near
            )));
        }
        if let Some(far) = raycaster.far {
            if !(far > raycaster.near) {
                return Err(Error::Configuration(format!(
                    "raycaster-options.far must exceed near, got near={} far={}", raycaster.near, far
                )));
            }
        }

        Ok(())
    }
}

/// Partial configuration
///
/// Data keys can be set through the builder methods or parsed from JSON with
/// [`ConfigPatch::from_json`]. Collaborator and callback keys (`events`,
/// `on-created`, `on-pointer-missed`) can only be set through the builder.
///
/// # Example
///
/// ```
/// use canvas_root::canvas::config::ConfigPatch;
///
/// let _patch = ConfigPatch::from_json(r#"{ "frameloop": "demand", "shadows": true }"#)?
///     .orthographic(true);
/// # Ok::<(), canvas_root::canvas::Error>(())
/// ```
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigPatch {
    #[serde(rename = "renderer-options")]
    pub(crate) renderer: Option<RendererOptions>,
    #[serde(rename = "camera-options")]
    pub(crate) camera: Option<CameraOptions>,
    pub(crate) shadows: Option<Shadows>,
    #[serde(rename = "raycaster-options")]
    pub(crate) raycaster: Option<RaycasterOptions>,
    pub(crate) frameloop: Option<Frameloop>,
    #[serde(rename = "resize-behavior")]
    pub(crate) resize: Option<ResizeOptions>,
    pub(crate) orthographic: Option<bool>,
    #[serde(rename = "pixel-ratio-bounds")]
    pub(crate) pixel_ratio: Option<PixelRatio>,
    #[serde(rename = "color-management-mode")]
    pub(crate) legacy: Option<bool>,
    #[serde(rename = "linear-color-space")]
    pub(crate) linear: Option<bool>,
    #[serde(rename = "flat-tone-mapping")]
    pub(crate) flat: Option<bool>,
    #[serde(rename = "events-enabled")]
    pub(crate) events_enabled: Option<bool>,
    pub(crate) size: Option<Size>,

    #[serde(skip)]
    pub(crate) events: Option<Box<dyn EventManager>>,
    #[serde(skip)]
    pub(crate) on_created: Option<CreatedCallback>,
    #[serde(skip)]
    pub(crate) on_pointer_missed: Option<PointerMissedCallback>,
}

impl ConfigPatch {
    /// Empty patch (keeps every default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a patch from a JSON object
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for unknown keys, mistyped values or
    /// malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a patch from an already-decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// True when the patch names no key at all
    pub fn is_empty(&self) -> bool {
        self.renderer.is_none()
            && self.camera.is_none()
            && self.shadows.is_none()
            && self.raycaster.is_none()
            && self.frameloop.is_none()
            && self.resize.is_none()
            && self.orthographic.is_none()
            && self.pixel_ratio.is_none()
            && self.legacy.is_none()
            && self.linear.is_none()
            && self.flat.is_none()
            && self.events_enabled.is_none()
            && self.size.is_none()
            && self.events.is_none()
            && self.on_created.is_none()
            && self.on_pointer_missed.is_none()
    }

    // ===== DATA KEYS =====

    pub fn renderer(mut self, options: RendererOptions) -> Self {
        self.renderer = Some(options);
        self
    }

    pub fn camera(mut self, options: CameraOptions) -> Self {
        self.camera = Some(options);
        self
    }

    pub fn shadows(mut self, shadows: Shadows) -> Self {
        self.shadows = Some(shadows);
        self
    }

    pub fn raycaster(mut self, options: RaycasterOptions) -> Self {
        self.raycaster = Some(options);
        self
    }

    pub fn frameloop(mut self, frameloop: Frameloop) -> Self {
        self.frameloop = Some(frameloop);
        self
    }

    pub fn resize(mut self, options: ResizeOptions) -> Self {
        self.resize = Some(options);
        self
    }

    pub fn orthographic(mut self, orthographic: bool) -> Self {
        self.orthographic = Some(orthographic);
        self
    }

    pub fn pixel_ratio(mut self, pixel_ratio: PixelRatio) -> Self {
        self.pixel_ratio = Some(pixel_ratio);
        self
    }

    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = Some(legacy);
        self
    }

    pub fn linear(mut self, linear: bool) -> Self {
        self.linear = Some(linear);
        self
    }

    pub fn flat(mut self, flat: bool) -> Self {
        self.flat = Some(flat);
        self
    }

    pub fn events_enabled(mut self, enabled: bool) -> Self {
        self.events_enabled = Some(enabled);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    // ===== COLLABORATORS & CALLBACKS =====

    /// Attach the event collaborator
    pub fn events<E: EventManager + 'static>(mut self, events: E) -> Self {
        self.events = Some(Box::new(events));
        self
    }

    pub fn on_created<F: FnOnce(&Root) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_created = Some(Box::new(callback));
        self
    }

    pub fn on_pointer_missed<F: FnMut(&PointerEvent) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_pointer_missed = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for ConfigPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigPatch")
            .field("renderer", &self.renderer)
            .field("camera", &self.camera)
            .field("shadows", &self.shadows)
            .field("raycaster", &self.raycaster)
            .field("frameloop", &self.frameloop)
            .field("resize", &self.resize)
            .field("orthographic", &self.orthographic)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("legacy", &self.legacy)
            .field("linear", &self.linear)
            .field("flat", &self.flat)
            .field("events_enabled", &self.events_enabled)
            .field("size", &self.size)
            .field("events", &self.events.is_some())
            .field("on_created", &self.on_created.is_some())
            .field("on_pointer_missed", &self.on_pointer_missed.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "configuration_tests.rs"]
mod tests;
