//! Root configuration module
//!
//! Typed configuration catalog with documented defaults, partial patches
//! (shallow merge) and JSON loading with strict key checking.

mod configuration;
mod options;

pub use configuration::{
    ConfigChanges, ConfigPatch, CreatedCallback, PointerMissedCallback, RootConfiguration,
};
pub use options::{
    CameraOptions, DebounceOptions, Frameloop, PixelRatio, PowerPreference, RaycasterOptions,
    RendererOptions, ResizeOptions, ShadowMapType, Shadows,
};
