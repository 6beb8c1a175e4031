/// Renderer settings derived from a root configuration.
///
/// Backends never see the configuration catalog itself; they receive this
/// flattened view with shadow, color-management and tone-mapping decisions
/// already resolved.

use crate::config::{PowerPreference, RootConfiguration, ShadowMapType};

/// Output color space of the drawing buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Srgb,
    Linear,
}

/// Tone mapping operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneMapping {
    None,
    AcesFilmic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererSettings {
    pub alpha: bool,
    pub antialias: bool,
    pub depth: bool,
    pub stencil: bool,
    pub power_preference: PowerPreference,
    pub preserve_drawing_buffer: bool,
    /// `None` disables the shadow map
    pub shadow_map: Option<ShadowMapType>,
    pub color_management: bool,
    pub output_color_space: ColorSpace,
    pub tone_mapping: ToneMapping,
}

impl From<&RootConfiguration> for RendererSettings {
    fn from(config: &RootConfiguration) -> Self {
        let renderer = &config.renderer;
        Self {
            alpha: renderer.alpha,
            antialias: renderer.antialias,
            depth: renderer.depth,
            stencil: renderer.stencil,
            power_preference: renderer.power_preference,
            preserve_drawing_buffer: renderer.preserve_drawing_buffer,
            shadow_map: config.shadows.map_type(),
            color_management: !config.legacy,
            output_color_space: if config.linear { ColorSpace::Linear } else { ColorSpace::Srgb },
            tone_mapping: if config.flat { ToneMapping::None } else { ToneMapping::AcesFilmic },
        }
    }
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self::from(&RootConfiguration::default())
    }
}
