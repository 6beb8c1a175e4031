/// Surface binding types.
///
/// A surface is the caller-owned drawable a root renders into (a window, an
/// offscreen canvas). Roots never allocate or destroy surfaces; they only
/// bind to them through a stable `SurfaceId`.

use std::hash::{Hash, Hasher};
use std::num::NonZeroU64;
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use winit::window::Window;

/// Stable identity of a drawable surface
///
/// Zero is reserved for the null handle, so a `SurfaceId` always refers to
/// something a root can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(NonZeroU64);

impl SurfaceId {
    /// Build an id from a raw value. Returns `None` for the null handle (0).
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Derive an id from a platform window handle
    pub fn from_raw_window_handle(handle: RawWindowHandle) -> Self {
        let mut hasher = FxHasher::default();
        handle.hash(&mut hasher);
        let hash = hasher.finish();
        Self(NonZeroU64::new(hash).unwrap_or(NonZeroU64::MIN))
    }

    /// Raw id value
    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

/// Logical size in CSS-style pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height, or 1.0 for a collapsed surface
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Size in device pixels for the given pixel ratio
    ///
    /// Saturates at `u32::MAX`; use `checked_scaled` where an overflow must
    /// be reported.
    pub fn scaled(&self, pixel_ratio: f64) -> Size {
        Size {
            width: (self.width as f64 * pixel_ratio).round() as u32,
            height: (self.height as f64 * pixel_ratio).round() as u32,
        }
    }

    /// Size in device pixels, or `None` if a dimension does not fit in `u32`
    pub fn checked_scaled(&self, pixel_ratio: f64) -> Option<Size> {
        let scale = |logical: u32| {
            let device = (logical as f64 * pixel_ratio).round();
            (device.is_finite() && device >= 0.0 && device <= u32::MAX as f64).then_some(device as u32)
        };
        Some(Size {
            width: scale(self.width)?,
            height: scale(self.height)?,
        })
    }
}

/// A drawable surface a root can bind to
pub trait Surface {
    /// Identity of the surface, or `None` for a null handle
    fn surface_id(&self) -> Option<SurfaceId>;

    /// Current logical size
    fn logical_size(&self) -> Size;

    /// Device pixels per logical pixel
    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }
}

impl Surface for Window {
    fn surface_id(&self) -> Option<SurfaceId> {
        let handle = self.window_handle().ok()?;
        Some(SurfaceId::from_raw_window_handle(handle.as_raw()))
    }

    fn logical_size(&self) -> Size {
        let logical = self.inner_size().to_logical::<f64>(self.scale_factor());
        Size::new(logical.width.round() as u32, logical.height.round() as u32)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.scale_factor()
    }
}

/// Surface without a platform window (tests, offscreen rendering)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessSurface {
    id: Option<SurfaceId>,
    size: Size,
    device_pixel_ratio: f64,
}

impl HeadlessSurface {
    /// Create a headless surface. An `id` of 0 yields a null surface.
    pub fn new(id: u64, width: u32, height: u32) -> Self {
        Self {
            id: SurfaceId::new(id),
            size: Size::new(width, height),
            device_pixel_ratio: 1.0,
        }
    }

    /// A surface whose handle is null
    pub fn null() -> Self {
        Self::new(0, 0, 0)
    }

    /// Set the device pixel ratio reported to roots
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }
}

impl Surface for HeadlessSurface {
    fn surface_id(&self) -> Option<SurfaceId> {
        self.id
    }

    fn logical_size(&self) -> Size {
        self.size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod tests;
