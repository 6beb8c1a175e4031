//! Render target of a root, the place its scene gets drawn
//!
//! Size and pixel ratio travel together as one `Extent` value, so a resize
//! replaces both in a single assignment.

use crate::backend::TargetId;
use crate::error::{Error, Result};
use crate::surface::{Size, SurfaceId};

/// Logical size plus resolved pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub size: Size,
    pub pixel_ratio: f64,
}

impl Extent {
    /// Size of the drawing buffer in device pixels
    pub fn drawing_buffer(&self) -> Size {
        self.size.scaled(self.pixel_ratio)
    }

    /// Fails with `Error::Configuration` when the drawing buffer would not
    /// fit in `u32` device pixels
    pub(crate) fn checked(self) -> Result<Self> {
        match self.size.checked_scaled(self.pixel_ratio) {
            Some(_) => Ok(self),
            None => Err(Error::Configuration(format!(
                "drawing buffer of {}x{} at pixel ratio {} exceeds u32 device pixels",
                self.size.width, self.size.height, self.pixel_ratio
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTarget {
    id: TargetId,
    surface: SurfaceId,
    extent: Extent,
}

impl RenderTarget {
    /// Created by `Root::create`
    pub(crate) fn new(id: TargetId, surface: SurfaceId, extent: Extent) -> Self {
        Self { id, surface, extent }
    }

    pub(crate) fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
    }

    /// Backend target id
    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn size(&self) -> Size {
        self.extent.size
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.extent.pixel_ratio
    }

    pub fn drawing_buffer_size(&self) -> Size {
        self.extent.drawing_buffer()
    }
}
