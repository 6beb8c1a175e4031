//! Surface module
//!
//! Caller-owned drawables a root binds to, and debounced size tracking.

mod resize;
mod surface;

pub use resize::{ResizeCause, ResizeDebouncer};
pub use surface::{HeadlessSurface, Size, Surface, SurfaceId};
