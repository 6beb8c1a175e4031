//! Root module
//!
//! The render root itself, its render target and per-frame subscribers.

mod frame;
mod render_target;
mod root;

pub use frame::{FrameCallback, FrameState, SubscriptionId};
pub use render_target::{Extent, RenderTarget};
pub use root::{Lifecycle, Root, MAX_PENDING_FRAMES};
