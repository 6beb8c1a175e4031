/*!
# Canvas Root

Lifecycle manager for render roots bound to caller-owned surfaces.

A root claims a surface (a window, an offscreen canvas), allocates a render
target on a drawing backend, mounts declarative scene trees on it, follows
configuration changes, and releases everything when it is unmounted or
dropped. Drawing, scene elements and input stay behind traits.

## Architecture

- **Root**: create / render / configure / unmount, plus frame ticks
- **Engine**: process-wide surface bindings and the pluggable logger
- **RootConfiguration / ConfigPatch**: typed configuration catalog with
  shallow-merge patches and JSON loading
- **Backend**: drawing backend trait, with a headless implementation
- **SceneTree / ElementRegistry**: declarative scenes and the tag registry
  backends instantiate them with
- **EventManager**: input collaborator connected to the bound surface

Everything is re-exported under the [`canvas`] namespace.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod backend;
pub mod camera;
pub mod config;
pub mod events;
pub mod root;
pub mod scene;
pub mod surface;

// Main canvas namespace module
pub mod canvas {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Root and its frame types
    pub use crate::root::{FrameState, Lifecycle, RenderTarget, Root, SubscriptionId};

    // Logging sub-module (types only, the canvas_* macros live at the crate root)
    pub mod log {
        pub use crate::log::{DefaultLogger, FacadeLogger, LogEntry, LogSeverity, Logger};
    }

    pub mod backend {
        pub use crate::backend::*;
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod config {
        pub use crate::config::*;
    }

    pub mod events {
        pub use crate::events::*;
    }

    pub mod root {
        pub use crate::root::*;
    }

    pub mod scene {
        pub use crate::scene::*;
    }

    pub mod surface {
        pub use crate::surface::*;
    }
}

// Re-export math library at crate root
pub use glam;
