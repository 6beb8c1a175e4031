/// Backend module - drawing backend trait, renderer settings and the
/// headless backend

pub mod backend;
pub mod headless_backend;
pub mod settings;

pub use backend::*;
pub use headless_backend::{DrawRecord, FailPoint, HeadlessBackend, HeadlessStats};
pub use settings::{ColorSpace, RendererSettings, ToneMapping};
