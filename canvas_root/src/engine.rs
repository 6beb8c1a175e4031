/// Canvas Engine - process-wide state shared by all roots
///
/// This module owns the two pieces of global state roots need: the table of
/// surfaces currently bound to a root, and the pluggable logger. Both live in
/// thread-safe static storage.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError, RwLock};
use std::time::SystemTime;
use rustc_hash::FxHashSet;
use crate::error::{Error, Result};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::surface::SurfaceId;

// ===== INTERNAL STATE =====

/// Surfaces currently bound to a live root
static SURFACE_BINDINGS: OnceLock<Mutex<FxHashSet<SurfaceId>>> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

// ===== PUBLIC API =====

/// Process-wide registry for roots
///
/// # Example
///
/// ```no_run
/// use canvas_root::canvas::{Engine, log::FacadeLogger};
///
/// // Route engine logs through the `log` facade
/// Engine::set_logger(FacadeLogger);
///
/// assert_eq!(Engine::bound_surface_count(), 0);
/// ```
pub struct Engine;

impl Engine {
    fn bindings() -> &'static Mutex<FxHashSet<SurfaceId>> {
        SURFACE_BINDINGS.get_or_init(|| Mutex::new(FxHashSet::default()))
    }

    fn logger() -> &'static RwLock<Box<dyn Logger>> {
        LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
    }

    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        crate::canvas_error!("canvas::Engine", "{}", error);
        error
    }

    // ===== SURFACE BINDINGS =====

    /// Claim a surface for a root
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSurface` if the surface is already bound.
    pub(crate) fn bind_surface(surface: SurfaceId) -> Result<()> {
        let mut bindings = Self::bindings()
            .lock()
            .map_err(|_| Self::log_and_return_error(
                Error::Backend("Surface binding lock poisoned".to_string())
            ))?;

        if !bindings.insert(surface) {
            return Err(Self::log_and_return_error(
                Error::InvalidSurface(format!("surface {:?} is already bound to another root", surface))
            ));
        }

        crate::canvas_debug!("canvas::Engine", "Bound surface {:?}", surface);
        Ok(())
    }

    /// Release a surface binding. Returns false if the surface was not bound.
    pub(crate) fn release_surface(surface: SurfaceId) -> bool {
        let released = Self::bindings()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&surface);

        if released {
            crate::canvas_debug!("canvas::Engine", "Released surface {:?}", surface);
        }
        released
    }

    fn bindings_snapshot() -> MutexGuard<'static, FxHashSet<SurfaceId>> {
        Self::bindings().lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True while a live root is bound to `surface`
    pub fn is_surface_bound(surface: SurfaceId) -> bool {
        Self::bindings_snapshot().contains(&surface)
    }

    /// Number of surfaces bound to live roots
    pub fn bound_surface_count() -> usize {
        Self::bindings_snapshot().len()
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger,
    /// `FacadeLogger`, test capture, etc.)
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = Self::logger().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = Self::logger().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like canvas_info!, canvas_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = Self::logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by canvas_error! and canvas_bail! to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = Self::logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
