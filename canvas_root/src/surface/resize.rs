/// Debounced surface measurements.
///
/// Window systems report sizes far more often than a render target should be
/// reallocated. `ResizeDebouncer` applies the `resize-behavior` options: each
/// measurement restarts the delay of its cause, and the last measurement wins.

use std::time::{Duration, Instant};
use crate::config::ResizeOptions;
use super::Size;

/// What produced a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeCause {
    Resize,
    Scroll,
}

pub struct ResizeDebouncer {
    options: ResizeOptions,
    current: Option<Size>,
    pending: Option<(Size, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(options: ResizeOptions) -> Self {
        Self {
            options,
            current: None,
            pending: None,
        }
    }

    /// Replace the options; a pending measurement keeps its deadline
    pub fn set_options(&mut self, options: ResizeOptions) {
        self.options = options;
    }

    /// Last size handed out
    pub fn current(&self) -> Option<Size> {
        self.current
    }

    /// True while a measurement waits for its delay to elapse
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a measurement
    ///
    /// Returns the size immediately when its delay is zero, otherwise
    /// `None` and the size is released by a later `poll`.
    pub fn observe(&mut self, size: Size, cause: ResizeCause, now: Instant) -> Option<Size> {
        let delay_ms = match cause {
            ResizeCause::Resize => self.options.debounce.resize,
            ResizeCause::Scroll if self.options.scroll => self.options.debounce.scroll,
            ResizeCause::Scroll => return None,
        };

        if self.pending.is_none() && self.current == Some(size) {
            return None;
        }

        if delay_ms == 0 {
            self.pending = None;
            return self.commit(size);
        }

        self.pending = Some((size, now + Duration::from_millis(delay_ms as u64)));
        None
    }

    /// Release the pending measurement once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        match self.pending {
            Some((size, deadline)) if deadline <= now => {
                self.pending = None;
                self.commit(size)
            }
            _ => None,
        }
    }

    fn commit(&mut self, size: Size) -> Option<Size> {
        if self.current == Some(size) {
            return None;
        }
        self.current = Some(size);
        Some(size)
    }
}

#[cfg(test)]
#[path = "resize_tests.rs"]
mod tests;
