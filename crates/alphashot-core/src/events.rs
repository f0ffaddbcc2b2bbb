//! Pre- and post-capture notification points.
//!
//! External collaborators (screen effects, overlays) can register handlers
//! that run once per pipeline invocation: before the first pass renders and
//! after the last pass completes. A failing handler is logged and skipped;
//! it never aborts or rolls back the capture itself.

use std::fmt;

/// Error type handlers may return. Boxed so handlers can surface anything.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type Handler = Box<dyn FnMut() -> Result<(), HandlerError> + Send>;

/// Registry of pre- and post-capture handlers.
#[derive(Default)]
pub struct CaptureEvents {
    pre: Vec<Handler>,
    post: Vec<Handler>,
}

impl CaptureEvents {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler invoked once before each capture sequence.
    pub fn on_pre_capture<F>(&mut self, handler: F)
    where
        F: FnMut() -> Result<(), HandlerError> + Send + 'static,
    {
        self.pre.push(Box::new(handler));
    }

    /// Registers a handler invoked once after each capture sequence,
    /// whether it succeeded or failed.
    pub fn on_post_capture<F>(&mut self, handler: F)
    where
        F: FnMut() -> Result<(), HandlerError> + Send + 'static,
    {
        self.post.push(Box::new(handler));
    }

    /// Fires all pre-capture handlers. Failures are logged per handler.
    pub fn fire_pre_capture(&mut self) {
        Self::fire(&mut self.pre, "pre-capture");
    }

    /// Fires all post-capture handlers. Failures are logged per handler.
    pub fn fire_post_capture(&mut self) {
        Self::fire(&mut self.post, "post-capture");
    }

    fn fire(handlers: &mut [Handler], phase: &str) {
        for (i, handler) in handlers.iter_mut().enumerate() {
            if let Err(err) = handler() {
                log::error!("{phase} handler {i} failed: {err}");
            }
        }
    }
}

impl fmt::Debug for CaptureEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureEvents")
            .field("pre", &self.pre.len())
            .field("post", &self.post.len())
            .finish()
    }
}
