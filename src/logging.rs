use std::fmt;
use std::rc::Rc;

/// A logging handle tagged with the surface it belongs to.
///
/// Interceptors run long after activation returns, so the handle owns its
/// label and is cheap to clone into every handler.
///
/// All log messages automatically include the surface label.
#[derive(Debug, Clone)]
pub struct SurfaceLog {
    surface: Rc<str>,
}

impl SurfaceLog {
    /// Creates a new log handle for the labelled surface.
    pub fn new(surface: &str) -> Self {
        Self {
            surface: Rc::from(surface),
        }
    }

    /// Returns the surface label associated with this logger.
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Logs an info-level message with the surface label.
    ///
    /// Use with `format_args!` for efficient formatting:
    /// ```no_run
    /// # use policy_guard::SurfaceLog;
    /// let log = SurfaceLog::new("root");
    /// log.info(format_args!("zoom set to {}%", 110));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(surface = %self.surface, "{}", args);
    }

    /// Logs a warning-level message with the surface label.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(surface = %self.surface, "{}", args);
    }

    /// Logs a debug-level message with the surface label.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(surface = %self.surface, "{}", args);
    }
}
