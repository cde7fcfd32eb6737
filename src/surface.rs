//! The platform seam.
//!
//! Everything the guard and the zoom controller do to a page goes through
//! [`Surface`]: event subscriptions, head observation, the viewport
//! declaration, and the root scale factor. Browser bindings implement it
//! against the real document; [`SimulatedSurface`] implements it in memory.

mod simulated;

use std::rc::Rc;

use crate::event::{Event, EventKind, ListenerOptions, ListenerTarget};
use crate::subscription::Subscription;

pub use simulated::{HeadLink, SimulatedSurface};

/// Callback invoked for each dispatched event.
pub type Handler = Rc<dyn Fn(&mut Event)>;

/// Callback invoked after the document head changes.
pub type HeadObserver = Rc<dyn Fn()>;

/// A document/viewport scope that interceptors and scaling apply to.
///
/// Implementations are single-threaded. Listeners for the same target and
/// kind must run in registration order.
pub trait Surface {
    /// Subscribes `handler` to `kind` events on `target`.
    ///
    /// Dropping or cancelling the returned token removes exactly this
    /// registration.
    fn listen(
        &self,
        target: ListenerTarget,
        kind: EventKind,
        options: ListenerOptions,
        handler: Handler,
    ) -> Subscription;

    /// Watches the document head for child changes.
    fn observe_head(&self, observer: HeadObserver) -> Subscription;

    /// Removes every app-manifest link from the head, returning how many.
    fn remove_manifest_links(&self) -> usize;

    /// Replaces the viewport declaration and returns the previous one.
    ///
    /// `None` removes the declaration.
    fn replace_viewport(&self, content: Option<String>) -> Option<String>;

    /// Sets the root-level scale factor. `None` restores the platform default.
    fn set_root_scale(&self, scale: Option<f64>);
}
