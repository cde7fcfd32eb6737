//! Document policy guard and persisted viewport zoom.
//!
//! This crate provides the two pieces of a presentation surface that carry
//! real lifecycle:
//! - **Policy guard**: Installs interceptors that suppress save, print,
//!   inspect, drag, incidental zoom, and install prompts, and removes all of
//!   them again on teardown
//! - **Zoom controller**: Owns a clamped, persisted zoom percentage and
//!   applies it as the root scale factor
//!
//! Both talk to the page only through the [`Surface`] trait, so they run
//! the same against a browser binding or the in-memory
//! [`SimulatedSurface`].
//!
//! # Core Types
//!
//! - [`PolicyGuard`]: Per-surface guard with an `activate`/`deactivate` lifecycle
//! - [`PolicyKind`] / [`PolicySet`]: The ten interceptor categories
//! - [`ZoomController`] / [`ZoomLevel`]: Clamped zoom with best-effort persistence
//! - [`Surface`] / [`Subscription`]: The platform seam and its unsubscribe token
//! - [`PreferenceStore`]: Key-value storage for the zoom preference
//!
//! # Exempt regions
//!
//! Any subtree carrying the exemption marker (`data-allow-zoom` by default,
//! see [`GuardConfig`]) keeps native pinch, gesture, and double-tap zoom.
//! The guard checks the marker before it suppresses anything.
//!
//! # What the guard cannot do
//!
//! Screenshots, the print-screen key, and OS-level shortcuts never reach a
//! surface. The guard does not claim to block them and exposes nothing that
//! reports on them; the visibility watch only records that the surface was
//! hidden.
//!
//! # Examples
//!
//! ```
//! use policy_guard::{
//!     ElementInfo, Event, EventKind, ListenerTarget, MemoryStore, PolicyGuard,
//!     SimulatedSurface, ZoomController,
//! };
//!
//! let surface = SimulatedSurface::new();
//! let mut zoom = ZoomController::new(surface.clone(), MemoryStore::new());
//! let mut guard = PolicyGuard::new(surface.clone());
//! guard.activate();
//!
//! // Pinch outside an exempt region is suppressed...
//! let pinch = Event::touch(EventKind::TouchMove, 2).with_path(vec![ElementInfo::new("div")]);
//! assert!(surface.dispatch(ListenerTarget::Document, pinch).default_prevented());
//!
//! // ...while the controller still changes scale on request.
//! zoom.set_zoom(130);
//! assert_eq!(surface.root_scale(), Some(1.3));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod diagnostics;
mod error;
mod event;
mod guard;
mod logging;
mod policy;
pub mod rules;
mod store;
mod subscription;
mod surface;
mod zoom;

pub use config::{
    GuardConfig, DEFAULT_DIAGNOSTICS_CAPACITY, DEFAULT_DOUBLE_TAP_WINDOW_MS,
    DEFAULT_EXEMPT_MARKER, DEFAULT_LOCKED_VIEWPORT,
};
pub use error::{ConfigError, Error, StoreError};
pub use event::{
    ElementInfo, Event, EventDetail, EventKind, KeyInfo, ListenerOptions, ListenerTarget,
};
pub use guard::PolicyGuard;
pub use logging::SurfaceLog;
pub use policy::{PolicyKind, PolicySet};
pub use store::{JsonFileStore, MemoryStore, PreferenceStore};
pub use subscription::Subscription;
pub use surface::{Handler, HeadLink, HeadObserver, SimulatedSurface, Surface};
pub use zoom::{
    ZoomController, ZoomLevel, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP, ZOOM_STORAGE_KEY,
};
