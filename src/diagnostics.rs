//! Record of interceptor decisions.
//!
//! This module provides:
//! - `GuardEvent`: One interceptor decision (what, which way, and why)
//! - `Outcome`: Whether the guard suppressed, allowed, or merely observed
//! - `DiagnosticsTrail`: In-memory recorder the guard writes into
//!
//! The trail is advisory. A `VisibilityWatch` entry means the surface was
//! hidden; it does not mean a capture was attempted or prevented.

mod event;
mod trail;

pub use event::{GuardEvent, Outcome};
pub use trail::DiagnosticsTrail;
