//! In-memory surface.
//!
//! Used by tests and by headless hosts that want to drive the guard without
//! a browser. Dispatch follows the platform rules the guard relies on:
//! capture listeners run before bubble listeners, each group in
//! registration order, and a listener that stops propagation ends delivery.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{Handler, HeadObserver, Surface};
use crate::event::{Event, EventKind, ListenerOptions, ListenerTarget};
use crate::subscription::Subscription;

/// A `<link>` element in the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadLink {
    /// Space-separated `rel` tokens
    pub rel: String,
    /// Link target
    pub href: String,
}

impl HeadLink {
    /// Creates a link.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }

    /// Returns true if this link declares an app manifest.
    pub fn is_manifest(&self) -> bool {
        self.rel
            .split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("manifest"))
    }
}

struct Listener {
    id: u64,
    target: ListenerTarget,
    kind: EventKind,
    options: ListenerOptions,
    handler: Handler,
}

#[derive(Default)]
struct Inner {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Listener>>,
    observers: RefCell<Vec<(u64, HeadObserver)>>,
    head: RefCell<Vec<HeadLink>>,
    viewport: RefCell<Option<String>>,
    root_scale: Cell<Option<f64>>,
}

impl Inner {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn notify_head_observers(&self) {
        let observers: Vec<HeadObserver> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer();
        }
    }
}

/// A surface backed entirely by memory.
///
/// Clones share state, so a test can hand one clone to a guard and keep
/// another to dispatch events and inspect the result.
///
/// # Example
///
/// ```
/// use policy_guard::{Event, EventKind, ListenerTarget, SimulatedSurface};
///
/// let surface = SimulatedSurface::new();
/// let event = surface.dispatch(ListenerTarget::Document, Event::new(EventKind::DragStart));
/// assert!(!event.default_prevented());
/// ```
#[derive(Clone, Default)]
pub struct SimulatedSurface {
    inner: Rc<Inner>,
}

impl SimulatedSurface {
    /// Creates an empty surface with no viewport declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface with an initial viewport declaration.
    pub fn with_viewport(content: impl Into<String>) -> Self {
        let surface = Self::new();
        *surface.inner.viewport.borrow_mut() = Some(content.into());
        surface
    }

    /// Delivers an event to every matching listener and returns it.
    pub fn dispatch(&self, target: ListenerTarget, mut event: Event) -> Event {
        let handlers: Vec<Handler> = {
            let kind = event.kind();
            let listeners = self.inner.listeners.borrow();
            let (capture, bubble): (Vec<&Listener>, Vec<&Listener>) = listeners
                .iter()
                .filter(|l| l.target == target && l.kind == kind)
                .partition(|l| l.options.capture);
            capture
                .into_iter()
                .chain(bubble)
                .map(|l| Rc::clone(&l.handler))
                .collect()
        };

        for handler in handlers {
            if event.propagation_stopped() {
                break;
            }
            handler(&mut event);
        }
        event
    }

    /// Appends a link to the head and notifies observers.
    pub fn append_head_link(&self, link: HeadLink) {
        self.inner.head.borrow_mut().push(link);
        self.inner.notify_head_observers();
    }

    /// Returns a snapshot of the head links.
    pub fn head_links(&self) -> Vec<HeadLink> {
        self.inner.head.borrow().clone()
    }

    /// Returns the number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Returns the number of live listeners for one event kind.
    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }

    /// Returns the number of live head observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// Returns the current viewport declaration.
    pub fn viewport(&self) -> Option<String> {
        self.inner.viewport.borrow().clone()
    }

    /// Returns the current root scale factor, `None` meaning platform default.
    pub fn root_scale(&self) -> Option<f64> {
        self.inner.root_scale.get()
    }
}

impl Surface for SimulatedSurface {
    fn listen(
        &self,
        target: ListenerTarget,
        kind: EventKind,
        options: ListenerOptions,
        handler: Handler,
    ) -> Subscription {
        let id = self.inner.next_id();
        self.inner.listeners.borrow_mut().push(Listener {
            id,
            target,
            kind,
            options,
            handler,
        });

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|l| l.id != id);
            }
        })
    }

    fn observe_head(&self, observer: HeadObserver) -> Subscription {
        let id = self.inner.next_id();
        self.inner.observers.borrow_mut().push((id, observer));

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.observers.borrow_mut().retain(|(oid, _)| *oid != id);
            }
        })
    }

    fn remove_manifest_links(&self) -> usize {
        let removed = {
            let mut head = self.inner.head.borrow_mut();
            let before = head.len();
            head.retain(|link| !link.is_manifest());
            before - head.len()
        };
        if removed > 0 {
            self.inner.notify_head_observers();
        }
        removed
    }

    fn replace_viewport(&self, content: Option<String>) -> Option<String> {
        std::mem::replace(&mut *self.inner.viewport.borrow_mut(), content)
    }

    fn set_root_scale(&self, scale: Option<f64>) {
        self.inner.root_scale.set(scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Handler {
        let log = Rc::clone(log);
        Rc::new(move |_event: &mut Event| log.borrow_mut().push(name))
    }

    #[test]
    fn capture_listeners_run_first_in_registration_order() {
        let surface = SimulatedSurface::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let kind = EventKind::KeyDown;
        let doc = ListenerTarget::Document;

        let _a = surface.listen(doc, kind, ListenerOptions::bubble(), recorder(&log, "a"));
        let _b = surface.listen(doc, kind, ListenerOptions::capture(), recorder(&log, "b"));
        let _c = surface.listen(doc, kind, ListenerOptions::bubble(), recorder(&log, "c"));
        let _d = surface.listen(doc, kind, ListenerOptions::capture(), recorder(&log, "d"));

        surface.dispatch(doc, Event::new(kind));
        assert_eq!(*log.borrow(), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn stop_propagation_ends_delivery() {
        let surface = SimulatedSurface::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let doc = ListenerTarget::Document;

        let _stop = surface.listen(
            doc,
            EventKind::KeyDown,
            ListenerOptions::capture(),
            Rc::new(|event: &mut Event| event.stop_propagation()),
        );
        let _late = surface.listen(
            doc,
            EventKind::KeyDown,
            ListenerOptions::bubble(),
            recorder(&log, "late"),
        );

        let event = surface.dispatch(doc, Event::new(EventKind::KeyDown));
        assert!(event.propagation_stopped());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn listeners_only_see_their_target() {
        let surface = SimulatedSurface::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let _w = surface.listen(
            ListenerTarget::Window,
            EventKind::BeforePrint,
            ListenerOptions::bubble(),
            recorder(&log, "window"),
        );

        surface.dispatch(ListenerTarget::Document, Event::new(EventKind::BeforePrint));
        assert!(log.borrow().is_empty());
        surface.dispatch(ListenerTarget::Window, Event::new(EventKind::BeforePrint));
        assert_eq!(*log.borrow(), vec!["window"]);
    }

    #[test]
    fn cancelled_subscription_removes_only_its_listener() {
        let surface = SimulatedSurface::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let doc = ListenerTarget::Document;
        let drag = EventKind::DragStart;
        let first = surface.listen(doc, drag, ListenerOptions::bubble(), recorder(&log, "1"));
        let _second = surface.listen(doc, drag, ListenerOptions::bubble(), recorder(&log, "2"));

        first.cancel();
        assert_eq!(surface.listener_count(), 1);
        surface.dispatch(doc, Event::new(EventKind::DragStart));
        assert_eq!(*log.borrow(), vec!["2"]);
    }

    #[test]
    fn manifest_detection_reads_rel_tokens() {
        assert!(HeadLink::new("manifest", "/app.webmanifest").is_manifest());
        assert!(HeadLink::new("preload Manifest", "/m.json").is_manifest());
        assert!(!HeadLink::new("stylesheet", "/site.css").is_manifest());
    }

    #[test]
    fn head_observer_sees_appends() {
        let surface = SimulatedSurface::new();
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let _obs = surface.observe_head(Rc::new(move || s.set(s.get() + 1)));

        surface.append_head_link(HeadLink::new("icon", "/favicon.ico"));
        assert_eq!(seen.get(), 1);
        assert_eq!(surface.observer_count(), 1);
    }

    #[test]
    fn replace_viewport_returns_previous() {
        let surface = SimulatedSurface::with_viewport("width=device-width");
        let prev = surface.replace_viewport(Some("user-scalable=no".into()));
        assert_eq!(prev.as_deref(), Some("width=device-width"));
        assert_eq!(surface.viewport().as_deref(), Some("user-scalable=no"));
    }
}
