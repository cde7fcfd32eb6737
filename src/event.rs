//! Platform event model.
//!
//! A [`Surface`](crate::Surface) hands interceptors an [`Event`] carrying
//! everything they need to decide: the event kind, the target's ancestry
//! (target first, root last), and kind-specific detail. Interceptors signal
//! their decision through [`Event::prevent_default`] and
//! [`Event::stop_propagation`].

use std::collections::BTreeMap;

/// Event kinds the guard subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The "add to home screen" install prompt signal
    BeforeInstallPrompt,
    /// Right-click or long-press menu request
    ContextMenu,
    /// Key press
    KeyDown,
    /// Start of a drag operation
    DragStart,
    /// Touch contact begins
    TouchStart,
    /// Touch contact moves
    TouchMove,
    /// Touch contact ends
    TouchEnd,
    /// Platform pinch/rotate gesture begins
    GestureStart,
    /// Platform gesture updates
    GestureChange,
    /// Platform gesture ends
    GestureEnd,
    /// The pre-print signal
    BeforePrint,
    /// The surface was shown or hidden
    VisibilityChange,
}

impl EventKind {
    /// Returns the platform name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::BeforeInstallPrompt => "beforeinstallprompt",
            EventKind::ContextMenu => "contextmenu",
            EventKind::KeyDown => "keydown",
            EventKind::DragStart => "dragstart",
            EventKind::TouchStart => "touchstart",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
            EventKind::GestureStart => "gesturestart",
            EventKind::GestureChange => "gesturechange",
            EventKind::GestureEnd => "gestureend",
            EventKind::BeforePrint => "beforeprint",
            EventKind::VisibilityChange => "visibilitychange",
        }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// The top-level window
    Window,
    /// The document
    Document,
}

/// Registration flags for a listener.
///
/// Listeners are always cancelable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Run during the capture phase, ahead of bubbling listeners
    pub capture: bool,
}

impl ListenerOptions {
    /// Bubble phase, cancelable.
    pub fn bubble() -> Self {
        Self::default()
    }

    /// Capture phase, cancelable.
    pub fn capture() -> Self {
        Self { capture: true }
    }
}

/// A node on the event path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    tag: String,
    attributes: BTreeMap<String, String>,
}

impl ElementInfo {
    /// Creates an element with a lowercased tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute. Names are stored lowercased.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Returns the lowercased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns an attribute value, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns true if the attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// Key state for a [`EventKind::KeyDown`] event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyInfo {
    /// Key value as reported by the platform ("s", "S", "F12", ...)
    pub key: String,
    /// Control held
    pub ctrl: bool,
    /// Meta/Command held
    pub meta: bool,
    /// Shift held
    pub shift: bool,
    /// Alt/Option held
    pub alt: bool,
}

impl KeyInfo {
    /// A key press with no modifiers.
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// A key press with Control held.
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: true,
            ..Self::default()
        }
    }

    /// Adds Shift.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Adds Meta.
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

/// Kind-specific event payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventDetail {
    /// No extra detail
    #[default]
    None,
    /// Keyboard state
    Key(KeyInfo),
    /// Number of active touch points
    Touch {
        /// Active touch points
        touches: u32,
    },
    /// Visibility after the change
    Visibility {
        /// True if the surface is now hidden
        hidden: bool,
    },
}

/// A dispatched platform event.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    path: Vec<ElementInfo>,
    detail: EventDetail,
    timestamp_ms: u64,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Creates an event with no target and no detail.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
            detail: EventDetail::None,
            timestamp_ms: 0,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// A key press event.
    pub fn key_down(key: KeyInfo) -> Self {
        Self::new(EventKind::KeyDown).with_detail(EventDetail::Key(key))
    }

    /// A touch event with the given number of touch points.
    pub fn touch(kind: EventKind, touches: u32) -> Self {
        Self::new(kind).with_detail(EventDetail::Touch { touches })
    }

    /// A visibility change event.
    pub fn visibility(hidden: bool) -> Self {
        Self::new(EventKind::VisibilityChange).with_detail(EventDetail::Visibility { hidden })
    }

    /// Sets the event path, target first.
    pub fn with_path(mut self, path: Vec<ElementInfo>) -> Self {
        self.path = path;
        self
    }

    /// Sets the kind-specific detail.
    pub fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Sets the platform timestamp.
    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Returns the event kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns the target element, if any.
    pub fn target(&self) -> Option<&ElementInfo> {
        self.path.first()
    }

    /// Returns the target and its ancestors, target first.
    pub fn path(&self) -> &[ElementInfo] {
        &self.path
    }

    /// Returns the kind-specific detail.
    pub fn detail(&self) -> &EventDetail {
        &self.detail
    }

    /// Returns the platform timestamp in milliseconds.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Cancels the platform default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stops delivery to any later listener.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Returns true if some listener cancelled the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Returns true if some listener stopped propagation.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_tag_and_attributes_are_case_insensitive() {
        let el = ElementInfo::new("INPUT").with_attribute("Type", "text");
        assert_eq!(el.tag(), "input");
        assert_eq!(el.attribute("type"), Some("text"));
        assert!(el.has_attribute("TYPE"));
    }

    #[test]
    fn event_flags_start_clear() {
        let mut event = Event::new(EventKind::DragStart);
        assert!(!event.default_prevented());
        assert!(!event.propagation_stopped());
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn listener_options_only_choose_phase() {
        assert_eq!(ListenerOptions::bubble(), ListenerOptions { capture: false });
        assert_eq!(ListenerOptions::capture(), ListenerOptions { capture: true });
    }

    #[test]
    fn target_is_first_path_entry() {
        let event = Event::new(EventKind::ContextMenu)
            .with_path(vec![ElementInfo::new("img"), ElementInfo::new("body")]);
        assert_eq!(event.target().map(ElementInfo::tag), Some("img"));
    }
}
