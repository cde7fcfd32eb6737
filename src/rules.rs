//! Decision rules shared by the interceptors.
//!
//! These are pure functions over the event model so each rule can be tested
//! without a surface. The guard wires them to subscriptions.

use std::fmt;

use crate::event::{ElementInfo, Event, KeyInfo};

/// Input types whose value is free text.
const TEXT_INPUT_TYPES: [&str; 8] = [
    "text", "search", "email", "url", "tel", "password", "number", "",
];

/// Returns true if the element accepts typed or pasted text.
///
/// Covers `<textarea>`, text-like `<input>` types, and `contenteditable`
/// elements other than `contenteditable="false"`.
pub fn is_text_input(element: &ElementInfo) -> bool {
    if let Some(editable) = element.attribute("contenteditable") {
        if !editable.eq_ignore_ascii_case("false") {
            return true;
        }
    }
    match element.tag() {
        "textarea" => true,
        "input" => {
            let input_type = element.attribute("type").unwrap_or("").trim();
            TEXT_INPUT_TYPES
                .iter()
                .any(|t| t.eq_ignore_ascii_case(input_type))
        }
        _ => false,
    }
}

/// Returns true if the event's target is a text-input-capable element.
pub fn targets_text_input(event: &Event) -> bool {
    event.target().is_some_and(is_text_input)
}

/// Returns true if the target or any ancestor carries the exemption marker.
pub fn in_exempt_region(event: &Event, marker: &str) -> bool {
    event.path().iter().any(|el| el.has_attribute(marker))
}

/// A keyboard shortcut the guard suppresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+S
    Save,
    /// Ctrl+P
    Print,
    /// Ctrl+U
    ViewSource,
    /// Ctrl+Shift+I, Ctrl+Shift+J, or F12
    DevTools,
    /// Ctrl+A outside a text input
    SelectAll,
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shortcut::Save => "save",
            Shortcut::Print => "print",
            Shortcut::ViewSource => "view-source",
            Shortcut::DevTools => "devtools",
            Shortcut::SelectAll => "select-all",
        };
        f.write_str(name)
    }
}

/// Classifies a key press.
///
/// Letter matching is case-insensitive. Ctrl and Meta both count as the
/// command modifier. `in_text_input` only affects select-all.
pub fn classify_shortcut(key: &KeyInfo, in_text_input: bool) -> Option<Shortcut> {
    if key.key.eq_ignore_ascii_case("f12") {
        return Some(Shortcut::DevTools);
    }
    if !(key.ctrl || key.meta) {
        return None;
    }

    let mut chars = key.key.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_ascii_lowercase(),
        _ => return None,
    };

    match (letter, key.shift) {
        ('i' | 'j', true) => Some(Shortcut::DevTools),
        ('s', _) => Some(Shortcut::Save),
        ('p', _) => Some(Shortcut::Print),
        ('u', _) => Some(Shortcut::ViewSource),
        ('a', _) if !in_text_input => Some(Shortcut::SelectAll),
        _ => None,
    }
}

/// Remembers the last tap so a quick second tap can be recognized.
#[derive(Debug, Clone)]
pub struct DoubleTapTracker {
    window_ms: u64,
    last_tap_ms: Option<u64>,
}

impl DoubleTapTracker {
    /// Creates a tracker that treats taps within `window_ms` as a double tap.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_tap_ms: None,
        }
    }

    /// Records a tap and returns true if it completes a double tap.
    ///
    /// A timestamp earlier than the previous tap starts a fresh sequence.
    pub fn tap(&mut self, at_ms: u64) -> bool {
        let is_double = match self.last_tap_ms {
            Some(last) if at_ms >= last => at_ms - last <= self.window_ms,
            _ => false,
        };
        self.last_tap_ms = Some(at_ms);
        is_double
    }

    /// Forgets the previous tap.
    pub fn reset(&mut self) {
        self.last_tap_ms = None;
    }
}
