use std::cell::RefCell;
use std::rc::Rc;

use crate::config::GuardConfig;
use crate::diagnostics::{DiagnosticsTrail, GuardEvent, Outcome};
use crate::error::ConfigError;
use crate::event::{Event, EventDetail, EventKind, ListenerOptions, ListenerTarget};
use crate::logging::SurfaceLog;
use crate::policy::{PolicyKind, PolicySet};
use crate::rules::{self, DoubleTapTracker};
use crate::subscription::Subscription;
use crate::surface::{Handler, HeadObserver, Surface};

/// Content-protection guard for one surface.
///
/// While active, the guard suppresses the document-level escape hatches
/// listed in [`PolicyKind`] and locks the viewport against user scaling.
/// [`deactivate`](Self::deactivate) (or dropping the guard) removes every
/// registration the matching [`activate`](Self::activate) made and
/// restores the viewport declaration it replaced.
///
/// # Limits
///
/// The guard only sees events the surface dispatches. OS-level captures,
/// the print-screen key, and browser chrome shortcuts never reach it, and
/// nothing here reports on them. The visibility watch records that the
/// surface was hidden; it is a diagnostic, not a control.
///
/// # State
///
/// ```text
/// inactive --activate()--> active --deactivate()--> inactive
/// ```
///
/// `activate()` while active and `deactivate()` while inactive are no-ops
/// that return `false`.
///
/// # Example
///
/// ```
/// use policy_guard::{Event, EventKind, ElementInfo, ListenerTarget, PolicyGuard, SimulatedSurface};
///
/// let surface = SimulatedSurface::new();
/// let mut guard = PolicyGuard::new(surface.clone());
/// assert!(guard.activate());
///
/// let menu = Event::new(EventKind::ContextMenu).with_path(vec![ElementInfo::new("img")]);
/// assert!(surface.dispatch(ListenerTarget::Document, menu.clone()).default_prevented());
///
/// guard.deactivate();
/// assert!(!surface.dispatch(ListenerTarget::Document, menu).default_prevented());
/// ```
pub struct PolicyGuard<S: Surface + Clone + 'static> {
    surface: S,
    config: GuardConfig,
    log: SurfaceLog,
    trail: Rc<DiagnosticsTrail>,
    double_tap: Rc<RefCell<DoubleTapTracker>>,
    activation: Option<Activation>,
}

/// Everything one `activate()` put in place.
struct Activation {
    installed: PolicySet,
    subscriptions: Vec<(PolicyKind, Subscription)>,
    viewport_lock: Subscription,
}

impl Activation {
    fn release(self) {
        for (_, subscription) in self.subscriptions.into_iter().rev() {
            subscription.cancel();
        }
        self.viewport_lock.cancel();
    }
}

impl<S: Surface + Clone + 'static> PolicyGuard<S> {
    /// Creates an inactive guard with the default configuration.
    pub fn new(surface: S) -> Self {
        Self::build(surface, GuardConfig::default())
    }

    /// Creates an inactive guard with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns the first configuration value that fails validation.
    pub fn with_config(surface: S, config: GuardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(surface, config))
    }

    fn build(surface: S, config: GuardConfig) -> Self {
        Self {
            log: SurfaceLog::new(&config.surface_label),
            trail: Rc::new(DiagnosticsTrail::with_capacity(
                config.diagnostics_capacity,
            )),
            double_tap: Rc::new(RefCell::new(DoubleTapTracker::new(
                config.double_tap_window_ms,
            ))),
            surface,
            config,
            activation: None,
        }
    }

    /// Returns true between `activate()` and `deactivate()`.
    pub fn is_active(&self) -> bool {
        self.activation.is_some()
    }

    /// Returns the policy kinds currently installed.
    pub fn installed(&self) -> PolicySet {
        self.activation
            .as_ref()
            .map(|a| a.installed)
            .unwrap_or_default()
    }

    /// Returns the number of live registrations for a policy kind.
    pub fn registrations(&self, kind: PolicyKind) -> usize {
        self.activation.as_ref().map_or(0, |a| {
            a.subscriptions.iter().filter(|(k, _)| *k == kind).count()
        })
    }

    /// Returns the decisions recorded so far.
    pub fn diagnostics(&self) -> &DiagnosticsTrail {
        &self.trail
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Installs every interceptor and locks the viewport.
    ///
    /// Returns `false` without touching anything if the guard is already
    /// active.
    pub fn activate(&mut self) -> bool {
        if self.activation.is_some() {
            self.log
                .debug(format_args!("activate ignored: guard already active"));
            return false;
        }

        let recorder = Recorder {
            log: self.log.clone(),
            trail: Rc::clone(&self.trail),
        };
        let mut installer = Installer {
            surface: &self.surface,
            installed: PolicySet::empty(),
            subscriptions: Vec::new(),
        };

        // Keyboard first: capture listeners run in registration order.
        install_keyboard_block(&mut installer, &recorder);
        install_install_prompt_block(&mut installer, &recorder);
        install_context_menu_block(&mut installer, &recorder);
        install_drag_block(&mut installer, &recorder);
        install_pinch_zoom_block(&mut installer, &recorder, &self.config.exempt_marker);
        install_double_tap_block(
            &mut installer,
            &recorder,
            &self.config.exempt_marker,
            Rc::clone(&self.double_tap),
        );
        install_gesture_block(&mut installer, &recorder, &self.config.exempt_marker);
        install_print_block(&mut installer, &recorder);
        install_manifest_strip(&mut installer, &recorder, self.surface.clone());
        install_visibility_watch(&mut installer, &recorder);

        let viewport_lock = lock_viewport(self.surface.clone(), &self.config.locked_viewport);

        let Installer {
            installed,
            subscriptions,
            ..
        } = installer;
        self.log.info(format_args!(
            "guard activated: {} policies, {} registrations",
            installed.len(),
            subscriptions.len()
        ));
        self.activation = Some(Activation {
            installed,
            subscriptions,
            viewport_lock,
        });
        true
    }

    /// Removes every interceptor, disconnects the manifest observer, and
    /// restores the viewport.
    ///
    /// Returns `false` if the guard was not active.
    pub fn deactivate(&mut self) -> bool {
        let Some(activation) = self.activation.take() else {
            return false;
        };
        activation.release();
        self.double_tap.borrow_mut().reset();
        self.log.info(format_args!("guard deactivated"));
        true
    }
}

impl<S: Surface + Clone + 'static> Drop for PolicyGuard<S> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

struct Installer<'a, S> {
    surface: &'a S,
    installed: PolicySet,
    subscriptions: Vec<(PolicyKind, Subscription)>,
}

impl<S: Surface> Installer<'_, S> {
    fn listen(
        &mut self,
        policy: PolicyKind,
        target: ListenerTarget,
        kind: EventKind,
        options: ListenerOptions,
        handler: Handler,
    ) {
        let subscription = self.surface.listen(target, kind, options, handler);
        self.installed.insert(policy);
        self.subscriptions.push((policy, subscription));
    }

    fn observe_head(&mut self, policy: PolicyKind, observer: HeadObserver) {
        let subscription = self.surface.observe_head(observer);
        self.installed.insert(policy);
        self.subscriptions.push((policy, subscription));
    }
}

#[derive(Clone)]
struct Recorder {
    log: SurfaceLog,
    trail: Rc<DiagnosticsTrail>,
}

impl Recorder {
    fn record(
        &self,
        kind: PolicyKind,
        outcome: Outcome,
        at_ms: Option<u64>,
        detail: Option<String>,
    ) {
        let mut event = GuardEvent::new(self.log.surface(), kind, outcome);
        if let Some(at_ms) = at_ms {
            event = event.at(at_ms);
        }
        if let Some(detail) = detail {
            event = event.with_detail(detail);
        }
        self.trail.record(event);
    }

    fn suppress(&self, kind: PolicyKind, event: &mut Event) {
        event.prevent_default();
        self.record(kind, Outcome::Suppressed, Some(event.timestamp_ms()), None);
    }

    fn allow(&self, kind: PolicyKind, event: &Event, reason: &str) {
        self.record(
            kind,
            Outcome::Allowed,
            Some(event.timestamp_ms()),
            Some(reason.to_string()),
        );
    }
}

fn install_install_prompt_block<S: Surface>(installer: &mut Installer<'_, S>, recorder: &Recorder) {
    let recorder = recorder.clone();
    installer.listen(
        PolicyKind::InstallPromptBlock,
        ListenerTarget::Window,
        EventKind::BeforeInstallPrompt,
        ListenerOptions::bubble(),
        Rc::new(move |event: &mut Event| {
            recorder.suppress(PolicyKind::InstallPromptBlock, event);
        }),
    );
}

fn install_context_menu_block<S: Surface>(installer: &mut Installer<'_, S>, recorder: &Recorder) {
    let recorder = recorder.clone();
    installer.listen(
        PolicyKind::ContextMenuBlock,
        ListenerTarget::Document,
        EventKind::ContextMenu,
        ListenerOptions::bubble(),
        Rc::new(move |event: &mut Event| {
            if rules::targets_text_input(event) {
                recorder.allow(PolicyKind::ContextMenuBlock, event, "text-input");
                return;
            }
            recorder.suppress(PolicyKind::ContextMenuBlock, event);
        }),
    );
}

fn install_keyboard_block<S: Surface>(installer: &mut Installer<'_, S>, recorder: &Recorder) {
    let recorder = recorder.clone();
    installer.listen(
        PolicyKind::KeyboardShortcutBlock,
        ListenerTarget::Document,
        EventKind::KeyDown,
        ListenerOptions::capture(),
        Rc::new(move |event: &mut Event| {
            let EventDetail::Key(key) = event.detail() else {
                return;
            };
            let in_text_input = rules::targets_text_input(event);
            let Some(shortcut) = rules::classify_shortcut(key, in_text_input) else {
                return;
            };
            event.prevent_default();
            event.stop_propagation();
            recorder.log.debug(format_args!("blocked {} shortcut", shortcut));
            recorder.record(
                PolicyKind::KeyboardShortcutBlock,
                Outcome::Suppressed,
                Some(event.timestamp_ms()),
                Some(shortcut.to_string()),
            );
        }),
    );
}

fn install_drag_block<S: Surface>(installer: &mut Installer<'_, S>, recorder: &Recorder) {
    let recorder = recorder.clone();
    installer.listen(
        PolicyKind::DragBlock,
        ListenerTarget::Document,
        EventKind::DragStart,
        ListenerOptions::bubble(),
        Rc::new(move |event: &mut Event| {
            recorder.suppress(PolicyKind::DragBlock, event);
        }),
    );
}

fn install_pinch_zoom_block<S: Surface>(
    installer: &mut Installer<'_, S>,
    recorder: &Recorder,
    marker: &str,
) {
    let recorder = recorder.clone();
    let marker: Rc<str> = Rc::from(marker);
    let handler: Handler = Rc::new(move |event: &mut Event| {
        let touches = match event.detail() {
            EventDetail::Touch { touches } => *touches,
            _ => return,
        };
        if touches < 2 {
            return;
        }
        if rules::in_exempt_region(event, &marker) {
            recorder.allow(PolicyKind::PinchZoomBlock, event, "exempt-region");
            return;
        }
        recorder.suppress(PolicyKind::PinchZoomBlock, event);
    });

    for kind in [EventKind::TouchStart, EventKind::TouchMove] {
        installer.listen(
            PolicyKind::PinchZoomBlock,
            ListenerTarget::Document,
            kind,
            ListenerOptions::bubble(),
            Rc::clone(&handler),
        );
    }
}

fn install_double_tap_block<S: Surface>(
    installer: &mut Installer<'_, S>,
    recorder: &Recorder,
    marker: &str,
    tracker: Rc<RefCell<DoubleTapTracker>>,
) {
    let recorder = recorder.clone();
    let marker: Rc<str> = Rc::from(marker);
    installer.listen(
        PolicyKind::DoubleTapZoomBlock,
        ListenerTarget::Document,
        EventKind::TouchEnd,
        ListenerOptions::bubble(),
        Rc::new(move |event: &mut Event| {
            if rules::in_exempt_region(event, &marker) {
                return;
            }
            if tracker.borrow_mut().tap(event.timestamp_ms()) {
                recorder.suppress(PolicyKind::DoubleTapZoomBlock, event);
            }
        }),
    );
}

fn install_gesture_block<S: Surface>(
    installer: &mut Installer<'_, S>,
    recorder: &Recorder,
    marker: &str,
) {
    let recorder = recorder.clone();
    let marker: Rc<str> = Rc::from(marker);
    let handler: Handler = Rc::new(move |event: &mut Event| {
        if rules::in_exempt_region(event, &marker) {
            recorder.allow(PolicyKind::GestureBlock, event, "exempt-region");
            return;
        }
        recorder.suppress(PolicyKind::GestureBlock, event);
    });

    for kind in [
        EventKind::GestureStart,
        EventKind::GestureChange,
        EventKind::GestureEnd,
    ] {
        installer.listen(
            PolicyKind::GestureBlock,
            ListenerTarget::Document,
            kind,
            ListenerOptions::bubble(),
            Rc::clone(&handler),
        );
    }
}

fn install_print_block<S: Surface>(installer: &mut Installer<'_, S>, recorder: &Recorder) {
    let recorder = recorder.clone();
    installer.listen(
        PolicyKind::PrintBlock,
        ListenerTarget::Window,
        EventKind::BeforePrint,
        ListenerOptions::bubble(),
        Rc::new(move |event: &mut Event| {
            recorder.suppress(PolicyKind::PrintBlock, event);
        }),
    );
}

fn install_manifest_strip<S: Surface + 'static>(
    installer: &mut Installer<'_, S>,
    recorder: &Recorder,
    surface: S,
) {
    let strip = {
        let recorder = recorder.clone();
        move || {
            let removed = surface.remove_manifest_links();
            if removed > 0 {
                recorder.record(
                    PolicyKind::ManifestStrip,
                    Outcome::Suppressed,
                    // Head mutations carry no platform timestamp.
                    None,
                    Some(format!("removed {} manifest link(s)", removed)),
                );
            }
        }
    };
    strip();
    installer.observe_head(PolicyKind::ManifestStrip, Rc::new(strip));
}

fn install_visibility_watch<S: Surface>(installer: &mut Installer<'_, S>, recorder: &Recorder) {
    let recorder = recorder.clone();
    installer.listen(
        PolicyKind::VisibilityWatch,
        ListenerTarget::Document,
        EventKind::VisibilityChange,
        ListenerOptions::bubble(),
        Rc::new(move |event: &mut Event| {
            if let EventDetail::Visibility { hidden: true } = event.detail() {
                recorder
                    .log
                    .debug(format_args!("surface hidden; nothing can be blocked here"));
                recorder.record(
                    PolicyKind::VisibilityWatch,
                    Outcome::Observed,
                    Some(event.timestamp_ms()),
                    Some("hidden".to_string()),
                );
            }
        }),
    );
}

/// Forces the non-scalable viewport and returns the token that restores the
/// previous declaration.
fn lock_viewport<S: Surface + 'static>(surface: S, locked: &str) -> Subscription {
    let previous = surface.replace_viewport(Some(locked.to_string()));
    Subscription::new(move || {
        surface.replace_viewport(previous);
    })
}
