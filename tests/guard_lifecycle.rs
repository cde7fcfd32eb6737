use policy_guard::diagnostics::Outcome;
use policy_guard::{
    ElementInfo, Event, EventKind, HeadLink, KeyInfo, ListenerTarget, MemoryStore, PolicyGuard,
    PolicyKind, SimulatedSurface, ZoomController,
};

fn image() -> Vec<ElementInfo> {
    vec![
        ElementInfo::new("img"),
        ElementInfo::new("main"),
        ElementInfo::new("body"),
    ]
}

fn text_input() -> Vec<ElementInfo> {
    vec![
        ElementInfo::new("input").with_attribute("type", "text"),
        ElementInfo::new("form"),
        ElementInfo::new("body"),
    ]
}

fn exempt_viewer() -> Vec<ElementInfo> {
    vec![
        ElementInfo::new("img"),
        ElementInfo::new("div").with_attribute("data-allow-zoom", ""),
        ElementInfo::new("body"),
    ]
}

fn context_menu(path: Vec<ElementInfo>) -> Event {
    Event::new(EventKind::ContextMenu).with_path(path)
}

#[test]
fn teardown_restores_native_behavior() {
    let surface = SimulatedSurface::new();
    let mut guard = PolicyGuard::new(surface.clone());
    guard.activate();

    assert!(surface
        .dispatch(ListenerTarget::Document, context_menu(image()))
        .default_prevented());

    guard.deactivate();

    assert!(!surface
        .dispatch(ListenerTarget::Document, context_menu(image()))
        .default_prevented());
    assert_eq!(surface.listener_count(), 0);
}

#[test]
fn manifest_observer_disconnects_on_teardown() {
    let surface = SimulatedSurface::new();
    let mut guard = PolicyGuard::new(surface.clone());
    guard.activate();

    surface.append_head_link(HeadLink::new("manifest", "/a.webmanifest"));
    assert!(surface.head_links().is_empty());

    guard.deactivate();

    surface.append_head_link(HeadLink::new("manifest", "/b.webmanifest"));
    assert_eq!(
        surface.head_links(),
        vec![HeadLink::new("manifest", "/b.webmanifest")]
    );
}

#[test]
fn text_input_context_menu_is_never_suppressed() {
    let surface = SimulatedSurface::new();
    let mut guard = PolicyGuard::new(surface.clone());

    let before = surface.dispatch(ListenerTarget::Document, context_menu(text_input()));
    guard.activate();
    let during = surface.dispatch(ListenerTarget::Document, context_menu(text_input()));
    guard.deactivate();
    let after = surface.dispatch(ListenerTarget::Document, context_menu(text_input()));

    assert!(!before.default_prevented());
    assert!(!during.default_prevented());
    assert!(!after.default_prevented());
}

#[test]
fn two_finger_move_respects_exempt_region() {
    let surface = SimulatedSurface::new();
    let mut guard = PolicyGuard::new(surface.clone());
    guard.activate();

    let inside = surface.dispatch(
        ListenerTarget::Document,
        Event::touch(EventKind::TouchMove, 2).with_path(exempt_viewer()),
    );
    let outside = surface.dispatch(
        ListenerTarget::Document,
        Event::touch(EventKind::TouchMove, 2).with_path(image()),
    );

    assert!(!inside.default_prevented());
    assert!(outside.default_prevented());

    let trail = guard.diagnostics();
    assert_eq!(trail.count(PolicyKind::PinchZoomBlock, Outcome::Allowed), 1);
    assert_eq!(trail.count(PolicyKind::PinchZoomBlock, Outcome::Suppressed), 1);
}

#[test]
fn double_tap_inside_exempt_region_is_left_alone() {
    let surface = SimulatedSurface::new();
    let mut guard = PolicyGuard::new(surface.clone());
    guard.activate();

    for at in [1_000, 1_150, 1_300] {
        let event = surface.dispatch(
            ListenerTarget::Document,
            Event::touch(EventKind::TouchEnd, 0)
                .with_path(exempt_viewer())
                .at(at),
        );
        assert!(!event.default_prevented());
    }
}

#[test]
fn double_activate_installs_once_and_single_deactivate_clears() {
    let surface = SimulatedSurface::new();
    let mut guard = PolicyGuard::new(surface.clone());

    assert!(guard.activate());
    let installed = surface.listener_count();
    assert!(!guard.activate());
    assert_eq!(surface.listener_count(), installed);
    for kind in PolicyKind::ALL {
        assert!(guard.installed().contains(kind));
    }
    assert_eq!(surface.listener_count_for(EventKind::ContextMenu), 1);

    surface.dispatch(ListenerTarget::Document, context_menu(image()));
    assert_eq!(
        guard
            .diagnostics()
            .count(PolicyKind::ContextMenuBlock, Outcome::Suppressed),
        1
    );

    assert!(guard.deactivate());
    assert_eq!(surface.listener_count(), 0);
    assert_eq!(surface.observer_count(), 0);
    assert!(!guard.deactivate());
}

#[test]
fn select_all_follows_focus() {
    let surface = SimulatedSurface::new();
    let mut guard = PolicyGuard::new(surface.clone());
    guard.activate();

    let in_text = surface.dispatch(
        ListenerTarget::Document,
        Event::key_down(KeyInfo::ctrl("a")).with_path(text_input()),
    );
    let on_page = surface.dispatch(
        ListenerTarget::Document,
        Event::key_down(KeyInfo::ctrl("A")).with_path(image()),
    );

    assert!(!in_text.default_prevented());
    assert!(on_page.default_prevented());
    assert!(on_page.propagation_stopped());
}

#[test]
fn devtools_shortcuts_are_blocked() {
    let surface = SimulatedSurface::new();
    let mut guard = PolicyGuard::new(surface.clone());
    guard.activate();

    for key in [
        KeyInfo::ctrl("i").with_shift(),
        KeyInfo::ctrl("J").with_shift(),
        KeyInfo::plain("F12"),
        KeyInfo::ctrl("u"),
        KeyInfo::ctrl("p"),
    ] {
        let label = key.key.clone();
        let event = surface.dispatch(ListenerTarget::Document, Event::key_down(key));
        assert!(event.default_prevented(), "{} not blocked", label);
    }
}

#[test]
fn independent_surfaces_have_independent_guards() {
    let first = SimulatedSurface::new();
    let second = SimulatedSurface::new();
    let mut guard_a = PolicyGuard::new(first.clone());
    let _guard_b = PolicyGuard::new(second.clone());

    guard_a.activate();

    assert!(first
        .dispatch(ListenerTarget::Document, context_menu(image()))
        .default_prevented());
    assert!(!second
        .dispatch(ListenerTarget::Document, context_menu(image()))
        .default_prevented());
}

#[test]
fn guard_and_zoom_share_a_surface() {
    let surface = SimulatedSurface::with_viewport("width=device-width");
    let mut zoom = ZoomController::new(surface.clone(), MemoryStore::new());
    let mut guard = PolicyGuard::new(surface.clone());
    guard.activate();

    zoom.zoom_in();
    assert_eq!(surface.root_scale(), Some(1.1));
    assert!(surface
        .viewport()
        .is_some_and(|v| v.contains("user-scalable=no")));

    guard.deactivate();
    zoom.release();
    assert_eq!(surface.viewport().as_deref(), Some("width=device-width"));
    assert_eq!(surface.root_scale(), None);
}
