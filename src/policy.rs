use std::fmt;

/// One of the ten fixed categories of surface behavior the guard handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PolicyKind {
    /// Cancels the "add to home screen" install prompt
    InstallPromptBlock,
    /// Cancels context menus outside text inputs
    ContextMenuBlock,
    /// Cancels save/print/view-source/devtools/select-all shortcuts
    KeyboardShortcutBlock,
    /// Cancels drag starts document-wide
    DragBlock,
    /// Cancels multi-touch pinch outside exempt regions
    PinchZoomBlock,
    /// Cancels double taps outside exempt regions
    DoubleTapZoomBlock,
    /// Cancels platform gesture events outside exempt regions
    GestureBlock,
    /// Cancels the pre-print signal
    PrintBlock,
    /// Removes app-manifest links from the document head
    ManifestStrip,
    /// Records transitions to a hidden state; never blocks anything
    VisibilityWatch,
}

impl PolicyKind {
    /// Every kind, in installation order.
    pub const ALL: [PolicyKind; 10] = [
        PolicyKind::InstallPromptBlock,
        PolicyKind::ContextMenuBlock,
        PolicyKind::KeyboardShortcutBlock,
        PolicyKind::DragBlock,
        PolicyKind::PinchZoomBlock,
        PolicyKind::DoubleTapZoomBlock,
        PolicyKind::GestureBlock,
        PolicyKind::PrintBlock,
        PolicyKind::ManifestStrip,
        PolicyKind::VisibilityWatch,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::InstallPromptBlock => "install-prompt-block",
            PolicyKind::ContextMenuBlock => "context-menu-block",
            PolicyKind::KeyboardShortcutBlock => "keyboard-shortcut-block",
            PolicyKind::DragBlock => "drag-block",
            PolicyKind::PinchZoomBlock => "pinch-zoom-block",
            PolicyKind::DoubleTapZoomBlock => "double-tap-zoom-block",
            PolicyKind::GestureBlock => "gesture-block",
            PolicyKind::PrintBlock => "print-block",
            PolicyKind::ManifestStrip => "manifest-strip",
            PolicyKind::VisibilityWatch => "visibility-watch",
        };
        f.write_str(name)
    }
}

/// The set of policy kinds currently installed on a surface.
///
/// Each kind is present at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicySet {
    bits: u16,
}

impl PolicySet {
    /// An empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A set containing all ten kinds.
    pub fn full() -> Self {
        PolicyKind::ALL.iter().copied().collect()
    }

    /// Adds a kind. Returns false if it was already present.
    pub fn insert(&mut self, kind: PolicyKind) -> bool {
        let present = self.contains(kind);
        self.bits |= kind.bit();
        !present
    }

    /// Returns true if the kind is installed.
    pub fn contains(&self, kind: PolicyKind) -> bool {
        self.bits & kind.bit() != 0
    }

    /// Returns the number of installed kinds.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns true if nothing is installed.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates over installed kinds in installation order.
    pub fn iter(&self) -> impl Iterator<Item = PolicyKind> + '_ {
        PolicyKind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

impl FromIterator<PolicyKind> for PolicySet {
    fn from_iter<I: IntoIterator<Item = PolicyKind>>(iter: I) -> Self {
        let mut set = PolicySet::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}
