//! Normalized input vocabulary.
//!
//! A platform shell translates raw window-system events into these types before
//! handing them to [`crate::view::View`]. Coordinates are view coordinates, the
//! same space node bounds live in.

use crate::geometry::Point;
use crate::payload::Payload;

// ============================================================================
// Modifiers
// ============================================================================

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Self = Self { shift: true, ..Self::NONE };
    pub const CTRL: Self = Self { ctrl: true, ..Self::NONE };
    pub const ALT: Self = Self { alt: true, ..Self::NONE };
    pub const META: Self = Self { meta: true, ..Self::NONE };

    /// The platform's "action" modifier: Command on macOS, Control elsewhere.
    #[cfg(target_os = "macos")]
    pub const ACTION: Self = Self::META;
    #[cfg(not(target_os = "macos"))]
    pub const ACTION: Self = Self::CTRL;

    /// Whether the platform's action modifier is held.
    #[cfg(target_os = "macos")]
    #[inline]
    pub fn action(&self) -> bool {
        self.meta
    }

    #[cfg(not(target_os = "macos"))]
    #[inline]
    pub fn action(&self) -> bool {
        self.ctrl
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    #[inline]
    pub fn none(&self) -> bool {
        !self.any()
    }

    /// Union of two modifier sets.
    #[inline]
    pub fn with(self, other: Modifiers) -> Self {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
            meta: self.meta || other.meta,
        }
    }
}

// ============================================================================
// Pointer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonKind {
    #[default]
    Left,
    Right,
    Middle,
    Other(u16),
}

/// A mouse button transition, or the current button state during a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButton {
    /// True on press (and for drags while held), false on release.
    pub down: bool,
    pub kind: ButtonKind,
    pub click_count: u32,
    pub modifiers: Modifiers,
    pub pos: Point,
}

impl MouseButton {
    /// A left-button press at `pos`.
    pub fn press(pos: Point) -> Self {
        Self { down: true, kind: ButtonKind::Left, click_count: 1, modifiers: Modifiers::NONE, pos }
    }

    /// A left-button release at `pos`.
    pub fn release(pos: Point) -> Self {
        Self { down: false, ..Self::press(pos) }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, pos: Point) -> Self {
        self.pos = pos;
        self
    }
}

/// Pointer-crossing status delivered with cursor and drop-tracking calls.
///
/// `Entering` and `Leaving` always come in pairs per child; `Hovering` is sent
/// for moves in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorTracking {
    Entering,
    Hovering,
    Leaving,
}

impl CursorTracking {
    /// Status for a window crossing event. `entered` is true when the pointer
    /// moved into the view and false when it moved out.
    #[inline]
    pub fn from_crossing(entered: bool) -> Self {
        if entered { CursorTracking::Entering } else { CursorTracking::Leaving }
    }
}

// ============================================================================
// Keyboard
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Insert,
    Enter,
    Tab,
    Escape,
    Space,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Named(NamedKey),
    Character(String),
}

impl Key {
    #[inline]
    pub fn named(&self) -> Option<NamedKey> {
        match self {
            Key::Named(k) => Some(*k),
            Key::Character(_) => None,
        }
    }

    #[inline]
    pub fn character(&self) -> Option<&str> {
        match self {
            Key::Character(c) => Some(c.as_str()),
            Key::Named(_) => None,
        }
    }

    /// Case-insensitive match against a single character key.
    pub fn is_char(&self, c: char) -> bool {
        self.character()
            .and_then(|s| s.chars().next())
            .is_some_and(|k| k.eq_ignore_ascii_case(&c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub key: Key,
    pub action: KeyAction,
    pub modifiers: Modifiers,
}

impl KeyInfo {
    pub fn press(key: NamedKey) -> Self {
        Self { key: Key::Named(key), action: KeyAction::Press, modifiers: Modifiers::NONE }
    }

    pub fn press_char(c: char) -> Self {
        Self { key: Key::Character(c.to_string()), action: KeyAction::Press, modifiers: Modifiers::NONE }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Press or auto-repeat.
    #[inline]
    pub fn is_down(&self) -> bool {
        matches!(self.action, KeyAction::Press | KeyAction::Repeat)
    }
}

/// Committed text input (after IME composition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInfo {
    pub text: String,
    pub modifiers: Modifiers,
}

// ============================================================================
// Focus and drop
// ============================================================================

/// How a node should pick its focused descendant when it gains focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    /// First focus-accepting descendant (forward Tab traversal).
    FromTop,
    /// Last focus-accepting descendant (backward Tab traversal).
    FromBottom,
    /// The descendant focused before the last `end_focus`, if still valid.
    RestorePrevious,
}

/// An external drag hovering over, or dropped onto, the view.
#[derive(Debug, Clone, PartialEq)]
pub struct DropInfo {
    pub payload: Payload,
    pub pos: Point,
}

impl DropInfo {
    pub fn new(payload: Payload, pos: Point) -> Self {
        Self { payload, pos }
    }
}
