//! Raw input events as delivered to the widget tree.
//!
//! The platform layer normalizes whatever it receives into [`InputEvent`].
//! Commands travel through the same dispatch path as input, wrapped in
//! [`InputEvent::Command`].

use trellis_core::Int2;

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };
}

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    Enter,
    Escape,
    Space,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    /// A key that produces a character.
    Character(char),
    /// Any other key, by platform key code.
    Other(u32),
}

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Additional buttons, numbered from 4.
    Other(u8),
}

impl MouseButton {
    /// Button number as written into `button:` command arguments.
    pub fn number(self) -> i32 {
        match self {
            Self::Left => 1,
            Self::Middle => 2,
            Self::Right => 3,
            Self::Other(n) => i32::from(n),
        }
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyDown {
        key: Key,
        modifiers: KeyboardModifiers,
    },
    /// A key was released.
    KeyUp {
        key: Key,
        modifiers: KeyboardModifiers,
    },
    /// Text was entered.
    Text(String),
    /// The pointer moved to `pos` (window coordinates).
    MouseMotion { pos: Int2 },
    /// A mouse button was pressed.
    MouseButtonDown { button: MouseButton, pos: Int2 },
    /// A mouse button was released.
    MouseButtonUp { button: MouseButton, pos: Int2 },
    /// The wheel scrolled by `delta` with the pointer at `pos`.
    MouseWheel { delta: Int2, pos: Int2 },
    /// A command string routed through dispatch.
    Command(String),
}

impl InputEvent {
    /// Wrap a command string.
    pub fn command(text: impl Into<String>) -> Self {
        Self::Command(text.into())
    }

    /// Key press without modifiers.
    pub fn key_down(key: Key) -> Self {
        Self::KeyDown {
            key,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    /// Whether this is a keyboard event.
    pub fn is_keyboard(&self) -> bool {
        matches!(self, Self::KeyDown { .. } | Self::KeyUp { .. } | Self::Text(_))
    }

    /// Whether this is a pointer event.
    pub fn is_pointer(&self) -> bool {
        self.pointer_pos().is_some()
    }

    /// Pointer position of a pointer event.
    pub fn pointer_pos(&self) -> Option<Int2> {
        match self {
            Self::MouseMotion { pos }
            | Self::MouseButtonDown { pos, .. }
            | Self::MouseButtonUp { pos, .. }
            | Self::MouseWheel { pos, .. } => Some(*pos),
            _ => None,
        }
    }

    /// Command text of a command event.
    pub fn as_command(&self) -> Option<&str> {
        match self {
            Self::Command(text) => Some(text),
            _ => None,
        }
    }
}
