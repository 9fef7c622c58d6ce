//! Input abstraction layer.
//!
//! Normalizes pointer and keyboard events coming from the host into a
//! single `InputEvent` enum consumed by the session.

use px_core::coords::ScreenRect;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed. `surface` is the background surface's rendered
    /// rectangle at the time of the event, as reported by the viewport.
    PointerDown {
        x: f64,
        y: f64,
        surface: ScreenRect,
    },

    /// Key pressed.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, surface: ScreenRect) -> Self {
        Self::PointerDown { x, y, surface }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }
}
