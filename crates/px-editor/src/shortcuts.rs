//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    TogglePlacement,
    Undo,
    /// Serialize and hand the document to the host for download.
    Save,
    /// Ask the host to open a document (the file picker lives in JS).
    Open,
    /// Clear the whole graph and history.
    ClearAll,
    Deselect,
}

impl ShortcutAction {
    pub fn name(&self) -> &'static str {
        match self {
            ShortcutAction::TogglePlacement => "togglePlacement",
            ShortcutAction::Undo => "undo",
            ShortcutAction::Save => "save",
            ShortcutAction::Open => "open",
            ShortcutAction::ClearAll => "clearAll",
            ShortcutAction::Deselect => "deselect",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Escape"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.ctrl || modifiers.meta;

        if cmd && modifiers.shift {
            // No redo: ⌘⇧Z is deliberately unbound.
            return None;
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "s" | "S" => Some(ShortcutAction::Save),
                "o" | "O" => Some(ShortcutAction::Open),
                "Delete" | "Backspace" => Some(ShortcutAction::ClearAll),
                _ => None,
            };
        }

        if modifiers.shift || modifiers.alt {
            return None;
        }

        match key {
            "p" | "P" => Some(ShortcutAction::TogglePlacement),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
