//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Which actions
//! are reachable depends on whether a text note is in edit mode: while
//! editing, only save and cancel are bound so typing is never swallowed.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Delete the connection under the pointer.
    DeleteHoveredConnection,
    /// Commit the edit buffer (Enter + Ctrl/⌘).
    SaveEdit,
    /// Discard the edit buffer, or abandon a connect gesture.
    Cancel,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"Delete"`, `"Enter"`).
    /// Returns `None` if the key combo has no binding in the current mode.
    pub fn resolve(key: &str, modifiers: Modifiers, editing: bool) -> Option<ShortcutAction> {
        if editing {
            return match key {
                "Enter" if modifiers.command() => Some(ShortcutAction::SaveEdit),
                "Escape" => Some(ShortcutAction::Cancel),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" if !modifiers.command() => {
                Some(ShortcutAction::DeleteHoveredConnection)
            }
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}
