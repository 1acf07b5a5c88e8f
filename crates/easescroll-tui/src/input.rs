use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollLeft,
    ScrollRight,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    NextCurve,
    PrevCurve,
    Faster,
    Slower,
    Cancel,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    let binding = normalize(key);

    // Second half of "gg"
    if app.pending_g {
        if keymap.is_g_prefix(&binding) {
            return keymap.get_pending_g_action().copied().unwrap_or(Action::None);
        }
        // Any other key abandons the sequence and is handled normally
    }

    if keymap.is_g_prefix(&binding) && keymap.get(&binding).is_none() {
        return Action::PendingG;
    }

    keymap.get(&binding).copied().unwrap_or(Action::None)
}

/// Terminals disagree on whether SHIFT is reported for uppercase letters and
/// shifted symbols; bindings always carry SHIFT for uppercase letters only.
fn normalize(key: KeyEvent) -> KeyBinding {
    let mut modifiers = key.modifiers;
    if let KeyCode::Char(c) = key.code {
        if c.is_ascii_uppercase() {
            modifiers.insert(KeyModifiers::SHIFT);
        } else if !c.is_ascii_alphabetic() {
            modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    KeyBinding::new(key.code, modifiers)
}
