//! Key press → [`AppAction`] mapping.
//!
//! The chat has a single input mode, so the mapping is a flat match with no
//! app state involved.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::AppAction;

const SCROLL_STEP: u16 = 1;

pub fn map_key(key: KeyEvent) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let action = match key.code {
        KeyCode::Esc => AppAction::Quit,
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'c' => AppAction::Quit,
            'n' => AppAction::StartNewConversation,
            'b' => AppAction::ToggleSidebar,
            't' => AppAction::ToggleTheme,
            'r' => AppAction::StartListening,
            'p' => AppAction::SpeakLastReply,
            'u' => AppAction::ClearInput,
            _ => return None,
        },
        KeyCode::Char(_) if alt => return None,
        KeyCode::Char(ch) => AppAction::InsertChar { ch },
        KeyCode::Enter => AppAction::SubmitDraft,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::ScrollUp { lines: SCROLL_STEP },
        KeyCode::Down => AppAction::ScrollDown { lines: SCROLL_STEP },
        KeyCode::PageUp => AppAction::PageUp,
        KeyCode::PageDown => AppAction::PageDown,
        _ => return None,
    };
    Some(action)
}
