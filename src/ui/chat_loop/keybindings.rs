use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::AppAction;

/// Translate a key press into the action it signals. Keys without a binding
/// go to whichever surface is active.
pub(crate) fn action_for_key(key: KeyEvent) -> AppAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => AppAction::Cancel,
        KeyCode::Char('d') if ctrl => AppAction::QuitRequested,
        KeyCode::Char('s') if ctrl => AppAction::EnterSelectionMode,
        KeyCode::Char('y') if ctrl => AppAction::Copy,
        KeyCode::Esc => AppAction::Escape,
        KeyCode::Enter => AppAction::Submit,
        _ => AppAction::Key(key),
    }
}
