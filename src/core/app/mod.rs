use std::time::Duration;

use crate::core::conversation::Conversation;
use crate::ui::transcript::render_conversation;

pub mod actions;
pub mod session;
pub mod ui_state;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand, ERROR_RECOVERY_DELAY,
};
pub use session::{Mode, Session, SnippetSelection, Status};
pub use ui_state::{PromptEditor, UiState, Viewport};

/// Delay before the first render, giving the terminal time to report its size.
pub const INITIAL_REFRESH_DELAY: Duration = Duration::from_millis(100);

/// The session controller: the session itself plus the surfaces it drives.
/// Only the chat loop mutates it, one action at a time.
pub struct App {
    pub session: Session,
    pub ui: UiState,
}

impl App {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            session: Session::new(conversation),
            ui: UiState::new(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.ui.exit_requested
    }

    /// Re-render the conversation at the current width and show its end.
    pub fn refresh_viewport(&mut self) {
        let lines = render_conversation(&self.session.conversation, self.ui.width);
        self.ui.viewport.set_content(lines);
        self.ui.viewport.goto_bottom();
    }
}

#[cfg(test)]
mod tests;
