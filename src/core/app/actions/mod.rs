mod completion;
mod input;
mod selection;

pub use completion::ERROR_RECOVERY_DELAY;

use std::time::Duration;

use ratatui::crossterm::event::KeyEvent;
use tokio::sync::mpsc;

use super::{App, Mode, Session, Status};
use crate::commands::CommandError;
use crate::core::conversation::Conversation;

/// Everything that can change the controller's state. Key presses arrive here
/// already translated by the key bindings; async work reports back through
/// the completion variants.
#[derive(Debug)]
pub enum AppAction {
    Cancel,
    QuitRequested,
    Escape,
    EnterSelectionMode,
    Copy,
    Submit,
    Key(KeyEvent),
    FetchCompleted {
        conversation: Conversation,
    },
    ActionCompleted {
        result: Result<Session, CommandError>,
    },
    SwitchStatus {
        status: Status,
    },
    Refresh,
    Resize {
        width: u16,
        height: u16,
    },
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            self.dispatch(action);
        }
    }
}

/// Side effects requested by a transition. The chat loop runs them off the
/// controller and feeds results back as [`AppAction`]s.
#[derive(Debug, PartialEq)]
pub enum AppCommand {
    Fetch {
        prompt: String,
        conversation: Conversation,
    },
    RunCommand {
        input: String,
        session: Session,
    },
    SwitchStatusAfter {
        status: Status,
        delay: Duration,
    },
    Refresh {
        delay: Duration,
    },
}

impl AppCommand {
    pub(crate) fn refresh_now() -> Self {
        AppCommand::Refresh {
            delay: Duration::ZERO,
        }
    }
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        commands.extend(apply_action(app, action));
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Vec<AppCommand> {
    match action {
        AppAction::Cancel => {
            app.ui.exit_requested = true;
            Vec::new()
        }

        AppAction::FetchCompleted { .. }
        | AppAction::ActionCompleted { .. }
        | AppAction::SwitchStatus { .. }
        | AppAction::Refresh
        | AppAction::Resize { .. } => completion::handle_completion_action(app, action),

        action => match app.session.mode {
            Mode::Chat => input::handle_chat_action(app, action),
            Mode::CodeSelection => selection::handle_selection_action(app, action),
        },
    }
}
