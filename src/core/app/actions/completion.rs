use std::time::Duration;

use tracing::debug;

use super::{App, AppAction, AppCommand, Status};

/// How long an action error stays on the status line before input resumes.
pub const ERROR_RECOVERY_DELAY: Duration = Duration::from_secs(2);

pub(super) fn handle_completion_action(app: &mut App, action: AppAction) -> Vec<AppCommand> {
    match action {
        AppAction::FetchCompleted { conversation } => {
            debug!(messages = conversation.len(), "fetch completed");
            app.session.conversation = conversation;
            app.session.set_status(Status::AwaitingInput);
            app.ui.prompt.resume();
            vec![AppCommand::refresh_now()]
        }
        AppAction::ActionCompleted { result } => match result {
            Ok(mut session) => {
                // Commands never edit the conversation, and a fetch may have
                // landed since the snapshot was taken.
                session.conversation = std::mem::take(&mut app.session.conversation);
                app.session = session;
                vec![
                    AppCommand::SwitchStatusAfter {
                        status: Status::AwaitingInput,
                        delay: Duration::ZERO,
                    },
                    AppCommand::refresh_now(),
                ]
            }
            Err(err) => {
                debug!(error = %err, "command failed");
                app.session.set_status_message(err.to_string());
                vec![
                    AppCommand::SwitchStatusAfter {
                        status: Status::AwaitingInput,
                        delay: ERROR_RECOVERY_DELAY,
                    },
                    AppCommand::refresh_now(),
                ]
            }
        },
        AppAction::SwitchStatus { status } => {
            app.session.set_status(status);
            app.ui.prompt.resume();
            Vec::new()
        }
        AppAction::Refresh => {
            app.refresh_viewport();
            Vec::new()
        }
        AppAction::Resize { width, height } => {
            app.ui.resize(width, height);
            vec![AppCommand::refresh_now()]
        }
        _ => Vec::new(),
    }
}
