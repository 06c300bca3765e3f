//! Off-controller execution of [`AppCommand`]s. Each command runs as its own
//! task on a snapshot and reports back with exactly one action.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::commands::{run_command, CommandError};
use crate::core::app::{AppAction, AppActionDispatcher, AppCommand, Session};
use crate::core::client::ChatClient;
use crate::core::conversation::Conversation;
use crate::utils::clipboard::Clipboard;

#[derive(Clone)]
pub struct ExecutorContext {
    pub dispatcher: AppActionDispatcher,
    pub client: Arc<ChatClient>,
    pub clipboard: Arc<dyn Clipboard>,
}

impl ExecutorContext {
    pub fn new(
        dispatcher: AppActionDispatcher,
        client: Arc<ChatClient>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            dispatcher,
            client,
            clipboard,
        }
    }

    pub fn execute(&self, command: AppCommand) {
        match command {
            AppCommand::Fetch {
                prompt,
                conversation,
            } => self.spawn_fetch(prompt, conversation),
            AppCommand::RunCommand { input, session } => self.spawn_command(input, session),
            AppCommand::SwitchStatusAfter { status, delay } => {
                self.spawn_delayed(delay, AppAction::SwitchStatus { status })
            }
            AppCommand::Refresh { delay } => self.spawn_delayed(delay, AppAction::Refresh),
        }
    }

    fn spawn_fetch(&self, prompt: String, conversation: Conversation) {
        let client = self.client.clone();
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            debug!(prompt = %prompt, "fetching completion");
            let conversation = client.ask_or_explain(&conversation, &prompt).await;
            dispatcher.dispatch(AppAction::FetchCompleted { conversation });
        });
    }

    fn spawn_command(&self, input: String, session: Session) {
        let clipboard = self.clipboard.clone();
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            // Clipboard helpers are child processes; keep them off the runtime threads.
            let joined = tokio::task::spawn_blocking(move || {
                run_command(&input, session, clipboard.as_ref())
            })
            .await;
            let result = joined.unwrap_or_else(|err| {
                warn!(error = %err, "command task failed");
                Err(CommandError::Clipboard(err.to_string()))
            });
            dispatcher.dispatch(AppAction::ActionCompleted { result });
        });
    }

    fn spawn_delayed(&self, delay: Duration, action: AppAction) {
        let dispatcher = self.dispatcher.clone();
        if delay.is_zero() {
            dispatcher.dispatch(action);
            return;
        }
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            dispatcher.dispatch(action);
        });
    }
}
