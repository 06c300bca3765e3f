use ratatui::crossterm::event::{KeyCode, KeyEvent};

use super::{App, AppAction, AppCommand, Status};
use crate::commands::{self, Command};

pub(super) fn handle_chat_action(app: &mut App, action: AppAction) -> Vec<AppCommand> {
    match action {
        AppAction::QuitRequested => {
            if app.session.status() != Status::AwaitingResponse {
                app.ui.exit_requested = true;
            }
            Vec::new()
        }
        AppAction::Escape => {
            toggle_command_entry(app);
            Vec::new()
        }
        AppAction::EnterSelectionMode => {
            vec![run_command(app, Command::SelectCode.name())]
        }
        AppAction::Copy => vec![run_command(app, Command::Copy.name())],
        AppAction::Submit => submit(app),
        AppAction::Key(key) => {
            handle_key(app, key);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn toggle_command_entry(app: &mut App) {
    match app.session.status() {
        Status::AwaitingInput => app.session.set_status(Status::AwaitingAction),
        Status::AwaitingAction => app.session.set_status(Status::AwaitingInput),
        Status::AwaitingResponse => {}
    }
}

fn submit(app: &mut App) -> Vec<AppCommand> {
    if app.session.status() == Status::AwaitingResponse || app.ui.prompt.text().is_empty() {
        return vec![AppCommand::refresh_now()];
    }

    let text = app.ui.prompt.commit();
    if commands::is_command(&text) {
        app.session.set_status(Status::AwaitingAction);
    }

    match app.session.status() {
        Status::AwaitingAction => vec![run_command(app, &text)],
        _ => {
            app.session.set_status(Status::AwaitingResponse);
            vec![
                AppCommand::Fetch {
                    prompt: text,
                    conversation: app.session.conversation.clone(),
                },
                AppCommand::refresh_now(),
            ]
        }
    }
}

pub(super) fn run_command(app: &App, input: &str) -> AppCommand {
    AppCommand::RunCommand {
        input: input.to_string(),
        session: app.session.clone(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let viewport = &mut app.ui.viewport;
    match key.code {
        KeyCode::Up => viewport.scroll_up(1),
        KeyCode::Down => viewport.scroll_down(1),
        KeyCode::PageUp => viewport.page_up(),
        KeyCode::PageDown => viewport.page_down(),
        _ => {
            app.ui.prompt.input(key);
        }
    }
}
