use ratatui::crossterm::event::KeyCode;

use super::input::run_command;
use super::{App, AppAction, AppCommand, Status};
use crate::commands::Command;

pub(super) fn handle_selection_action(app: &mut App, action: AppAction) -> Vec<AppCommand> {
    match action {
        AppAction::Escape => {
            app.session.leave_selection();
            app.session.set_status(Status::AwaitingInput);
            app.ui.prompt.resume();
            vec![AppCommand::refresh_now()]
        }
        AppAction::Submit | AppAction::Copy => {
            // The command works on the snapshot, so the list can go right away.
            let command = run_command(app, Command::CopySelected.name());
            app.session.leave_selection();
            app.session.set_status(Status::AwaitingInput);
            vec![command]
        }
        AppAction::EnterSelectionMode => {
            vec![run_command(app, Command::SelectCode.name())]
        }
        AppAction::QuitRequested => {
            if app.session.status() != Status::AwaitingResponse {
                app.ui.exit_requested = true;
            }
            Vec::new()
        }
        AppAction::Key(key) => {
            let selection = &mut app.session.selection;
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => selection.select_previous(),
                KeyCode::Down | KeyCode::Char('j') => selection.select_next(),
                KeyCode::Home | KeyCode::Char('g') => selection.select_first(),
                KeyCode::End | KeyCode::Char('G') => selection.select_last(),
                _ => {}
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}
