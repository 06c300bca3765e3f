use super::*;
use crate::commands::{self, CommandError};
use crate::core::message::Message;
use crate::utils::clipboard::MemoryClipboard;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

mod test_helpers {
    use super::*;

    pub(super) fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            apply_action(app, AppAction::Key(key(KeyCode::Char(ch))));
        }
    }

    pub(super) fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Resolve commands the way the chat loop would, minus the delays and the
    /// network. Fetches are handed back for the test to complete.
    pub(super) fn settle(
        app: &mut App,
        mut pending: Vec<AppCommand>,
        clipboard: &MemoryClipboard,
    ) -> Vec<AppCommand> {
        let mut fetches = Vec::new();
        while !pending.is_empty() {
            let mut next = Vec::new();
            for command in pending {
                let action = match command {
                    AppCommand::Fetch { .. } => {
                        fetches.push(command);
                        continue;
                    }
                    AppCommand::RunCommand { input, session } => AppAction::ActionCompleted {
                        result: commands::run_command(&input, session, clipboard),
                    },
                    AppCommand::SwitchStatusAfter { status, .. } => {
                        AppAction::SwitchStatus { status }
                    }
                    AppCommand::Refresh { .. } => AppAction::Refresh,
                };
                next.extend(apply_action(app, action));
            }
            pending = next;
        }
        fetches
    }

    pub(super) fn code_conversation() -> Conversation {
        Conversation::from(vec![
            Message::user("print hello"),
            Message::assistant("```python\nprint('hello')\n```\n```sh\necho hello\n```"),
        ])
    }
}

use test_helpers::{code_conversation, key, settle, type_text};

fn state(app: &App) -> (Mode, Status) {
    (app.session.mode, app.session.status())
}

#[test]
fn starts_in_chat_awaiting_input() {
    let app = App::new(Conversation::new());
    assert_eq!(state(&app), (Mode::Chat, Status::AwaitingInput));
    assert!(app.ui.prompt.is_editing());
}

#[test]
fn escape_toggles_command_entry() {
    let mut app = App::new(Conversation::new());
    apply_action(&mut app, AppAction::Escape);
    assert_eq!(state(&app), (Mode::Chat, Status::AwaitingAction));
    assert_eq!(app.session.status_line(), "Enter command");

    apply_action(&mut app, AppAction::Escape);
    assert_eq!(state(&app), (Mode::Chat, Status::AwaitingInput));
}

#[test]
fn escape_is_ignored_while_awaiting_response() {
    let mut app = App::new(Conversation::new());
    type_text(&mut app, "hello");
    apply_action(&mut app, AppAction::Submit);
    assert_eq!(app.session.status(), Status::AwaitingResponse);

    apply_action(&mut app, AppAction::Escape);
    assert_eq!(state(&app), (Mode::Chat, Status::AwaitingResponse));
}

#[test]
fn escape_from_selection_always_returns_to_chat_input() {
    for status in [
        Status::AwaitingInput,
        Status::AwaitingAction,
        Status::AwaitingResponse,
    ] {
        let mut app = App::new(code_conversation());
        app.session.enter_selection();
        app.session.set_status(status);

        apply_action(&mut app, AppAction::Escape);
        assert_eq!(state(&app), (Mode::Chat, Status::AwaitingInput));
        assert!(app.session.selection.is_empty());
        assert!(app.ui.prompt.is_editing());
    }
}

#[test]
fn empty_submit_only_refreshes() {
    let mut app = App::new(Conversation::new());
    let commands = apply_action(&mut app, AppAction::Submit);
    assert_eq!(commands, vec![AppCommand::refresh_now()]);
    assert_eq!(state(&app), (Mode::Chat, Status::AwaitingInput));
    assert!(app.ui.prompt.is_editing());
}

#[test]
fn submit_dispatches_fetch_with_snapshot() {
    let mut app = App::new(Conversation::seeded_with_topic("rust"));
    type_text(&mut app, "hello");

    let commands = apply_action(&mut app, AppAction::Submit);
    assert_eq!(app.session.status(), Status::AwaitingResponse);
    assert_eq!(app.session.status_line(), "... Awaiting response ...");
    assert_eq!(app.ui.prompt.text(), "");
    assert!(!app.ui.prompt.is_editing());

    match &commands[0] {
        AppCommand::Fetch {
            prompt,
            conversation,
        } => {
            assert_eq!(prompt, "hello");
            assert_eq!(conversation, &app.session.conversation);
        }
        other => panic!("expected fetch, got {other:?}"),
    }
}

#[test]
fn quit_is_ignored_while_awaiting_response_but_cancel_is_not() {
    let mut app = App::new(Conversation::new());
    type_text(&mut app, "hello");
    apply_action(&mut app, AppAction::Submit);

    apply_action(&mut app, AppAction::QuitRequested);
    assert!(!app.should_quit());

    apply_action(&mut app, AppAction::Cancel);
    assert!(app.should_quit());
}

#[test]
fn quit_request_exits_when_idle() {
    let mut app = App::new(Conversation::new());
    apply_action(&mut app, AppAction::QuitRequested);
    assert!(app.should_quit());
}

#[test]
fn command_prefix_forces_action_status() {
    let mut app = App::new(Conversation::new());
    type_text(&mut app, ":ca");

    let commands = apply_action(&mut app, AppAction::Submit);
    assert_eq!(app.session.status(), Status::AwaitingAction);
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::RunCommand { input, .. }] if input == ":ca"
    ));
}

#[test]
fn text_submitted_in_action_status_runs_as_command() {
    let mut app = App::new(Conversation::new());
    apply_action(&mut app, AppAction::Escape);
    type_text(&mut app, "cc");

    let commands = apply_action(&mut app, AppAction::Submit);
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::RunCommand { input, .. }] if input == "cc"
    ));
}

#[test]
fn action_error_leaves_conversation_and_recovers_after_delay() {
    let mut app = App::new(code_conversation());
    let before = app.session.conversation.clone();
    app.session.set_status(Status::AwaitingAction);

    let commands = apply_action(
        &mut app,
        AppAction::ActionCompleted {
            result: Err(CommandError::UnknownCommand),
        },
    );
    assert_eq!(app.session.status_line(), "unknown command");
    assert_eq!(app.session.conversation, before);
    assert!(commands.contains(&AppCommand::SwitchStatusAfter {
        status: Status::AwaitingInput,
        delay: ERROR_RECOVERY_DELAY,
    }));

    apply_action(
        &mut app,
        AppAction::SwitchStatus {
            status: Status::AwaitingInput,
        },
    );
    assert_eq!(app.session.status(), Status::AwaitingInput);
    assert_eq!(app.session.status_line(), "Enter to send, Ctrl+D to quit");
    assert!(app.ui.prompt.is_editing());
}

#[test]
fn action_success_adopts_session_and_switches_immediately() {
    let mut app = App::new(code_conversation());
    let mut returned = app.session.clone();
    returned.enter_selection();

    let commands = apply_action(
        &mut app,
        AppAction::ActionCompleted {
            result: Ok(returned.clone()),
        },
    );
    assert_eq!(app.session, returned);
    assert!(commands.contains(&AppCommand::SwitchStatusAfter {
        status: Status::AwaitingInput,
        delay: std::time::Duration::ZERO,
    }));
}

#[test]
fn copy_result_keeps_an_answer_that_arrived_meanwhile() {
    let clipboard = MemoryClipboard::new();
    let mut app = App::new(Conversation::new());
    type_text(&mut app, "hello");
    let commands = apply_action(&mut app, AppAction::Submit);
    settle(&mut app, commands, &clipboard);

    let copy = apply_action(&mut app, AppAction::Copy);
    let snapshot = match copy.as_slice() {
        [AppCommand::RunCommand { session, .. }] => session.clone(),
        other => panic!("expected a command run, got {other:?}"),
    };

    let answered = Conversation::from(vec![Message::user("hello"), Message::assistant("hi")]);
    apply_action(
        &mut app,
        AppAction::FetchCompleted {
            conversation: answered,
        },
    );
    assert_eq!(app.session.conversation.len(), 2);

    let commands = apply_action(
        &mut app,
        AppAction::ActionCompleted {
            result: Ok(snapshot),
        },
    );
    settle(&mut app, commands, &clipboard);

    assert_eq!(app.session.conversation.len(), 2);
    assert_eq!(app.session.conversation.last_message_text(), "hi");
    assert_eq!(state(&app), (Mode::Chat, Status::AwaitingInput));
}

#[test]
fn selection_keys_move_the_list() {
    let mut app = App::new(code_conversation());
    app.session.enter_selection();

    apply_action(&mut app, AppAction::Key(key(KeyCode::Char('j'))));
    assert_eq!(app.session.selection.selected_index(), Some(1));
    apply_action(&mut app, AppAction::Key(key(KeyCode::Down)));
    assert_eq!(app.session.selection.selected_index(), Some(0));
    apply_action(&mut app, AppAction::Key(key(KeyCode::End)));
    assert_eq!(app.session.selection.selected_index(), Some(1));
    assert_eq!(app.ui.prompt.text(), "");
}

#[test]
fn copy_signal_depends_on_mode() {
    let mut app = App::new(code_conversation());
    let commands = apply_action(&mut app, AppAction::Copy);
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::RunCommand { input, .. }] if input == "copy"
    ));

    app.session.enter_selection();
    let commands = apply_action(&mut app, AppAction::Copy);
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::RunCommand { input, .. }] if input == "copyselected"
    ));
}

#[test]
fn copy_selected_snippet_through_the_loop() {
    let clipboard = MemoryClipboard::new();
    let mut app = App::new(code_conversation());

    let commands = apply_action(&mut app, AppAction::EnterSelectionMode);
    settle(&mut app, commands, &clipboard);
    assert_eq!(state(&app), (Mode::CodeSelection, Status::AwaitingInput));

    apply_action(&mut app, AppAction::Key(key(KeyCode::Down)));
    let commands = apply_action(&mut app, AppAction::Submit);
    settle(&mut app, commands, &clipboard);

    assert_eq!(clipboard.contents().as_deref(), Some("echo hello"));
    assert_eq!(state(&app), (Mode::Chat, Status::AwaitingInput));
}

#[test]
fn resize_clamps_and_rerenders() {
    let mut app = App::new(code_conversation());
    let commands = apply_action(
        &mut app,
        AppAction::Resize {
            width: 500,
            height: 2,
        },
    );
    assert_eq!((app.ui.width, app.ui.height), (120, 6));
    assert_eq!(commands, vec![AppCommand::refresh_now()]);

    apply_action(&mut app, AppAction::Refresh);
    assert!(app.ui.viewport.line_count() > 0);
    assert_eq!(app.ui.viewport.offset(), app.ui.viewport.max_offset());
}

#[test]
fn chat_arrow_keys_scroll_the_viewport() {
    let mut app = App::new(code_conversation());
    apply_action(&mut app, AppAction::Resize { width: 40, height: 6 });
    apply_action(&mut app, AppAction::Refresh);
    let bottom = app.ui.viewport.offset();
    assert!(bottom > 0);

    apply_action(&mut app, AppAction::Key(key(KeyCode::Up)));
    assert_eq!(app.ui.viewport.offset(), bottom - 1);
    assert_eq!(app.ui.prompt.text(), "");
}

#[test]
fn hello_round_trip() {
    let clipboard = MemoryClipboard::new();
    let mut app = App::new(Conversation::new());
    type_text(&mut app, "hello");

    let commands = apply_action(&mut app, AppAction::Submit);
    let fetches = settle(&mut app, commands, &clipboard);
    assert_eq!(fetches.len(), 1);
    assert_eq!(app.session.status(), Status::AwaitingResponse);

    let answered = Conversation::from(vec![Message::user("hello"), Message::assistant("hi")]);
    let commands = apply_action(
        &mut app,
        AppAction::FetchCompleted {
            conversation: answered,
        },
    );
    settle(&mut app, commands, &clipboard);

    assert_eq!(app.session.status(), Status::AwaitingInput);
    assert_eq!(app.session.conversation.len(), 2);
    assert!(app.ui.prompt.is_editing());
}

#[test]
fn select_code_then_enter_without_snippets_fails_back_to_chat() {
    let clipboard = MemoryClipboard::new();
    let mut app = App::new(Conversation::new());
    type_text(&mut app, ":sc");

    let commands = apply_action(&mut app, AppAction::Submit);
    settle(&mut app, commands, &clipboard);
    assert_eq!(app.session.mode, Mode::CodeSelection);

    let commands = apply_action(&mut app, AppAction::Submit);
    let [AppCommand::RunCommand { input, session }] = commands.as_slice() else {
        panic!("expected a single command, got {commands:?}");
    };
    let result = commands::run_command(input, session.clone(), &clipboard);
    assert_eq!(result, Err(CommandError::NoSelection));
    assert_eq!(app.session.mode, Mode::Chat);

    let commands = apply_action(&mut app, AppAction::ActionCompleted { result });
    assert_eq!(app.session.status_line(), "no item selected");
    settle(&mut app, commands, &clipboard);
    assert_eq!(state(&app), (Mode::Chat, Status::AwaitingInput));
    assert_eq!(clipboard.write_count(), 0);
}
