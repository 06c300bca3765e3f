//! Colon commands: parsing the closed command set and running it against a
//! session snapshot.

mod registry;

pub use registry::{all_commands, find_command, CommandSpec};

use std::error::Error as StdError;
use std::fmt;

use tracing::debug;

use crate::core::app::Session;
use crate::utils::clipboard::Clipboard;

/// Leading character that marks prompt text as a command.
pub const COMMAND_PREFIX: char = ':';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Copy code when the chat has any, the transcript otherwise.
    Copy,
    CopyCode,
    CopyAll,
    CopySelected,
    SelectCode,
}

impl Command {
    /// Canonical input that parses back to this command.
    pub fn name(self) -> &'static str {
        match self {
            Command::Copy => "copy",
            Command::CopyCode => "copy code",
            Command::CopyAll => "copy all",
            Command::CopySelected => "copyselected",
            Command::SelectCode => "selcode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownCommand,
    AmbiguousCopyTarget,
    NothingToCopy,
    NoSelection,
    Clipboard(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand => write!(f, "unknown command"),
            CommandError::AmbiguousCopyTarget => write!(f, "not sure what you wanna copy"),
            CommandError::NothingToCopy => write!(f, "no code to copy"),
            CommandError::NoSelection => write!(f, "no item selected"),
            CommandError::Clipboard(message) => write!(f, "clipboard error: {message}"),
        }
    }
}

impl StdError for CommandError {}

pub fn is_command(input: &str) -> bool {
    input.starts_with(COMMAND_PREFIX)
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let input = input.strip_prefix(COMMAND_PREFIX).unwrap_or(input);
    let mut parts = input.trim().splitn(2, ' ');
    let name = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");

    let spec = find_command(name).ok_or(CommandError::UnknownCommand)?;
    if !spec.accepts_copy_target || target.is_empty() {
        return Ok(spec.command);
    }

    match target {
        "code" => Ok(Command::CopyCode),
        "all" => Ok(Command::CopyAll),
        _ => Err(CommandError::AmbiguousCopyTarget),
    }
}

/// Parse `input` and run it.
pub fn run_command(
    input: &str,
    session: Session,
    clipboard: &dyn Clipboard,
) -> Result<Session, CommandError> {
    let command = parse_command(input)?;
    debug!(?command, input, "executing command");
    execute(command, session, clipboard)
}

/// Run `command` on a session snapshot and return the session to adopt.
/// Only the selection commands change the session; copies only read it.
pub fn execute(
    command: Command,
    mut session: Session,
    clipboard: &dyn Clipboard,
) -> Result<Session, CommandError> {
    match command {
        Command::Copy => {
            let fallback = if session.conversation.parse_code().is_empty() {
                Command::CopyAll
            } else {
                Command::CopyCode
            };
            execute(fallback, session, clipboard)
        }
        Command::CopyCode => {
            let code = session.conversation.parse_code();
            if code.is_empty() {
                return Err(CommandError::NothingToCopy);
            }
            write_clipboard(clipboard, code.join("\n\n").trim())?;
            Ok(session)
        }
        Command::CopyAll => {
            write_clipboard(clipboard, &session.conversation.transcript())?;
            Ok(session)
        }
        Command::SelectCode => {
            session.enter_selection();
            Ok(session)
        }
        Command::CopySelected => {
            let text = session
                .selection
                .selected_snippet()
                .map(|snippet| snippet.text.trim().to_string())
                .ok_or(CommandError::NoSelection)?;
            session.leave_selection();
            write_clipboard(clipboard, &text)?;
            Ok(session)
        }
    }
}

fn write_clipboard(clipboard: &dyn Clipboard, text: &str) -> Result<(), CommandError> {
    clipboard.write_all(text).map_err(CommandError::Clipboard)
}
