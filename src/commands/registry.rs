use super::Command;

pub struct CommandSpec {
    pub names: &'static [&'static str],
    pub help: &'static str,
    pub command: Command,
    /// Whether a `code` / `all` target may follow the name.
    pub accepts_copy_target: bool,
}

pub fn all_commands() -> &'static [CommandSpec] {
    COMMANDS
}

/// Names are matched exactly; `CC` is not `cc`.
pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    all_commands()
        .iter()
        .find(|spec| spec.names.contains(&name))
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        names: &["c", "yy", "copy"],
        help: "Copy code from the chat if there is any, otherwise the whole transcript.",
        command: Command::Copy,
        accepts_copy_target: true,
    },
    CommandSpec {
        names: &["cc", "yc"],
        help: "Copy every code snippet, separated by blank lines.",
        command: Command::CopyCode,
        accepts_copy_target: false,
    },
    CommandSpec {
        names: &["ca", "ya"],
        help: "Copy the whole transcript.",
        command: Command::CopyAll,
        accepts_copy_target: false,
    },
    CommandSpec {
        names: &["sc", "selcode"],
        help: "Pick a single code snippet from a list.",
        command: Command::SelectCode,
        accepts_copy_target: false,
    },
    CommandSpec {
        names: &["copyselected"],
        help: "Copy the snippet chosen in the selection list.",
        command: Command::CopySelected,
        accepts_copy_target: false,
    },
];
