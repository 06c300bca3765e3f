use crate::core::conversation::{CodeSnippet, Conversation};

/// What the session is waiting for. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    AwaitingInput,
    AwaitingResponse,
    AwaitingAction,
}

impl Status {
    pub fn hint(self) -> &'static str {
        match self {
            Status::AwaitingInput => "Enter to send, Ctrl+D to quit",
            Status::AwaitingResponse => "... Awaiting response ...",
            Status::AwaitingAction => "Enter command",
        }
    }

    pub fn prompt_marker(self) -> &'static str {
        match self {
            Status::AwaitingAction => "",
            Status::AwaitingInput | Status::AwaitingResponse => "> ",
        }
    }
}

/// Which set of surfaces is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Chat,
    CodeSelection,
}

/// Snippets offered in code selection mode and the one currently chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetSelection {
    snippets: Vec<CodeSnippet>,
    selected: Option<usize>,
}

impl SnippetSelection {
    /// The first snippet starts out selected when there is one.
    pub fn from_snippets(snippets: Vec<CodeSnippet>) -> Self {
        let selected = if snippets.is_empty() { None } else { Some(0) };
        Self { snippets, selected }
    }

    pub fn snippets(&self) -> &[CodeSnippet] {
        &self.snippets
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_snippet(&self) -> Option<&CodeSnippet> {
        self.selected.and_then(|idx| self.snippets.get(idx))
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn select_next(&mut self) {
        self.selected = wrap_next_index(self.selected.unwrap_or(0), self.snippets.len());
    }

    pub fn select_previous(&mut self) {
        self.selected = wrap_previous_index(self.selected.unwrap_or(0), self.snippets.len());
    }

    pub fn select_first(&mut self) {
        self.selected = if self.snippets.is_empty() { None } else { Some(0) };
    }

    pub fn select_last(&mut self) {
        self.selected = self.snippets.len().checked_sub(1);
    }
}

fn wrap_previous_index(current: usize, total: usize) -> Option<usize> {
    if total == 0 {
        None
    } else if current == 0 {
        Some(total - 1)
    } else {
        Some(current - 1)
    }
}

fn wrap_next_index(current: usize, total: usize) -> Option<usize> {
    if total == 0 {
        None
    } else {
        Some((current + 1) % total)
    }
}

/// Controller-owned state that asynchronous actions receive as a snapshot and
/// hand back whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub mode: Mode,
    pub conversation: Conversation,
    pub selection: SnippetSelection,
    status: Status,
    status_message: Option<String>,
}

impl Session {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            mode: Mode::Chat,
            conversation,
            selection: SnippetSelection::default(),
            status: Status::AwaitingInput,
            status_message: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Switch status; this also drops any transient status message.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.status_message = None;
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status_line(&self) -> &str {
        self.status_message
            .as_deref()
            .unwrap_or_else(|| self.status.hint())
    }

    /// Enter code selection with a freshly extracted snippet list.
    pub fn enter_selection(&mut self) {
        self.mode = Mode::CodeSelection;
        self.selection = SnippetSelection::from_snippets(self.conversation.code_snippets());
    }

    pub fn leave_selection(&mut self) {
        self.mode = Mode::Chat;
        self.selection = SnippetSelection::default();
    }
}
