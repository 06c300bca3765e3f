//! The conversation transcript and the code snippets that can be pulled out of it.
//!
//! A [`Conversation`] is the literal, ordered transcript that is both shown to the
//! user and sent upstream as the request payload. It only ever grows; a fetch
//! produces a whole new conversation instead of editing one in place.

use serde::{Deserialize, Serialize};

use crate::core::message::{Message, Role};

/// Delimiter line that opens and closes a fenced code block.
pub const FENCE_MARKER: &str = "```";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

/// A single extracted code block, numbered from 1 in transcript order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet {
    pub index: usize,
    pub text: String,
}

impl CodeSnippet {
    pub fn title(&self) -> String {
        format!("Code snippet {}", self.index)
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversation seeded with a system message describing the topic the
    /// assistant should help with.
    pub fn seeded_with_topic(topic: &str) -> Self {
        let mut conversation = Self::new();
        conversation.push(Message::system(format!(
            "You are a helpful assistant that helps with {topic}."
        )));
        conversation
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Copy of this conversation with `message` appended.
    pub fn with_message(&self, message: Message) -> Self {
        let mut next = self.clone();
        next.push(message);
        next
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Content of the final message, or an empty string for an empty conversation.
    pub fn last_message_text(&self) -> &str {
        self.messages
            .last()
            .map(|message| message.content.as_str())
            .unwrap_or("")
    }

    /// Every fenced code block found in assistant messages, in transcript order.
    pub fn parse_code(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|message| message.role.is_assistant())
            .flat_map(|message| extract_code_blocks(&message.content))
            .collect()
    }

    pub fn code_snippets(&self) -> Vec<CodeSnippet> {
        self.parse_code()
            .into_iter()
            .enumerate()
            .map(|(idx, text)| CodeSnippet {
                index: idx + 1,
                text: text.trim().to_string(),
            })
            .collect()
    }

    /// Plain-text transcript of every non-system message, blank-line separated.
    pub fn transcript(&self) -> String {
        let mut content = String::new();
        for message in &self.messages {
            let Some(label) = message.role.transcript_label() else {
                continue;
            };
            content.push_str("- ");
            content.push_str(label);
            content.push_str(": ");
            content.push_str(&message.content);
            content.push_str("\n\n");
        }
        content
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Extract the bodies of every terminated fenced block in `text`.
///
/// A block opens at a line starting with [`FENCE_MARKER`] (an info string such as
/// a language name may follow) and closes at the next line starting with the
/// marker. Interior lines are kept verbatim and the body is trimmed. A block that
/// is still open when the text ends yields nothing.
pub fn extract_code_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for line in text.split('\n') {
        match current.as_mut() {
            Some(body) => {
                if line.starts_with(FENCE_MARKER) {
                    blocks.push(body.trim().to_string());
                    current = None;
                } else {
                    body.push('\n');
                    body.push_str(line);
                }
            }
            None => {
                if line.starts_with(FENCE_MARKER) {
                    current = Some(String::new());
                }
            }
        }
    }

    blocks
}
