//! Asking the completion service a question.
//!
//! [`ChatClient::ask`] extends a conversation with the user's prompt and the
//! assistant's replies. Raw response bodies are replayed from the injected
//! [`ResponseCache`] when the exact prompt text was asked before, so identical
//! prompts never reach the network twice.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{extract_error_summary, ChatRequest, ChatResponse};
use crate::core::cache::{CacheKey, ResponseCache};
use crate::core::conversation::Conversation;
use crate::core::message::Message;
use crate::utils::url::construct_api_url;

#[derive(Debug)]
pub enum TransportError {
    Request(reqwest::Error),
    Status { status: u16, summary: Option<String> },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(source) => write!(f, "request failed: {source}"),
            TransportError::Status {
                status,
                summary: Some(summary),
            } => write!(f, "API returned error ({status}): {summary}"),
            TransportError::Status {
                status,
                summary: None,
            } => write!(f, "API returned error ({status})"),
        }
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            TransportError::Request(source) => Some(source),
            TransportError::Status { .. } => None,
        }
    }
}

#[derive(Debug)]
pub enum AskError {
    /// No credential is configured; nothing was sent.
    MissingCredential,
    Transport(TransportError),
    InvalidResponse(serde_json::Error),
}

impl fmt::Display for AskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskError::MissingCredential => write!(f, "missing API key"),
            AskError::Transport(source) => write!(f, "{source}"),
            AskError::InvalidResponse(source) => write!(f, "invalid API response: {source}"),
        }
    }
}

impl StdError for AskError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AskError::MissingCredential => None,
            AskError::Transport(source) => Some(source),
            AskError::InvalidResponse(source) => Some(source),
        }
    }
}

impl From<TransportError> for AskError {
    fn from(value: TransportError) -> Self {
        AskError::Transport(value)
    }
}

/// Sends one completion request and returns the raw response body.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest, api_key: &str) -> Result<Vec<u8>, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest, api_key: &str) -> Result<Vec<u8>, TransportError> {
        let chat_url = construct_api_url(&self.base_url, "chat/completions");
        debug!(url = %chat_url, messages = request.messages.len(), "sending completion request");

        let response = self
            .client
            .post(chat_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {api_key}"))
            .json(request)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                summary: extract_error_summary(&body),
            });
        }

        let body = response.bytes().await.map_err(TransportError::Request)?;
        Ok(body.to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Clone)]
pub struct ChatClient {
    transport: Arc<dyn CompletionTransport>,
    cache: Arc<dyn ResponseCache>,
    settings: ClientSettings,
}

impl ChatClient {
    pub fn new(
        transport: Arc<dyn CompletionTransport>,
        cache: Arc<dyn ResponseCache>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            transport,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Ask `prompt` in the context of `conversation`.
    ///
    /// On success the result is `conversation` followed by the user prompt and
    /// every returned choice. On failure the caller's conversation is untouched.
    pub async fn ask(
        &self,
        conversation: &Conversation,
        prompt: &str,
    ) -> Result<Conversation, AskError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(AskError::MissingCredential)?;

        let mut query = conversation.with_message(Message::user(prompt));
        let key = CacheKey::for_prompt(prompt);

        let (body, from_cache) = match self.cache.lookup(&key) {
            Some(body) => {
                debug!(key = key.as_str(), "response cache hit");
                (body, true)
            }
            None => {
                debug!(key = key.as_str(), "response cache miss");
                let request = ChatRequest {
                    model: self.settings.model.clone(),
                    messages: query.messages().to_vec(),
                };
                (self.transport.send(&request, api_key).await?, false)
            }
        };

        let response = ChatResponse::parse(&body).map_err(AskError::InvalidResponse)?;

        if !from_cache {
            if let Err(err) = self.cache.store(&key, &body) {
                warn!(key = key.as_str(), error = %err, "failed to store cached response");
            }
        }

        for choice in response.choices {
            query.push(choice.message);
        }
        Ok(query)
    }

    /// Like [`ask`](Self::ask), but never fails: an error is reported as an
    /// assistant message appended to the unmodified original conversation.
    pub async fn ask_or_explain(&self, conversation: &Conversation, prompt: &str) -> Conversation {
        match self.ask(conversation, prompt).await {
            Ok(updated) => updated,
            Err(err) => {
                warn!(error = %err, "completion request failed");
                conversation.with_message(Message::assistant(err.to_string()))
            }
        }
    }
}
