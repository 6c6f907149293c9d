//! Backend strategies.
//!
//! [`ChatBot`](crate::core::chatbot::ChatBot) holds exactly one
//! [`ChatBackend`] chosen by the current [`BackendKind`]; every call site goes
//! through the trait instead of branching on the kind.

mod ollama;
mod openai;

pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use std::fmt;

use async_trait::async_trait;

use crate::api::ChatMessage;
use crate::core::chat_stream::FragmentStream;
use crate::core::config::BackendKind;
use crate::core::error::ChatError;

/// What the backend reports as the model answering requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectedModel {
    Named(String),
    /// The server answered but lists no models.
    NotAvailable,
}

impl fmt::Display for ConnectedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectedModel::Named(name) => f.write_str(name),
            ConnectedModel::NotAvailable => f.write_str("not available"),
        }
    }
}

/// Everything one streamed completion call needs, owned so the resulting
/// stream borrows nothing from the adapter.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>, ChatError>;

    async fn connected_model(&self, configured: &str) -> Result<ConnectedModel, ChatError>;

    /// Build a lazy stream; no request is sent until it is polled.
    fn stream_chat(&self, turn: ChatTurn) -> FragmentStream;
}

/// Build the client for `kind`, or `None` when it cannot make requests.
pub fn build_backend(
    kind: BackendKind,
    base_url: &str,
    api_key: Option<String>,
) -> Option<Box<dyn ChatBackend>> {
    let client = reqwest::Client::new();
    match kind {
        BackendKind::OpenAi => {
            let api_key = api_key?;
            Some(Box::new(OpenAiBackend::new(client, base_url, api_key)))
        }
        BackendKind::Ollama => Some(Box::new(OllamaBackend::new(client, base_url))),
    }
}
