use std::collections::HashMap;

use async_trait::async_trait;

use super::{ChatBackend, ChatTurn, ConnectedModel};
use crate::api::models::fetch_ollama_tags;
use crate::api::OllamaChatRequest;
use crate::core::chat_stream::{decode_ndjson_line, fragment_stream, FragmentStream};
use crate::core::error::ChatError;
use crate::utils::url::{construct_api_url, normalize_base_url};

/// Ollama's native `/api/chat`, streamed as newline-delimited JSON.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaBackend {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let tags = fetch_ollama_tags(&self.client, &self.base_url).await?;
        Ok(tags.models.into_iter().map(|model| model.name).collect())
    }

    async fn connected_model(&self, _configured: &str) -> Result<ConnectedModel, ChatError> {
        Ok(self
            .list_models()
            .await?
            .into_iter()
            .next()
            .map(ConnectedModel::Named)
            .unwrap_or(ConnectedModel::NotAvailable))
    }

    fn stream_chat(&self, turn: ChatTurn) -> FragmentStream {
        let mut options = HashMap::new();
        options.insert("temperature".to_string(), serde_json::json!(turn.temperature));
        let request = OllamaChatRequest {
            model: turn.model,
            messages: turn.messages,
            stream: true,
            options,
        };
        let http_request = self
            .client
            .post(construct_api_url(&self.base_url, "api/chat"))
            .json(&request);

        fragment_stream(http_request, decode_ndjson_line)
    }
}
