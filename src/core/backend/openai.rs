use async_trait::async_trait;

use super::{ChatBackend, ChatTurn, ConnectedModel};
use crate::api::models::{fetch_models, sort_models};
use crate::api::ChatRequest;
use crate::core::chat_stream::{decode_sse_line, fragment_stream, FragmentStream};
use crate::core::error::ChatError;
use crate::utils::url::{construct_api_url, normalize_base_url};

/// OpenAI-compatible chat completions over Server-Sent Events.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiBackend {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: String) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            api_key,
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let mut models = fetch_models(&self.client, &self.base_url, &self.api_key)
            .await?
            .data;
        sort_models(&mut models);
        Ok(models.into_iter().map(|model| model.id).collect())
    }

    async fn connected_model(&self, configured: &str) -> Result<ConnectedModel, ChatError> {
        Ok(ConnectedModel::Named(configured.to_string()))
    }

    fn stream_chat(&self, turn: ChatTurn) -> FragmentStream {
        let request = ChatRequest {
            model: turn.model,
            messages: turn.messages,
            temperature: turn.temperature,
            stream: true,
        };
        let http_request = self
            .client
            .post(construct_api_url(&self.base_url, "chat/completions"))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request);

        fragment_stream(http_request, decode_sse_line)
    }
}
