use crate::api::{ModelInfo, ModelsResponse, OllamaTagsResponse};
use crate::core::error::ChatError;
use crate::utils::url::construct_api_url;

/// Fetch the model catalogue of an OpenAI-compatible server.
pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Result<ModelsResponse, ChatError> {
    let models_url = construct_api_url(base_url, "models");
    let response = client
        .get(models_url)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {api_key}"))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ChatError::from_response(response).await);
    }

    Ok(response.json::<ModelsResponse>().await?)
}

/// Fetch the locally installed models of an Ollama server.
pub async fn fetch_ollama_tags(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<OllamaTagsResponse, ChatError> {
    let tags_url = construct_api_url(base_url, "api/tags");
    let response = client.get(tags_url).send().await?;

    if !response.status().is_success() {
        return Err(ChatError::from_response(response).await);
    }

    Ok(response.json::<OllamaTagsResponse>().await?)
}

pub fn sort_models(models: &mut [ModelInfo]) {
    // Newest first, then by id for a stable listing
    models.sort_by(|a, b| match (&a.created, &b.created) {
        (Some(a_created), Some(b_created)) => {
            b_created.cmp(a_created).then_with(|| a.id.cmp(&b.id))
        }
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
}
