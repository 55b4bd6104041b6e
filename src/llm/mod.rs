pub mod defs;
pub mod openai;
pub mod openrouter;

#[cfg(test)]
pub(crate) mod mock;
#[cfg(test)]
pub(crate) mod stub;

use crate::config::{LLMConfig, OpenAIProvider};
use crate::error::LlmError;
use crate::llm::defs::{ApiKey, CompletionProvider, CompletionRequest};

use rig::agent::AgentBuilder;
use rig::completion::{CompletionModel, Prompt};
use serde::Deserialize;
use std::sync::Arc;

pub fn create_llm_provider(config: &LLMConfig) -> Arc<dyn CompletionProvider> {
    let endpoint = config.endpoint();
    match config.provider {
        OpenAIProvider::OpenAI => Arc::new(openai::OpenAIClient::with_base_url(endpoint)),
        OpenAIProvider::OpenRouter => {
            Arc::new(openrouter::OpenRouterClient::with_base_url(endpoint))
        }
    }
}

/// Run one non-streaming agent prompt: system preamble, user turn, sampling settings
pub(crate) async fn run_agent<M>(model: M, request: &CompletionRequest) -> Result<String, LlmError>
where
    M: CompletionModel,
{
    let mut builder = AgentBuilder::new(model)
        .preamble(&request.system_prompt)
        .temperature(request.temperature);
    if let Some(max_tokens) = request.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    let agent = builder.build();

    let text = agent
        .prompt(request.user_prompt.as_str())
        .await
        .map_err(|e| LlmError::Request(e.to_string()))?;

    ensure_text(text)
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// `GET {endpoint}/models` against an OpenAI-compatible API
pub(crate) async fn fetch_model_ids(
    http: &reqwest::Client,
    endpoint: &str,
    api_key: &ApiKey,
) -> Result<Vec<String>, LlmError> {
    let response = http
        .get(format!("{endpoint}/models"))
        .bearer_auth(api_key.expose())
        .send()
        .await
        .map_err(|e| LlmError::Request(e.to_string()))?
        .error_for_status()
        .map_err(|e| LlmError::Request(e.to_string()))?;

    let models: ModelList = response
        .json()
        .await
        .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

    Ok(models.data.into_iter().map(|m| m.id).collect())
}

/// Reject replies with no text instead of handing an empty review back
pub(crate) fn ensure_text(text: String) -> Result<String, LlmError> {
    if text.is_empty() {
        Err(LlmError::MalformedResponse(String::from(
            "completion carried no message text",
        )))
    } else {
        Ok(text)
    }
}
