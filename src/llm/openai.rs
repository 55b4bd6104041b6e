use crate::config::OpenAIProvider;
use crate::error::LlmError;
use crate::llm::defs::{ApiKey, CompletionProvider, CompletionRequest};
use crate::llm::{fetch_model_ids, run_agent};

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::providers::openai;

/// OpenAI over the Chat Completions API (`POST /chat/completions`)
pub struct OpenAIClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    pub fn new() -> OpenAIClient {
        Self::with_base_url(OpenAIProvider::OpenAI.get_endpoint())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> OpenAIClient {
        OpenAIClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenAIClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for OpenAIClient {
    fn get_provider_name(&self) -> String {
        format!("{:?}", OpenAIProvider::OpenAI)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let client: openai::CompletionsClient = openai::CompletionsClient::builder()
            .api_key(request.api_key.expose())
            .base_url(&self.base_url)
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        let model = client.completion_model(&request.model);
        run_agent(model, &request).await
    }

    async fn list_models(&self, api_key: &ApiKey) -> Result<Vec<String>, LlmError> {
        fetch_model_ids(&self.http, &self.base_url, api_key).await
    }
}
