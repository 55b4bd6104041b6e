use crate::config::API_KEY_PLACEHOLDER;
use crate::error::LlmError;

use async_trait::async_trait;
use std::fmt;

/// Opaque provider credential. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for empty values and the config placeholder
    pub fn parse(raw: String) -> Option<ApiKey> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == API_KEY_PLACEHOLDER {
            None
        } else {
            Some(ApiKey(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First four characters followed by `...`
    pub fn redacted_prefix(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.redacted_prefix())
    }
}

/// A single two-message chat completion
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub api_key: ApiKey,
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f64,
    pub max_tokens: Option<u64>,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn get_provider_name(&self) -> String;

    /// Text of the first completion choice
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;

    /// Identifiers of the models visible to `api_key`
    async fn list_models(&self, api_key: &ApiKey) -> Result<Vec<String>, LlmError>;
}
