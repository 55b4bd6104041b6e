use crate::config::{CustomPromptMode, LLMConfig};
use crate::error::{LlmError, ReviewError};
use crate::llm::defs::{ApiKey, CompletionProvider, CompletionRequest};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_LANGUAGE: &str = "python";

const SYSTEM_PROMPT: &str = r#"
You are an experienced senior software engineer performing a code review. Your task is to provide constructive, professional, and helpful feedback.

Review Guidelines:

1.  Structure & Readability:
    - Check code formatting and indentation.
    - Assess variable/function names for clarity.
    - Evaluate overall code organization and modularity.

2.  Best Practices:
    - Identify code smells and anti-patterns.
    - Check for proper error handling.
    - Verify efficient use of data structures and algorithms.
    - Assess security vulnerabilities (if obvious).

3.  Performance:
    - Flag potential performance bottlenecks.
    - Suggest optimizations where appropriate.

4.  Output Format:
    - Use Markdown formatting.
    - Start with overall summary.
    - Group comments by category (READABILITY, PERFORMANCE, etc.).
    - For each issue: describe problem, suggest fix, and provide code example if helpful.
    - End with positive reinforcement.

Be concise but thorough. Focus on the most critical issues first.
Target language: Russian/English (based on the code comments).
"#;

/// The two strings sent to the completion provider for one review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Apply the configuration's custom prompt to the built-in system prompt
pub fn pack_system_prompt(llm_config: &LLMConfig) -> String {
    let custom = match llm_config.custom_prompt.as_deref() {
        Some(custom) => custom,
        None => return SYSTEM_PROMPT.to_string(),
    };

    match llm_config.custom_prompt_mode {
        CustomPromptMode::None => SYSTEM_PROMPT.to_string(),
        CustomPromptMode::Replace => custom.to_string(),
        CustomPromptMode::Prefix => format!("{custom}\n{SYSTEM_PROMPT}"),
        CustomPromptMode::Suffix => format!("{SYSTEM_PROMPT}\n{custom}"),
    }
}

/// Wrap `code` in a fence labelled with `language`.
///
/// The code is passed through verbatim: a snippet containing its own fence or
/// instructions aimed at the model reaches the provider unchanged.
pub fn build_user_prompt(code: &str, language: &str) -> String {
    format!("Please review this {language} code:\n\n```{language}\n{code}\n```\n")
}

pub fn build_prompt(system_prompt: &str, code: &str, language: &str) -> ReviewPrompt {
    ReviewPrompt {
        system_prompt: system_prompt.to_string(),
        user_prompt: build_user_prompt(code, language),
    }
}

/// State of the credential and provider as reported by `GET /debug`
#[derive(Debug, Clone)]
pub struct Diagnostics {
    pub api_key_set: bool,
    pub api_key_length: usize,
    pub api_key_prefix: Option<String>,
    pub api_key_env: String,
    pub provider: String,
    pub model: String,
    /// Number of listed models, or why the listing failed
    pub connection: Result<usize, String>,
}

/// Turns a (code, language) pair into a review with exactly one provider call
pub struct Reviewer {
    provider: Arc<dyn CompletionProvider>,
    llm_config: LLMConfig,
    api_key: Option<ApiKey>,
    system_prompt: String,
}

impl Reviewer {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        llm_config: LLMConfig,
        api_key: Option<ApiKey>,
    ) -> Reviewer {
        let system_prompt = pack_system_prompt(&llm_config);
        Reviewer {
            provider,
            llm_config,
            api_key,
            system_prompt,
        }
    }

    pub fn model(&self) -> &str {
        &self.llm_config.model_id
    }

    pub fn provider_name(&self) -> String {
        self.provider.get_provider_name()
    }

    pub fn prompt_for(&self, code: &str, language: &str) -> ReviewPrompt {
        build_prompt(&self.system_prompt, code, language)
    }

    /// Review `code` and return the provider's text untouched
    pub async fn review(&self, code: &str, language: &str) -> Result<String, ReviewError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| ReviewError::ConfigMissing {
                env: self.llm_config.api_key_env().to_string(),
            })?;

        let prompt = self.prompt_for(code, language);
        let request = CompletionRequest {
            api_key,
            model: self.llm_config.model_id.clone(),
            system_prompt: prompt.system_prompt,
            user_prompt: prompt.user_prompt,
            temperature: self.llm_config.temperature,
            max_tokens: self.llm_config.max_tokens,
        };

        info!(
            language,
            code_len = code.len(),
            model = %self.llm_config.model_id,
            "requesting review"
        );

        let reply = match self.llm_config.timeout_secs {
            Some(secs) => {
                match tokio::time::timeout(Duration::from_secs(secs), self.provider.complete(request))
                    .await
                {
                    Ok(reply) => reply,
                    Err(_) => Err(LlmError::Timeout(secs)),
                }
            }
            None => self.provider.complete(request).await,
        };

        match reply {
            Ok(text) => {
                debug!(review_len = text.len(), "review received");
                Ok(text)
            }
            Err(e) => {
                warn!(provider = %self.provider_name(), error = %e, "review failed");
                Err(e.into())
            }
        }
    }

    /// Report the credential state and try listing models
    pub async fn diagnose(&self) -> Diagnostics {
        let connection = match &self.api_key {
            Some(key) => self
                .provider
                .list_models(key)
                .await
                .map(|models| models.len())
                .map_err(|e| e.to_string()),
            None => Err(ReviewError::ConfigMissing {
                env: self.llm_config.api_key_env().to_string(),
            }
            .to_string()),
        };

        Diagnostics {
            api_key_set: self.api_key.is_some(),
            api_key_length: self.api_key.as_ref().map_or(0, ApiKey::len),
            api_key_prefix: self.api_key.as_ref().map(ApiKey::redacted_prefix),
            api_key_env: self.llm_config.api_key_env().to_string(),
            provider: self.provider_name(),
            model: self.llm_config.model_id.clone(),
            connection,
        }
    }
}
