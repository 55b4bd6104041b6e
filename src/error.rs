//! Error types for the review service

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// No `[[llm_configs]]` entry carries the requested name
    #[error("no LLM configuration named `{0}`; add it to the config file or pick another with --llm")]
    UnknownLlmConfig(String),

    /// Two `[[llm_configs]]` entries share a `configuration_name`
    #[error("LLM configuration `{0}` is defined more than once")]
    DuplicateLlmConfig(String),
}

/// Errors raised by a completion provider
#[derive(Error, Debug)]
pub enum LlmError {
    /// The provider client could not be constructed
    #[error("client error: {0}")]
    Client(String),

    /// The call reached the provider but failed (auth, quota, network)
    #[error("{0}")]
    Request(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

/// Outcome of a failed review
#[derive(Error, Debug)]
pub enum ReviewError {
    /// No credential is available; the provider was not contacted
    #[error("API key is not set: export {env} or set api_key in the config file")]
    ConfigMissing { env: String },

    #[error("API Error: {0}")]
    Provider(String),
}

impl From<LlmError> for ReviewError {
    fn from(err: LlmError) -> Self {
        ReviewError::Provider(err.to_string())
    }
}
