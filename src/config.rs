use crate::error::ConfigError;
use crate::llm::defs::ApiKey;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const API_KEY_PLACEHOLDER: &str = "[insert api key here]";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Completion backends that can serve a review
pub enum OpenAIProvider {
    #[default]
    OpenAI,
    OpenRouter,
}

impl OpenAIProvider {
    /// Base URL of the provider's OpenAI-compatible API
    pub fn get_endpoint(&self) -> &'static str {
        match self {
            OpenAIProvider::OpenAI => "https://api.openai.com/v1",
            OpenAIProvider::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Environment variable conventionally holding the provider's key
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            OpenAIProvider::OpenAI => "OPENAI_API_KEY",
            OpenAIProvider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub enum CustomPromptMode {
    #[default]
    None,

    Replace,
    Suffix,
    Prefix,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
/// LLM provider specific configuration
pub struct LLMConfig {
    pub configuration_name: String,
    pub provider: OpenAIProvider,
    pub model_id: String,
    pub api_key: String,
    /// Overrides the provider's conventional key variable
    pub api_key_env: Option<String>,
    /// Overrides the provider's endpoint, for proxies and compatible gateways
    pub base_url: Option<String>,

    pub temperature: f64,
    pub max_tokens: Option<u64>,
    pub timeout_secs: Option<u64>,

    pub custom_prompt_mode: CustomPromptMode,
    pub custom_prompt: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Human readable name used by `GET /`
    pub service_name: String,
    /// Identifier reported by `GET /health`
    pub service_id: String,
    pub enable_debug: bool,
    pub max_body_bytes: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CorsConfig {
    /// `"*"` allows any origin
    pub allow_origins: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
/// Main configuration structure, used in `~/.config/qm-review/config.toml`
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub default_llm_config: String,
    pub llm_configs: Vec<LLMConfig>,
}

// -----------------------------------

impl Default for LLMConfig {
    fn default() -> Self {
        LLMConfig {
            configuration_name: String::from("default"),
            provider: OpenAIProvider::OpenAI,
            model_id: String::from("gpt-3.5-turbo"),
            api_key: String::from(API_KEY_PLACEHOLDER),
            api_key_env: None,
            base_url: None,
            temperature: 0.3,
            max_tokens: None,
            timeout_secs: None,
            custom_prompt_mode: CustomPromptMode::None,
            custom_prompt: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: String::from("0.0.0.0"),
            port: 8000,
            service_name: String::from("QuantumMind Code Review API"),
            service_id: String::from("quantummind-code-review"),
            enable_debug: true,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            allow_origins: vec![String::from("*")],
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let llm_default_config: LLMConfig = Default::default();

        ServiceConfig {
            server: Default::default(),
            cors: Default::default(),
            default_llm_config: llm_default_config.configuration_name.clone(),
            llm_configs: vec![llm_default_config],
        }
    }
}

impl LLMConfig {
    /// Name of the environment variable consulted for the credential
    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_key_env())
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or_else(|| self.provider.get_endpoint())
    }

    /// Resolve the credential: environment first, then the config file value.
    ///
    /// Empty values and the placeholder count as unset.
    pub fn resolve_api_key<F>(&self, lookup: F) -> Option<ApiKey>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(self.api_key_env())
            .and_then(ApiKey::parse)
            .or_else(|| ApiKey::parse(self.api_key.clone()))
    }
}

impl ServiceConfig {
    /// Load from the default location, falling back to defaults if the file is absent
    pub fn load_default() -> Result<ServiceConfig, ConfigError> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(ServiceConfig::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<ServiceConfig, ConfigError> {
        let config: ServiceConfig = toml::from_str(contents)?;

        let mut names = HashSet::new();
        for llm in &config.llm_configs {
            if !names.insert(llm.configuration_name.clone()) {
                return Err(ConfigError::DuplicateLlmConfig(
                    llm.configuration_name.clone(),
                ));
            }
        }

        Ok(config)
    }

    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qm-review").join("config.toml"))
    }

    /// Pick the LLM configuration named by `selection`, or the default one
    pub fn select_llm_config(&self, selection: Option<&str>) -> Result<LLMConfig, ConfigError> {
        let key = selection.unwrap_or(self.default_llm_config.as_str());
        self.llm_configs
            .iter()
            .find(|c| c.configuration_name == key)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownLlmConfig(key.to_string()))
    }

    /// Copy safe to print: file-stored API keys are replaced by the placeholder
    pub fn redacted(&self) -> ServiceConfig {
        let mut config = self.clone();
        for llm in &mut config.llm_configs {
            if ApiKey::parse(llm.api_key.clone()).is_some() {
                llm.api_key = String::from(API_KEY_PLACEHOLDER);
            }
        }
        config
    }

    /// Apply overrides from the process environment
    ///
    /// Supported variables:
    /// - QM_REVIEW_HOST
    /// - QM_REVIEW_PORT, or PORT as used by most hosting platforms
    /// - QM_REVIEW_MODEL: model id for every LLM configuration
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("QM_REVIEW_HOST") {
            self.server.host = host;
        }

        let port = ["QM_REVIEW_PORT", "PORT"].into_iter().find_map(|name| {
            let value = lookup(name)?;
            match value.parse::<u16>() {
                Ok(port) => Some(port),
                Err(e) => {
                    warn!(%name, %value, error = %e, "ignoring invalid port");
                    None
                }
            }
        });
        if let Some(port) = port {
            self.server.port = port;
        }

        if let Some(model) = lookup("QM_REVIEW_MODEL") {
            for llm in &mut self.llm_configs {
                llm.model_id = model.clone();
            }
        }

        self
    }

    pub fn with_cli_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }
}
