use serde::{Deserialize, Serialize};

use crate::review::DEFAULT_LANGUAGE;

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[derive(Deserialize, Debug)]
pub struct ReviewIn {
    pub code: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Success,
}

#[derive(Serialize, Debug)]
pub struct ReviewOut {
    pub review: String,
    pub status: ReviewStatus,
    pub model: String,
}

#[derive(Serialize)]
pub struct RootOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub status: &'static str,
    pub service: String,
    pub timestamp: String,
}

#[derive(Serialize, Debug)]
pub struct DebugOut {
    pub api_key_set: bool,
    pub api_key_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_prefix: Option<String>,
    pub api_key_env: String,
    pub provider: String,
    pub model: String,
    /// `success`, `failed` or `skipped` when no key is set
    pub connection_test: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models_available: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ErrorOut {
    pub detail: String,
}
