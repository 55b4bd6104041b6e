use crate::error::LlmError;
use crate::llm::defs::{ApiKey, CompletionProvider, CompletionRequest};

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted provider that records every completion it serves
pub(crate) struct StubProvider {
    reply: Result<String, String>,
    models: Result<Vec<String>, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl StubProvider {
    pub(crate) fn replying(text: &str) -> StubProvider {
        StubProvider {
            reply: Ok(text.to_string()),
            models: Ok(vec![String::from("gpt-3.5-turbo"), String::from("gpt-4o")]),
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn failing(message: &str) -> StubProvider {
        StubProvider {
            reply: Err(message.to_string()),
            models: Err(message.to_string()),
            ..StubProvider::replying("")
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> StubProvider {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn get_provider_name(&self) -> String {
        "Stub".to_string()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.reply.clone().map_err(LlmError::Request)
    }

    async fn list_models(&self, _api_key: &ApiKey) -> Result<Vec<String>, LlmError> {
        self.models.clone().map_err(LlmError::Request)
    }
}
