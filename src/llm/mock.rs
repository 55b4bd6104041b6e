//! Local OpenAI-compatible server for exercising the real provider clients

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{OriginalUri, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

#[derive(Clone)]
pub(crate) enum ModelsReply {
    Ids(Vec<&'static str>),
    Unauthorized,
    NotJson,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    reply: String,
    models: ModelsReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockState {
    fn record(&self, uri: &OriginalUri, headers: &HeaderMap, body: &[u8]) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        self.requests.lock().unwrap().push(RecordedRequest {
            path: uri.path().to_string(),
            authorization,
            body: serde_json::from_slice(body).unwrap_or(Value::Null),
        });
    }
}

pub(crate) struct MockApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockApi {
    /// Serve `POST /chat/completions` answering `reply`, and `GET /models` per `models`
    pub async fn start(reply: &str, models: ModelsReply) -> MockApi {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply: reply.to_string(),
            models,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/chat/completions", post(chat_completions))
            .route("/models", get(list_models))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockApi {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn chat_completions(
    State(state): State<MockState>,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    state.record(&uri, &headers, &body);
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    Json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 0,
        "model": request["model"],
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": state.reply},
            "finish_reason": "stop"
        }]
    }))
}

async fn list_models(
    State(state): State<MockState>,
    uri: OriginalUri,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &headers, &[]);

    match &state.models {
        ModelsReply::Ids(ids) => {
            let data: Vec<Value> = ids
                .iter()
                .map(|id| json!({"id": id, "object": "model"}))
                .collect();
            Json(json!({"object": "list", "data": data})).into_response()
        }
        ModelsReply::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided"}})),
        )
            .into_response(),
        ModelsReply::NotJson => "<html>upstream gateway</html>".into_response(),
    }
}
