pub mod serializers;
pub mod views;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::{CorsConfig, ServerConfig};
use crate::review::Reviewer;

#[derive(Clone)]
pub struct AppState {
    pub reviewer: Arc<Reviewer>,
    pub server: Arc<ServerConfig>,
}

pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origin = if cors.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = cors
            .allow_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn router(state: AppState, cors: &CorsConfig) -> Router {
    let mut app = Router::new()
        .route("/", get(views::root))
        .route("/health", get(views::health))
        .route("/api/review", post(views::review));

    if state.server.enable_debug {
        app = app.route("/debug", get(views::debug));
    }

    app.layer(DefaultBodyLimit::max(state.server.max_body_bytes))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
