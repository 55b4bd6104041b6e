use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};

use crate::api::AppState;
use crate::api::serializers::{
    DebugOut, ErrorOut, HealthOut, ReviewIn, ReviewOut, ReviewStatus, RootOut,
};
use crate::error::ReviewError;

/// JSON error envelope: `{"detail": ...}` with an HTTP error status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorOut { detail: self.detail })).into_response()
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

// ---------- handlers ----------
pub async fn root(State(state): State<AppState>) -> Json<RootOut> {
    Json(RootOut {
        message: format!("{} is running!", state.server.service_name),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthOut> {
    Json(HealthOut {
        status: "healthy",
        service: state.server.service_id.clone(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

/// Always 200: failures are part of the diagnostic payload
pub async fn debug(State(state): State<AppState>) -> Json<DebugOut> {
    let diag = state.reviewer.diagnose().await;

    let (connection_test, models_available, error) = match diag.connection {
        Ok(count) => ("success", Some(count), None),
        Err(e) if !diag.api_key_set => ("skipped", None, Some(e)),
        Err(e) => ("failed", None, Some(e)),
    };

    Json(DebugOut {
        api_key_set: diag.api_key_set,
        api_key_length: diag.api_key_length,
        api_key_prefix: diag.api_key_prefix,
        api_key_env: diag.api_key_env,
        provider: diag.provider,
        model: diag.model,
        connection_test,
        models_available,
        error,
    })
}

pub async fn review(
    State(state): State<AppState>,
    payload: Result<Json<ReviewIn>, JsonRejection>,
) -> Result<Json<ReviewOut>, ApiError> {
    let Json(req) = payload?;

    let review = state.reviewer.review(&req.code, &req.language).await?;

    Ok(Json(ReviewOut {
        review,
        status: ReviewStatus::Success,
        model: state.reviewer.model().to_string(),
    }))
}
