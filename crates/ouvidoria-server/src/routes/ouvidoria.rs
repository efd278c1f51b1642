//! Submission intake and health routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ouvidoria_redact::RedactionResult;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::AppState;

// ---------------------------------------------------------------
// Route builders
// ---------------------------------------------------------------

/// Routes served at the root (`/process`, `/health`).
pub fn root_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/process", post(process_submission))
        .route("/health", get(health))
}

/// Routes nested under `/api/ouvidoria`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/processar", post(processar_manifestacao))
        .route("/health", get(health))
}

// ---------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------

#[derive(Deserialize)]
struct SubmissionBody {
    #[serde(default, alias = "texto")]
    text: Option<String>,
}

/// Response body of `POST /api/ouvidoria/processar`, in the shape the
/// browser UI reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessamentoResponse {
    pub texto_original: String,
    pub texto_tarjado: String,
    pub dados_ocultados: usize,
}

impl From<RedactionResult> for ProcessamentoResponse {
    fn from(result: RedactionResult) -> Self {
        Self {
            texto_original: result.original_text,
            texto_tarjado: result.redacted_text,
            dados_ocultados: result.hidden_count,
        }
    }
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// POST /process: redact a submission.
async fn process_submission(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmissionBody>,
) -> Response {
    match redact_submission(&state, body).await {
        Ok(result) => Json(result).into_response(),
        Err(rejection) => rejection,
    }
}

/// POST /api/ouvidoria/processar: redact a submission for the browser UI.
async fn processar_manifestacao(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmissionBody>,
) -> Response {
    match redact_submission(&state, body).await {
        Ok(result) => Json(ProcessamentoResponse::from(result)).into_response(),
        Err(rejection) => rejection,
    }
}

/// Validate the body and run it through the pipeline.
///
/// Missing, null and blank text are all rejected with 400.
async fn redact_submission(
    state: &AppState,
    body: SubmissionBody,
) -> Result<RedactionResult, Response> {
    let Some(text) = body.text.filter(|t| !t.trim().is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "text required" })),
        )
            .into_response());
    };

    info!("Processing submission of {} chars", text.chars().count());

    let result = state.pipeline.process(&text).await;

    info!(
        "Submission redacted by {:?} tier: {} items hidden",
        result.source, result.hidden_count
    );

    Ok(result)
}

/// GET /health: liveness check.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
