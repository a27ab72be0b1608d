use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use coolie_core::translation::AUTO_SOURCE;

use crate::error::AppError;
use crate::state::AppState;

/// `{text, source?, target}`; `language` is accepted in place of `target`.
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(alias = "language")]
    pub target: String,
}

fn default_source() -> String {
    AUTO_SOURCE.to_string()
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/translate", post(translate_text))
}

/// POST /translate
async fn translate_text(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    if req.target.trim().is_empty() {
        return Err(AppError::ValidationError("target is required".to_string()));
    }

    let translated_text = state
        .translator
        .translate(&req.text, &req.source, &req.target)
        .await?;

    info!(
        "Translated {} chars {} -> {} via {}",
        req.text.len(),
        req.source,
        req.target,
        state.translator.provider()
    );

    Ok(Json(TranslateResponse { translated_text }))
}
