//! Synth Handler - POST /synth

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::NormalizedText;
use crate::infrastructure::http::dto::SynthRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub const PROCESSING_TIME_HEADER: &str = "X-Processing-Time-MS";
pub const CACHE_HIT_HEADER: &str = "X-Cache-Hit";

/// 边界校验：文本非空、长度上限、locale 受支持
fn validate(state: &AppState, text: &str, locale: &str) -> Result<(), ApiError> {
    if NormalizedText::new(text).is_empty() {
        return Err(ApiError::BadRequest("Text cannot be empty".to_string()));
    }

    let max = state.limits.max_text_chars;
    if text.chars().count() > max {
        return Err(ApiError::BadRequest(format!(
            "Text too long (max {} characters)",
            max
        )));
    }

    if !state.dispatcher().supports(locale) {
        return Err(ApiError::BadRequest("Unsupported locale".to_string()));
    }

    Ok(())
}

pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SynthRequest>,
) -> Result<Response, ApiError> {
    let locale = req
        .locale
        .unwrap_or_else(|| state.limits.default_locale.clone());
    validate(&state, &req.text, &locale)?;

    let started = Instant::now();
    let result = state.cache.synthesize(&req.text, &locale).await?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    tracing::debug!(
        locale = %locale,
        cache_key = %result.key,
        cache = result.status.as_str(),
        elapsed_ms = elapsed_ms,
        "Synth request served"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, state.content_type)
        .header(header::CONTENT_LENGTH, result.audio.len())
        .header(PROCESSING_TIME_HEADER, format!("{:.2}", elapsed_ms))
        .header(CACHE_HIT_HEADER, result.status.is_hit().to_string())
        .body(Body::from(result.audio.to_vec()))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
