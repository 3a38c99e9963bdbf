//! Service Handlers - 健康检查、服务信息、缓存统计

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{CacheStatsResponse, HealthResponse, ServiceInfoResponse};
use crate::infrastructure::http::state::AppState;

/// GET /health - 不访问核心
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        status: "healthy",
    })
}

/// GET / - 服务元信息
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfoResponse> {
    let dispatcher = state.dispatcher();
    let notes = dispatcher.fallback_notes();

    Json(ServiceInfoResponse {
        service: state.service_name.clone(),
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        supported_locales: dispatcher
            .supported_locales()
            .into_iter()
            .map(str::to_string)
            .collect(),
        note: (!notes.is_empty()).then(|| notes.join("; ")),
    })
}

/// GET /cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    Json(state.cache.stats().into())
}
