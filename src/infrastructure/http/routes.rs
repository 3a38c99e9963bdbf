//! HTTP Routes
//!
//! API Endpoints:
//! - /synth          POST  合成语音，返回 audio/wav
//! - /health         GET   健康检查
//! - /               GET   服务信息（受支持的 locale 与回退说明）
//! - /cache/stats    GET   缓存统计

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        .route("/synth", post(handlers::synthesize))
        .route("/cache/stats", get(handlers::cache_stats))
}
