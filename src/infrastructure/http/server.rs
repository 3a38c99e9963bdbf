//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::CONTENT_TYPE;
use http::HeaderName;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::request_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::ServerConfig;

/// 请求体上限：文本请求，64KB 足够
const MAX_BODY_BYTES: usize = 64 * 1024;

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 带默认配置（0.0.0.0:8000）
    pub fn with_default_config(state: AppState) -> Self {
        Self::new(ServerConfig::default(), state)
    }

    /// 构建完整 Router（含中间件）
    pub fn router(&self) -> Router {
        // 浏览器端需要读取自定义响应头
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([CONTENT_TYPE])
            .expose_headers([
                HeaderName::from_static("x-processing-time-ms"),
                HeaderName::from_static("x-cache-hit"),
            ])
            .max_age(Duration::from_secs(3600));

        create_routes()
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let addr = self.config.addr();

        info!(
            addr = %addr,
            locales = ?self.state.dispatcher().supported_locales(),
            "Starting HTTP server"
        );

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ModelRegistry, SynthesisCache, SynthesisCacheConfig};
    use crate::domain::{LocaleDispatcher, LocaleEntry};
    use crate::config::ModelConfig;
    use crate::infrastructure::adapters::{load_models, WavEncoder};
    use crate::infrastructure::http::state::SynthLimits;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    async fn create_test_server() -> HttpServer {
        let dispatcher = Arc::new(
            LocaleDispatcher::new(vec![LocaleEntry::new("en-IN", "tone")]).unwrap(),
        );
        let models: ModelRegistry = load_models(
            &dispatcher,
            &[ModelConfig::tone("tone")],
            22050,
            true,
        )
        .await
        .unwrap();
        let cache = SynthesisCache::new(
            SynthesisCacheConfig::default(),
            dispatcher,
            Arc::new(models),
            Arc::new(WavEncoder::default()),
        );

        HttpServer::with_default_config(AppState::new(
            Arc::new(cache),
            SynthLimits::default(),
            "Coqui TTS Service",
            "audio/wav",
        ))
    }

    #[tokio::test]
    async fn test_router_exposes_custom_headers() {
        let server = create_test_server().await;
        let request = Request::builder()
            .method("POST")
            .uri("/synth")
            .header("origin", "http://localhost:3000")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text":"hello"}"#))
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let exposed = response.headers()["access-control-expose-headers"]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(exposed.contains("x-cache-hit"));
        assert!(exposed.contains("x-processing-time-ms"));
    }

    #[tokio::test]
    async fn test_router_rejects_oversized_body() {
        let server = create_test_server().await;
        let text = "a".repeat(MAX_BODY_BYTES + 1);
        let body = serde_json::json!({ "text": text }).to_string();
        let request = Request::builder()
            .method("POST")
            .uri("/synth")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
