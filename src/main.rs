//! TTS Service - 本地多语种语音合成 HTTP 服务
//!
//! 启动顺序：配置 -> 日志 -> 调度表 -> 模型 -> 缓存 -> HTTP 服务器

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tts_service::application::ports::AudioEncoderPort;
use tts_service::application::{SynthesisCache, SynthesisCacheConfig};
use tts_service::config::{load_config, print_config, AppConfig};
use tts_service::domain::LocaleDispatcher;
use tts_service::infrastructure::adapters::{load_models, WavEncoder};
use tts_service::infrastructure::http::{AppState, HttpServer, SynthLimits};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},tts_service={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("{} v{}", config.service.name, env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let dispatcher = Arc::new(
        LocaleDispatcher::new(config.locales.clone()).context("Invalid locale table")?,
    );

    // 每个不同的 model_id 只加载一次
    let models = load_models(
        &dispatcher,
        &config.models,
        config.audio.sample_rate,
        config.inference.serialize_per_model,
    )
    .await
    .context("Failed to load models")?;

    let encoder = WavEncoder::new(config.audio.sample_rate);
    let content_type = encoder.content_type();

    let capacity = NonZeroUsize::new(config.cache.capacity)
        .context("cache.capacity must be greater than 0")?;
    let cache = SynthesisCache::new(
        SynthesisCacheConfig { capacity },
        dispatcher,
        Arc::new(models),
        Arc::new(encoder),
    );

    let state = AppState::new(
        Arc::new(cache),
        SynthLimits {
            default_locale: config.synth.default_locale.clone(),
            max_text_chars: config.synth.max_text_chars,
        },
        config.service.name.clone(),
        content_type,
    );

    let server = HttpServer::new(config.server.clone(), state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
