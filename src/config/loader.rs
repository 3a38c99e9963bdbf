//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, ModelBackend};
use crate::domain::LocaleDispatcher;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TTS_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `TTS_SERVER__PORT=9000`
/// - `TTS_CACHE__CAPACITY=5000`
/// - `TTS_INFERENCE__SERIALIZE_PER_MODEL=false`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 标量默认值（locales / models 表的默认值由 serde 提供）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("service.name", "Coqui TTS Service")?
        .set_default("synth.default_locale", "en-IN")?
        .set_default("synth.max_text_chars", 200)?
        .set_default("cache.capacity", 1000)?
        .set_default("audio.sample_rate", 22050)?
        .set_default("inference.serialize_per_model", true)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: TTS_SERVER__PORT=9000
    builder = builder.add_source(
        Environment::with_prefix("TTS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.cache.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "Cache capacity cannot be 0".to_string(),
        ));
    }

    if config.audio.sample_rate == 0 {
        return Err(ConfigError::ValidationError(
            "Audio sample rate cannot be 0".to_string(),
        ));
    }

    if config.synth.max_text_chars == 0 {
        return Err(ConfigError::ValidationError(
            "Max text length cannot be 0".to_string(),
        ));
    }

    // 调度表自身的不变量
    let dispatcher = LocaleDispatcher::new(config.locales.clone())
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    if !dispatcher.supports(&config.synth.default_locale) {
        return Err(ConfigError::ValidationError(format!(
            "Default locale {} is not in the locale table",
            config.synth.default_locale
        )));
    }

    let mut model_ids = HashSet::new();
    for model in &config.models {
        if !model_ids.insert(model.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Duplicate model definition: {}",
                model.id
            )));
        }
        if model.backend == ModelBackend::CoquiHttp
            && model.url.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(format!(
                "Model {} uses the coqui_http backend but has no url",
                model.id
            )));
        }
    }

    for model_id in dispatcher.model_ids() {
        if !model_ids.contains(model_id) {
            return Err(ConfigError::ValidationError(format!(
                "No model definition for {}",
                model_id
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Service: {}", config.service.name);
    tracing::info!("Default Locale: {}", config.synth.default_locale);
    tracing::info!("Max Text Length: {} chars", config.synth.max_text_chars);
    tracing::info!("Cache Capacity: {} entries", config.cache.capacity);
    tracing::info!("Sample Rate: {} Hz", config.audio.sample_rate);
    tracing::info!(
        "Serialize Per Model: {}",
        config.inference.serialize_per_model
    );
    for entry in &config.locales {
        tracing::info!(
            "Locale {}: model={} speaker={:?} language={:?} fallback={:?}",
            entry.locale,
            entry.model_id,
            entry.speaker,
            entry.language,
            entry.fallback
        );
    }
    for model in &config.models {
        tracing::info!(
            "Model {}: backend={} url={:?}",
            model.id,
            model.backend,
            model.url
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ModelConfig;
    use crate::domain::LocaleEntry;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_capacity() {
        let mut config = AppConfig::default();
        config.cache.capacity = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_unknown_default_locale() {
        let mut config = AppConfig::default();
        config.synth.default_locale = "fr-FR".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_missing_model_definition() {
        let mut config = AppConfig::default();
        config
            .locales
            .push(LocaleEntry::new("ta-IN", "tts_models/ta/cv/vits"));
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("tts_models/ta/cv/vits"));
    }

    #[test]
    fn test_validation_error_for_http_model_without_url() {
        let mut config = AppConfig::default();
        config.models[0].url = None;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_duplicate_locale() {
        let mut config = AppConfig::default();
        config
            .locales
            .push(LocaleEntry::new("en-IN", "tts_models/en/vctk/vits"));
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_tone_model_needs_no_url() {
        let mut config = AppConfig::default();
        config.models = vec![
            ModelConfig::tone("tts_models/en/vctk/vits"),
            ModelConfig::tone("tts_models/hi/cv/vits"),
        ];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("service.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
[server]
port = 9100

[cache]
capacity = 16

[[locales]]
locale = "en-IN"
model_id = "vctk"
speaker = "p225"

[[locales]]
locale = "hi-IN"
model_id = "hindi"
name = "Hindi"

[[models]]
id = "vctk"
backend = "tone"

[[models]]
id = "hindi"
backend = "coqui_http"
url = "http://tts-hi:5002"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cache.capacity, 16);
        assert_eq!(config.locales.len(), 2);
        assert_eq!(config.locales[0].speaker.as_deref(), Some("p225"));
        assert_eq!(config.locales[1].label(), "Hindi (hi-IN)");
        assert_eq!(config.model("vctk").unwrap().backend, ModelBackend::Tone);
        assert_eq!(
            config.model("hindi").unwrap().url.as_deref(),
            Some("http://tts-hi:5002")
        );
    }
}
