//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::domain::LocaleEntry;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 服务元信息
    #[serde(default)]
    pub service: ServiceConfig,

    /// 合成请求配置
    #[serde(default)]
    pub synth: SynthConfig,

    /// 缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 音频配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 推理配置
    #[serde(default)]
    pub inference: InferenceConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,

    /// Locale 调度表
    #[serde(default = "default_locales")]
    pub locales: Vec<LocaleEntry>,

    /// 模型后端定义
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            service: ServiceConfig::default(),
            synth: SynthConfig::default(),
            cache: CacheConfig::default(),
            audio: AudioConfig::default(),
            inference: InferenceConfig::default(),
            log: LogConfig::default(),
            locales: default_locales(),
            models: default_models(),
        }
    }
}

impl AppConfig {
    /// 按 model_id 查找模型定义
    pub fn model(&self, id: &str) -> Option<&ModelConfig> {
        self.models.iter().find(|m| m.id == id)
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 服务元信息（`GET /` 返回）
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
}

fn default_service_name() -> String {
    "Coqui TTS Service".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

/// 合成请求配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthConfig {
    /// 请求未指定 locale 时使用
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// 文本最大字符数
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

fn default_locale() -> String {
    "en-IN".to_string()
}

fn default_max_text_chars() -> usize {
    200
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

/// 缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 最大条目数
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

fn default_cache_capacity() -> usize {
    crate::application::DEFAULT_CACHE_CAPACITY
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

/// 音频配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 输出采样率（Hz），单声道 16 位 PCM
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_sample_rate() -> u32 {
    crate::infrastructure::adapters::DEFAULT_SAMPLE_RATE
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}

/// 推理配置
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// 每个模型同一时间只执行一个推理
    #[serde(default = "default_serialize_per_model")]
    pub serialize_per_model: bool,
}

fn default_serialize_per_model() -> bool {
    true
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            serialize_per_model: default_serialize_per_model(),
        }
    }
}

/// 模型后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelBackend {
    /// Coqui `tts-server` HTTP 接口
    CoquiHttp,
    /// 本地确定性音调合成（离线调试）
    Tone,
}

impl std::fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelBackend::CoquiHttp => write!(f, "coqui_http"),
            ModelBackend::Tone => write!(f, "tone"),
        }
    }
}

/// 模型定义
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// 与 locales 表中的 model_id 对应
    pub id: String,

    pub backend: ModelBackend,

    /// coqui_http 后端的基础 URL
    #[serde(default)]
    pub url: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

fn default_model_timeout() -> u64 {
    60
}

impl ModelConfig {
    pub fn coqui_http(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            backend: ModelBackend::CoquiHttp,
            url: Some(url.into()),
            timeout_secs: default_model_timeout(),
        }
    }

    pub fn tone(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            backend: ModelBackend::Tone,
            url: None,
            timeout_secs: default_model_timeout(),
        }
    }
}

fn default_locales() -> Vec<LocaleEntry> {
    vec![
        LocaleEntry::new("en-IN", "tts_models/en/vctk/vits").with_name("English"),
        LocaleEntry::new("hi-IN", "tts_models/hi/cv/vits").with_name("Hindi"),
        // 马拉地语没有专用模型，复用印地语模型
        LocaleEntry::new("mr-IN", "tts_models/hi/cv/vits")
            .with_name("Marathi")
            .falling_back_to("hi-IN"),
    ]
}

fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig::coqui_http("tts_models/en/vctk/vits", "http://localhost:5002"),
        ModelConfig::coqui_http("tts_models/hi/cv/vits", "http://localhost:5003"),
    ]
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.audio.sample_rate, 22050);
        assert_eq!(config.synth.max_text_chars, 200);
        assert_eq!(config.synth.default_locale, "en-IN");
        assert!(config.inference.serialize_per_model);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_default_tables_are_consistent() {
        let config = AppConfig::default();
        for entry in &config.locales {
            assert!(config.model(&entry.model_id).is_some(), "{}", entry.model_id);
        }
        assert_eq!(config.model("tts_models/hi/cv/vits").unwrap().backend, ModelBackend::CoquiHttp);
    }

    #[test]
    fn test_default_marathi_note() {
        let dispatcher =
            crate::domain::LocaleDispatcher::new(AppConfig::default().locales).unwrap();
        assert_eq!(
            dispatcher.fallback_notes(),
            vec!["For Marathi (mr-IN), the service falls back to Hindi (hi-IN) model".to_string()]
        );
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(ModelBackend::CoquiHttp.to_string(), "coqui_http");
        assert_eq!(ModelBackend::Tone.to_string(), "tone");
    }
}
