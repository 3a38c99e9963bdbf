//! TTS Service - 本地多语种语音合成 HTTP 服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Speech: locale 调度表、文本规范化、缓存 key
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechModel, AudioEncoderPort）
//! - SynthesisCache: LRU 缓存 + 同 key 合成合并
//! - ModelRegistry: 已加载模型句柄（可按模型串行推理）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: /synth, /health, /, /cache/stats
//! - Adapters: Coqui tts-server 客户端、Tone 模型、WAV 编解码

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
