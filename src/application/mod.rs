//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechModel、AudioEncoder）
//! - models: 模型句柄注册表（每模型串行化锁）
//! - synthesis_cache: 带 LRU 和 in-flight 合并的合成缓存
//! - error: 应用层错误定义

pub mod error;
pub mod models;
pub mod ports;
pub mod synthesis_cache;

pub use error::SynthesisError;
pub use models::{ModelHandle, ModelRegistry};
pub use ports::{AudioEncoderPort, EncodeError, ModelError, SpeechModel};
pub use synthesis_cache::{
    CacheStats, CacheStatus, SynthesisCache, SynthesisCacheConfig, Synthesized,
    DEFAULT_CACHE_CAPACITY,
};
