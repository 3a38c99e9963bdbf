//! Speech Model Port - TTS 推理能力抽象
//!
//! `infer(text, speaker?, language?) -> 浮点样本序列`，具体后端在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 模型推理错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Speech Model Port
///
/// 单个已加载模型的推理接口。返回单声道浮点样本，采样率由后端保证与编码器一致。
#[async_trait]
pub trait SpeechModel: Send + Sync {
    async fn infer(
        &self,
        text: &str,
        speaker: Option<&str>,
        language: Option<&str>,
    ) -> Result<Vec<f32>, ModelError>;

    /// 检查后端是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
