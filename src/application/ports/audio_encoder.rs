//! Audio Encoder Port - 音频编码抽象
//!
//! 将模型输出的浮点样本编码为可直接返回给客户端的容器格式

use thiserror::Error;

/// 编码错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// Audio Encoder Port
pub trait AudioEncoderPort: Send + Sync {
    /// 编码单声道浮点样本
    fn encode(&self, samples: &[f32]) -> Result<Vec<u8>, EncodeError>;

    /// 输出的 MIME 类型
    fn content_type(&self) -> &'static str;

    fn sample_rate(&self) -> u32;
}
