//! 应用层错误定义
//!
//! 合成路径上的统一错误类型

use thiserror::Error;

use crate::application::ports::{EncodeError, ModelError};
use crate::domain::UnsupportedLocaleError;

/// 合成错误
///
/// 实现 Clone，以便同一个 in-flight 结果分发给所有等待者
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// locale 不在调度表中
    #[error(transparent)]
    UnsupportedLocale(#[from] UnsupportedLocaleError),

    /// 调度表指向未加载的模型
    #[error("Model not loaded: {0}")]
    ModelUnavailable(String),

    /// 模型推理失败
    #[error("Inference failed: {0}")]
    Inference(#[from] ModelError),

    /// 音频编码失败
    #[error("Audio encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    /// 合成任务异常退出，未产生结果
    #[error("Synthesis aborted: {0}")]
    Aborted(String),
}

impl SynthesisError {
    pub fn is_unsupported_locale(&self) -> bool {
        matches!(self, Self::UnsupportedLocale(_))
    }
}
