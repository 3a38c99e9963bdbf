//! Speech Context - Errors

use thiserror::Error;

/// 请求的 locale 不在调度表中
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported locale: {0}")]
pub struct UnsupportedLocaleError(pub String);

/// 调度表配置错误（启动时检查）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchTableError {
    #[error("Duplicate locale entry: {0}")]
    DuplicateLocale(String),

    #[error("Empty model id for locale: {0}")]
    EmptyModelId(String),

    #[error("Locale {locale} falls back to unknown locale {fallback}")]
    UnknownFallback { locale: String, fallback: String },

    #[error("Locale {locale} falls back to {fallback} but uses a different model")]
    FallbackModelMismatch { locale: String, fallback: String },
}
