//! Application State
//!
//! 启动时构建一次，以 `Arc<AppState>` 注入所有 handlers

use std::sync::Arc;

use crate::application::SynthesisCache;
use crate::domain::LocaleDispatcher;

/// 请求校验限制
#[derive(Debug, Clone)]
pub struct SynthLimits {
    /// 请求未指定 locale 时使用
    pub default_locale: String,
    /// 文本最大字符数
    pub max_text_chars: usize,
}

impl Default for SynthLimits {
    fn default() -> Self {
        Self {
            default_locale: "en-IN".to_string(),
            max_text_chars: 200,
        }
    }
}

/// 应用状态
pub struct AppState {
    pub cache: Arc<SynthesisCache>,
    pub limits: SynthLimits,
    pub service_name: String,
    /// 响应的 MIME 类型
    pub content_type: &'static str,
}

impl AppState {
    pub fn new(
        cache: Arc<SynthesisCache>,
        limits: SynthLimits,
        service_name: impl Into<String>,
        content_type: &'static str,
    ) -> Self {
        Self {
            cache,
            limits,
            service_name: service_name.into(),
            content_type,
        }
    }

    pub fn dispatcher(&self) -> &LocaleDispatcher {
        self.cache.dispatcher()
    }
}
