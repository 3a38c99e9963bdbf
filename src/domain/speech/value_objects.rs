//! Speech Context - Value Objects

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// 编码后的音频数据（完整 WAV 文件），创建后不可变，可廉价共享
pub type AudioBytes = Arc<[u8]>;

/// Locale 到模型的映射条目
///
/// 不变量:
/// - 每个受支持的 locale 恰好一个条目
/// - 共享模型的 locale 指向相同的 model_id
/// - fallback 若存在，必须指向使用同一 model_id 的已知 locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleEntry {
    pub locale: String,
    pub model_id: String,
    /// 展示名（如 "Marathi"），用于服务说明
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// 借用其模型的 locale（仅用于可审计的回退声明）
    #[serde(default)]
    pub fallback: Option<String>,
}

impl LocaleEntry {
    pub fn new(locale: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            model_id: model_id.into(),
            name: None,
            speaker: None,
            language: None,
            fallback: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// "Marathi (mr-IN)"，无展示名时为 locale 本身
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", name, self.locale),
            None => self.locale.clone(),
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn falling_back_to(mut self, locale: impl Into<String>) -> Self {
        self.fallback = Some(locale.into());
        self
    }
}

/// Unicode 空白，另加 U+001C..U+001F 信息分隔符（同样视为空白）
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// 空白归一化后的文本
///
/// 连续空白折叠为单个空格并去除首尾空白，其余内容（包括 `{name}` 之类的占位符）保持不变
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        let words: Vec<&str> = text.split(is_separator).filter(|w| !w.is_empty()).collect();
        Self(words.join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 缓存 key: `locale:hex(sha256(normalized_text))`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(locale: &str, text: &NormalizedText) -> Self {
        let digest = Sha256::digest(text.as_str().as_bytes());
        Self(format!("{}:{:x}", locale, digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// key 所属的 locale
    pub fn locale(&self) -> &str {
        self.0.rsplit_once(':').map(|(l, _)| l).unwrap_or_default()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
