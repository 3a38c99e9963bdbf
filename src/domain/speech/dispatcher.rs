//! Locale Dispatcher - locale 到模型的静态调度表
//!
//! 纯查找，不做缓存。回退（如 mr-IN 复用 hi-IN 模型）必须是显式条目，而不是隐式逻辑。

use std::collections::HashMap;

use super::errors::{DispatchTableError, UnsupportedLocaleError};
use super::value_objects::LocaleEntry;

/// Locale 调度器
#[derive(Debug, Clone)]
pub struct LocaleDispatcher {
    /// 按配置顺序保存的条目
    entries: Vec<LocaleEntry>,
    /// locale -> entries 下标
    index: HashMap<String, usize>,
}

impl LocaleDispatcher {
    /// 从条目构建调度表，校验表的不变量
    pub fn new(entries: Vec<LocaleEntry>) -> Result<Self, DispatchTableError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if entry.model_id.trim().is_empty() {
                return Err(DispatchTableError::EmptyModelId(entry.locale.clone()));
            }
            if index.insert(entry.locale.clone(), i).is_some() {
                return Err(DispatchTableError::DuplicateLocale(entry.locale.clone()));
            }
        }

        for entry in &entries {
            let Some(fallback) = &entry.fallback else {
                continue;
            };
            let target = index
                .get(fallback)
                .map(|&i| &entries[i])
                .ok_or_else(|| DispatchTableError::UnknownFallback {
                    locale: entry.locale.clone(),
                    fallback: fallback.clone(),
                })?;
            if target.model_id != entry.model_id {
                return Err(DispatchTableError::FallbackModelMismatch {
                    locale: entry.locale.clone(),
                    fallback: fallback.clone(),
                });
            }
        }

        Ok(Self { entries, index })
    }

    /// 查找 locale 对应的模型、speaker 和 language
    pub fn resolve(&self, locale: &str) -> Result<&LocaleEntry, UnsupportedLocaleError> {
        self.index
            .get(locale)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| UnsupportedLocaleError(locale.to_string()))
    }

    pub fn supports(&self, locale: &str) -> bool {
        self.index.contains_key(locale)
    }

    /// 受支持的 locale（配置顺序）
    pub fn supported_locales(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.locale.as_str()).collect()
    }

    /// 去重后的模型 ID（首次出现顺序）
    pub fn model_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !ids.contains(&entry.model_id.as_str()) {
                ids.push(&entry.model_id);
            }
        }
        ids
    }

    /// 所有回退条目的说明文字
    pub fn fallback_notes(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| {
                let target = e.fallback.as_deref().and_then(|f| self.resolve(f).ok())?;
                Some(format!(
                    "For {}, the service falls back to {} model",
                    e.label(),
                    target.label()
                ))
            })
            .collect()
    }

    pub fn entries(&self) -> &[LocaleEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_table() -> Vec<LocaleEntry> {
        vec![
            LocaleEntry::new("en-IN", "tts_models/en/vctk/vits"),
            LocaleEntry::new("hi-IN", "tts_models/hi/cv/vits"),
            LocaleEntry::new("mr-IN", "tts_models/hi/cv/vits").falling_back_to("hi-IN"),
        ]
    }

    #[test]
    fn test_resolve_known_locale() {
        let dispatcher = LocaleDispatcher::new(default_table()).unwrap();
        let entry = dispatcher.resolve("en-IN").unwrap();
        assert_eq!(entry.model_id, "tts_models/en/vctk/vits");
        assert!(entry.speaker.is_none());
    }

    #[test]
    fn test_marathi_routes_to_hindi_model() {
        let dispatcher = LocaleDispatcher::new(default_table()).unwrap();
        let hi = dispatcher.resolve("hi-IN").unwrap();
        let mr = dispatcher.resolve("mr-IN").unwrap();
        assert_eq!(hi.model_id, mr.model_id);
    }

    #[test]
    fn test_unsupported_locale() {
        let dispatcher = LocaleDispatcher::new(default_table()).unwrap();
        let err = dispatcher.resolve("fr-FR").unwrap_err();
        assert_eq!(err, UnsupportedLocaleError("fr-FR".to_string()));
        assert_eq!(err.to_string(), "Unsupported locale: fr-FR");
    }

    #[test]
    fn test_model_ids_are_deduplicated() {
        let dispatcher = LocaleDispatcher::new(default_table()).unwrap();
        assert_eq!(
            dispatcher.model_ids(),
            vec!["tts_models/en/vctk/vits", "tts_models/hi/cv/vits"]
        );
        assert_eq!(dispatcher.supported_locales(), vec!["en-IN", "hi-IN", "mr-IN"]);
    }

    #[test]
    fn test_fallback_notes() {
        let dispatcher = LocaleDispatcher::new(default_table()).unwrap();
        assert_eq!(
            dispatcher.fallback_notes(),
            vec!["For mr-IN, the service falls back to hi-IN model".to_string()]
        );
    }

    #[test]
    fn test_fallback_notes_use_display_names() {
        let table = vec![
            LocaleEntry::new("hi-IN", "tts_models/hi/cv/vits").with_name("Hindi"),
            LocaleEntry::new("mr-IN", "tts_models/hi/cv/vits")
                .with_name("Marathi")
                .falling_back_to("hi-IN"),
        ];
        let dispatcher = LocaleDispatcher::new(table).unwrap();
        assert_eq!(
            dispatcher.fallback_notes(),
            vec!["For Marathi (mr-IN), the service falls back to Hindi (hi-IN) model".to_string()]
        );
    }

    #[test]
    fn test_duplicate_locale_rejected() {
        let mut table = default_table();
        table.push(LocaleEntry::new("en-IN", "other"));
        assert_eq!(
            LocaleDispatcher::new(table).unwrap_err(),
            DispatchTableError::DuplicateLocale("en-IN".to_string())
        );
    }

    #[test]
    fn test_fallback_must_share_model() {
        let table = vec![
            LocaleEntry::new("hi-IN", "tts_models/hi/cv/vits"),
            LocaleEntry::new("mr-IN", "tts_models/mr/other").falling_back_to("hi-IN"),
        ];
        assert!(matches!(
            LocaleDispatcher::new(table),
            Err(DispatchTableError::FallbackModelMismatch { .. })
        ));
    }

    #[test]
    fn test_fallback_must_exist() {
        let table = vec![LocaleEntry::new("mr-IN", "m").falling_back_to("hi-IN")];
        assert!(matches!(
            LocaleDispatcher::new(table),
            Err(DispatchTableError::UnknownFallback { .. })
        ));
    }

    #[test]
    fn test_empty_model_id_rejected() {
        let table = vec![LocaleEntry::new("en-IN", "  ")];
        assert_eq!(
            LocaleDispatcher::new(table).unwrap_err(),
            DispatchTableError::EmptyModelId("en-IN".to_string())
        );
    }
}
