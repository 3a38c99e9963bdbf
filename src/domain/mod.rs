//! 领域层 - Domain Layer
//!
//! Speech Context: locale 调度表、文本归一化、缓存 key

pub mod speech;

pub use speech::{
    AudioBytes, CacheKey, DispatchTableError, LocaleDispatcher, LocaleEntry, NormalizedText,
    UnsupportedLocaleError,
};
