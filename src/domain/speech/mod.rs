//! Speech Context - 语音合成上下文
//!
//! Locale 映射、文本归一化与缓存 key 派生

mod dispatcher;
mod errors;
mod value_objects;

pub use dispatcher::LocaleDispatcher;
pub use errors::{DispatchTableError, UnsupportedLocaleError};
pub use value_objects::{AudioBytes, CacheKey, LocaleEntry, NormalizedText};
