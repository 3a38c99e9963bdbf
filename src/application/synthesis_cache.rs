//! Synthesis Cache - 带 LRU 淘汰的合成结果缓存
//!
//! - 缓存 key: `locale:sha256(normalized_text)`
//! - 命中: 直接返回缓存的 WAV，不调用模型
//! - 未命中: 通过 LocaleDispatcher 选择模型，推理、编码后写入缓存
//! - 同一 key 的并发未命中只触发一次推理，其余请求等待同一结果
//! - 失败不写入任何条目

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use lru::LruCache;
use tokio::sync::watch;

use crate::application::error::SynthesisError;
use crate::application::models::ModelRegistry;
use crate::application::ports::AudioEncoderPort;
use crate::domain::{AudioBytes, CacheKey, LocaleDispatcher, LocaleEntry, NormalizedText};

/// 默认最多缓存 1000 条音频
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// 缓存配置
#[derive(Debug, Clone)]
pub struct SynthesisCacheConfig {
    /// 最大条目数
    pub capacity: NonZeroUsize,
}

impl Default for SynthesisCacheConfig {
    fn default() -> Self {
        Self {
            capacity: NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// 本次请求的缓存状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// 缓存命中，未调用模型
    Hit,
    /// 未命中，本请求触发了推理
    Miss,
    /// 未命中，复用了同一 key 正在进行的推理
    Coalesced,
}

impl CacheStatus {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Coalesced => "coalesced",
        }
    }
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct Synthesized {
    pub audio: AudioBytes,
    pub key: CacheKey,
    pub status: CacheStatus,
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub coalesced_count: u64,
    pub in_flight: usize,
}

type Outcome = Result<AudioBytes, SynthesisError>;

/// 合成缓存
///
/// 进程级单例，启动时构建一次，通过 `Arc` 注入到 HTTP handlers
pub struct SynthesisCache {
    inner: Arc<Inner>,
}

struct Inner {
    dispatcher: Arc<LocaleDispatcher>,
    models: Arc<ModelRegistry>,
    encoder: Arc<dyn AudioEncoderPort>,
    /// 仅在同步 get/put 期间持有
    entries: Mutex<LruCache<CacheKey, AudioBytes>>,
    /// 正在合成的 key -> 结果通道
    in_flight: DashMap<CacheKey, watch::Receiver<Option<Outcome>>>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    coalesced_count: AtomicU64,
}

impl SynthesisCache {
    pub fn new(
        config: SynthesisCacheConfig,
        dispatcher: Arc<LocaleDispatcher>,
        models: Arc<ModelRegistry>,
        encoder: Arc<dyn AudioEncoderPort>,
    ) -> Self {
        tracing::info!(
            capacity = config.capacity.get(),
            locales = dispatcher.supported_locales().len(),
            models = models.len(),
            "SynthesisCache initialized"
        );

        Self {
            inner: Arc::new(Inner {
                dispatcher,
                models,
                encoder,
                entries: Mutex::new(LruCache::new(config.capacity)),
                in_flight: DashMap::new(),
                hit_count: AtomicU64::new(0),
                miss_count: AtomicU64::new(0),
                coalesced_count: AtomicU64::new(0),
            }),
        }
    }

    /// 合成语音（带缓存）
    pub async fn synthesize(&self, text: &str, locale: &str) -> Result<Synthesized, SynthesisError> {
        let route = self.inner.dispatcher.resolve(locale)?.clone();
        let normalized = NormalizedText::new(text);
        let key = CacheKey::derive(&route.locale, &normalized);

        if let Some(audio) = self.inner.lookup(&key) {
            return Ok(self.inner.hit(key, audio));
        }

        let (mut receiver, status) = match self.inner.in_flight.entry(key.clone()) {
            Entry::Occupied(entry) => {
                self.inner.coalesced_count.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(cache_key = %key, "Joining in-flight synthesis");
                (entry.get().clone(), CacheStatus::Coalesced)
            }
            Entry::Vacant(entry) => {
                // 持有分片锁时复查：合成可能刚好完成并注销
                if let Some(audio) = self.inner.lookup(&key) {
                    return Ok(self.inner.hit(key, audio));
                }

                let (sender, receiver) = watch::channel(None);
                entry.insert(receiver.clone());
                self.inner.miss_count.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(cache_key = %key, model_id = %route.model_id, "Cache miss");

                spawn_synthesis(self.inner.clone(), key.clone(), normalized, route, sender);
                (receiver, CacheStatus::Miss)
            }
        };

        let outcome = receiver
            .wait_for(Option::is_some)
            .await
            .map(|value| value.clone())
            .map_err(|_| SynthesisError::Aborted(format!("no result published for {}", key)))?;

        let audio = outcome
            .unwrap_or_else(|| Err(SynthesisError::Aborted(format!("empty result for {}", key))))?;

        Ok(Synthesized { audio, key, status })
    }

    /// 检查 key 是否已缓存（不刷新 LRU 顺序）
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.lock_entries().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dispatcher(&self) -> &LocaleDispatcher {
        &self.inner.dispatcher
    }

    /// 获取缓存统计信息
    pub fn stats(&self) -> CacheStats {
        let (entries, capacity) = {
            let cache = self.inner.lock_entries();
            (cache.len(), cache.cap().get())
        };

        CacheStats {
            entries,
            capacity,
            hit_count: self.inner.hit_count.load(Ordering::Relaxed),
            miss_count: self.inner.miss_count.load(Ordering::Relaxed),
            coalesced_count: self.inner.coalesced_count.load(Ordering::Relaxed),
            in_flight: self.inner.in_flight.len(),
        }
    }
}

impl Inner {
    fn lock_entries(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, AudioBytes>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 读取即视为一次使用（LRU touch）
    fn lookup(&self, key: &CacheKey) -> Option<AudioBytes> {
        self.lock_entries().get(key).cloned()
    }

    fn hit(&self, key: CacheKey, audio: AudioBytes) -> Synthesized {
        self.hit_count.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(cache_key = %key, size_bytes = audio.len(), "Cache hit");
        Synthesized {
            audio,
            key,
            status: CacheStatus::Hit,
        }
    }

    fn store(&self, key: &CacheKey, audio: AudioBytes) {
        let evicted = self.lock_entries().push(key.clone(), audio);
        if let Some((evicted_key, evicted_audio)) = evicted {
            if &evicted_key != key {
                tracing::debug!(
                    cache_key = %evicted_key,
                    size_bytes = evicted_audio.len(),
                    "LRU evicted cache entry"
                );
            }
        }
    }

    /// 推理并编码为 WAV
    async fn render(
        &self,
        text: &NormalizedText,
        route: &LocaleEntry,
    ) -> Result<AudioBytes, SynthesisError> {
        let handle = self
            .models
            .get(&route.model_id)
            .ok_or_else(|| SynthesisError::ModelUnavailable(route.model_id.clone()))?;

        let samples = handle
            .infer(text.as_str(), route.speaker.as_deref(), route.language.as_deref())
            .await?;
        let wav = self.encoder.encode(&samples)?;

        Ok(AudioBytes::from(wav))
    }
}

/// 合成任务退出时注销 in-flight 标记（包括 panic）
struct InFlightGuard {
    inner: Arc<Inner>,
    key: CacheKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.in_flight.remove(&self.key);
    }
}

/// 在独立任务中执行推理，请求被取消不会中断推理
///
/// 顺序: 写入缓存 -> 发布结果 -> 注销 in-flight，保证竞争者要么看到标记要么看到缓存条目
fn spawn_synthesis(
    inner: Arc<Inner>,
    key: CacheKey,
    text: NormalizedText,
    route: LocaleEntry,
    sender: watch::Sender<Option<Outcome>>,
) {
    tokio::spawn(async move {
        let guard = InFlightGuard {
            inner: inner.clone(),
            key: key.clone(),
        };
        let started = Instant::now();

        let outcome = inner.render(&text, &route).await;
        match &outcome {
            Ok(audio) => {
                inner.store(&key, audio.clone());
                tracing::info!(
                    cache_key = %key,
                    model_id = %route.model_id,
                    text_len = text.as_str().chars().count(),
                    size_bytes = audio.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Speech synthesized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    cache_key = %key,
                    model_id = %route.model_id,
                    error = %e,
                    "Speech synthesis failed"
                );
            }
        }

        sender.send_replace(Some(outcome));
        drop(guard);
    });
}
