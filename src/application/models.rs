//! Model Registry - 已加载模型的句柄表
//!
//! 每个不同的 model_id 一个 ModelHandle，启动时创建，进程生命周期内持有。
//! 推理运行时未证明并发安全时，通过每个模型各自的锁串行化调用（不同 locale 的模型仍可并发）。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::application::ports::{ModelError, SpeechModel};

/// 模型句柄
pub struct ModelHandle {
    model_id: String,
    model: Arc<dyn SpeechModel>,
    /// 每模型的串行化锁
    gate: Option<Mutex<()>>,
}

impl ModelHandle {
    pub fn new(model_id: impl Into<String>, model: Arc<dyn SpeechModel>, serialize: bool) -> Self {
        Self {
            model_id: model_id.into(),
            model,
            gate: serialize.then(|| Mutex::new(())),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn is_serialized(&self) -> bool {
        self.gate.is_some()
    }

    /// 执行推理（必要时先获取该模型的锁）
    pub async fn infer(
        &self,
        text: &str,
        speaker: Option<&str>,
        language: Option<&str>,
    ) -> Result<Vec<f32>, ModelError> {
        let _guard = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };
        self.model.infer(text, speaker, language).await
    }

    pub async fn health_check(&self) -> bool {
        self.model.health_check().await
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model_id", &self.model_id)
            .field("serialized", &self.is_serialized())
            .finish()
    }
}

/// 模型注册表: model_id -> ModelHandle
#[derive(Debug, Default)]
pub struct ModelRegistry {
    handles: HashMap<String, Arc<ModelHandle>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册模型；同一 model_id 只保留第一个句柄
    pub fn register(&mut self, handle: ModelHandle) -> Arc<ModelHandle> {
        self.handles
            .entry(handle.model_id.clone())
            .or_insert_with(|| Arc::new(handle))
            .clone()
    }

    pub fn get(&self, model_id: &str) -> Option<Arc<ModelHandle>> {
        self.handles.get(model_id).cloned()
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.handles.contains_key(model_id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// 记录最大并发数的模型
    #[derive(Default)]
    struct ConcurrencyMeter {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl SpeechModel for ConcurrencyMeter {
        async fn infer(
            &self,
            _text: &str,
            _speaker: Option<&str>,
            _language: Option<&str>,
        ) -> Result<Vec<f32>, ModelError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![0.0])
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_serialized_handle_runs_one_at_a_time() {
        let meter = Arc::new(ConcurrencyMeter::default());
        let handle = Arc::new(ModelHandle::new("m", meter.clone(), true));

        let calls = (0..4).map(|_| {
            let handle = handle.clone();
            tokio::spawn(async move { handle.infer("x", None, None).await })
        });
        for call in futures_util::future::join_all(calls).await {
            call.unwrap().unwrap();
        }

        assert_eq!(meter.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unserialized_handle_allows_overlap() {
        let meter = Arc::new(ConcurrencyMeter::default());
        let handle = Arc::new(ModelHandle::new("m", meter.clone(), false));

        let calls = (0..4).map(|_| {
            let handle = handle.clone();
            tokio::spawn(async move { handle.infer("x", None, None).await })
        });
        for call in futures_util::future::join_all(calls).await {
            call.unwrap().unwrap();
        }

        assert!(meter.peak.load(Ordering::SeqCst) > 1);
    }

    #[test]
    fn test_register_keeps_first_handle() {
        let mut registry = ModelRegistry::new();
        let first = registry.register(ModelHandle::new(
            "tts_models/hi/cv/vits",
            Arc::new(ConcurrencyMeter::default()),
            true,
        ));
        let second = registry.register(ModelHandle::new(
            "tts_models/hi/cv/vits",
            Arc::new(ConcurrencyMeter::default()),
            false,
        ));

        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.is_serialized());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("tts_models/hi/cv/vits"));
        assert!(registry.get("tts_models/en/vctk/vits").is_none());
    }
}
