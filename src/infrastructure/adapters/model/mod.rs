//! Model Adapters - SpeechModel 后端实现与启动时加载

mod coqui_http_model;
mod tone_model;

use std::sync::Arc;

pub use coqui_http_model::{CoquiHttpModel, CoquiHttpModelConfig};
pub use tone_model::{ToneModel, ToneModelConfig};

use crate::application::ports::{ModelError, SpeechModel};
use crate::application::{ModelHandle, ModelRegistry};
use crate::config::{ModelBackend, ModelConfig};
use crate::domain::LocaleDispatcher;

/// 根据配置构建模型后端
pub fn build_model(config: &ModelConfig, sample_rate: u32) -> Result<Arc<dyn SpeechModel>, ModelError> {
    match config.backend {
        ModelBackend::CoquiHttp => {
            let url = config.url.clone().ok_or_else(|| {
                ModelError::BackendError(format!("Model {} has no url", config.id))
            })?;
            let model = CoquiHttpModel::new(
                CoquiHttpModelConfig::new(url)
                    .with_timeout(config.timeout_secs)
                    .with_sample_rate(sample_rate),
            )?;
            Ok(Arc::new(model))
        }
        ModelBackend::Tone => Ok(Arc::new(ToneModel::new(ToneModelConfig {
            sample_rate,
            ..Default::default()
        }))),
    }
}

/// 为调度表中的每个不同 model_id 加载一个句柄
///
/// 多个 locale 共享同一 model_id 时只加载一次
pub async fn load_models(
    dispatcher: &LocaleDispatcher,
    models: &[ModelConfig],
    sample_rate: u32,
    serialize_per_model: bool,
) -> Result<ModelRegistry, ModelError> {
    let mut registry = ModelRegistry::new();

    for model_id in dispatcher.model_ids() {
        let config = models
            .iter()
            .find(|m| m.id == model_id)
            .ok_or_else(|| ModelError::BackendError(format!("No model definition for {}", model_id)))?;

        let locales: Vec<&str> = dispatcher
            .entries()
            .iter()
            .filter(|e| e.model_id == model_id)
            .map(|e| e.locale.as_str())
            .collect();

        tracing::info!(
            model_id = %model_id,
            backend = %config.backend,
            locales = ?locales,
            "Loading model"
        );

        let handle = ModelHandle::new(
            model_id,
            build_model(config, sample_rate)?,
            serialize_per_model,
        );

        if !handle.health_check().await {
            tracing::warn!(
                model_id = %model_id,
                url = ?config.url,
                "Model backend is not reachable yet"
            );
        }

        registry.register(handle);
    }

    Ok(registry)
}
