//! Coqui HTTP Model - 调用 Coqui `tts-server` 推理
//!
//! 外部 TTS API:
//! GET {base_url}/api/tts?text=...&speaker_id=...&language_id=...
//! Response: audio/wav binary
//!
//! 返回的 WAV 解码后下混为单声道，并重采样到输出采样率

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{ModelError, SpeechModel};
use crate::infrastructure::adapters::audio::decode_wav;

/// Coqui HTTP 模型配置
#[derive(Debug, Clone)]
pub struct CoquiHttpModelConfig {
    /// tts-server 基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 输出采样率
    pub sample_rate: u32,
}

impl Default for CoquiHttpModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5002".to_string(),
            timeout_secs: 60,
            sample_rate: 22050,
        }
    }
}

impl CoquiHttpModelConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }
}

/// Coqui HTTP 模型
pub struct CoquiHttpModel {
    client: Client,
    config: CoquiHttpModelConfig,
}

impl CoquiHttpModel {
    pub fn new(config: CoquiHttpModelConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn tts_url(&self) -> String {
        format!("{}/api/tts", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/", self.config.base_url.trim_end_matches('/'))
    }
}

/// tts-server 的查询参数
fn query_params<'a>(
    text: &'a str,
    speaker: Option<&'a str>,
    language: Option<&'a str>,
) -> Vec<(&'static str, &'a str)> {
    let mut params = vec![("text", text)];
    if let Some(speaker) = speaker {
        params.push(("speaker_id", speaker));
    }
    if let Some(language) = language {
        params.push(("language_id", language));
    }
    params
}

#[async_trait]
impl SpeechModel for CoquiHttpModel {
    async fn infer(
        &self,
        text: &str,
        speaker: Option<&str>,
        language: Option<&str>,
    ) -> Result<Vec<f32>, ModelError> {
        tracing::debug!(
            url = %self.tts_url(),
            text_len = text.chars().count(),
            speaker = ?speaker,
            language = ?language,
            "Sending TTS request"
        );

        let response = self
            .client
            .get(self.tts_url())
            .query(&query_params(text, speaker, language))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout
                } else if e.is_connect() {
                    ModelError::NetworkError(format!("Cannot connect to TTS server: {}", e))
                } else {
                    ModelError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ModelError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let wav = response
            .bytes()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        let decoded = decode_wav(&wav)?;
        let source_rate = decoded.sample_rate;
        let audio = decoded.into_mono().resample(self.config.sample_rate);

        tracing::debug!(
            source_rate = source_rate,
            target_rate = self.config.sample_rate,
            samples = audio.samples.len(),
            "TTS response decoded"
        );

        Ok(audio.samples)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
