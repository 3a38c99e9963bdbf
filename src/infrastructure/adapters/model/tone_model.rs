//! Tone Model - 离线确定性合成后端
//!
//! 每个字符渲染一段短音调（空白渲染为静音），相同输入总是得到相同样本。
//! 用于本地调试和测试，不依赖外部推理服务。

use async_trait::async_trait;
use std::f32::consts::PI;

use crate::application::ports::{ModelError, SpeechModel};

/// Tone Model 配置
#[derive(Debug, Clone)]
pub struct ToneModelConfig {
    pub sample_rate: u32,
    /// 每个字符的时长（毫秒）
    pub char_duration_ms: u32,
    pub amplitude: f32,
}

impl Default for ToneModelConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            char_duration_ms: 60,
            amplitude: 0.3,
        }
    }
}

/// Tone Model
pub struct ToneModel {
    config: ToneModelConfig,
}

impl ToneModel {
    pub fn new(config: ToneModelConfig) -> Self {
        Self { config }
    }

    /// 基频，speaker 不同则音高偏移
    fn frequency(c: char, speaker: Option<&str>) -> f32 {
        let base = 180.0 + (c as u32 % 48) as f32 * 10.0;
        let shift = speaker
            .map(|s| s.bytes().map(u32::from).sum::<u32>() % 5)
            .unwrap_or(0);
        base + shift as f32 * 15.0
    }

    fn render(&self, text: &str, speaker: Option<&str>) -> Vec<f32> {
        let per_char =
            (self.config.sample_rate as u64 * self.config.char_duration_ms as u64 / 1000) as usize;
        let ramp = (per_char / 10).max(1);
        let mut samples = Vec::with_capacity(per_char * text.chars().count());

        for c in text.chars() {
            if c.is_whitespace() {
                samples.extend(std::iter::repeat(0.0).take(per_char));
                continue;
            }

            let freq = Self::frequency(c, speaker);
            for i in 0..per_char {
                // 首尾淡入淡出，避免爆音
                let envelope = (i.min(per_char - 1 - i) as f32 / ramp as f32).min(1.0);
                let t = i as f32 / self.config.sample_rate as f32;
                samples.push(self.config.amplitude * envelope * (2.0 * PI * freq * t).sin());
            }
        }

        samples
    }
}

impl Default for ToneModel {
    fn default() -> Self {
        Self::new(ToneModelConfig::default())
    }
}

#[async_trait]
impl SpeechModel for ToneModel {
    async fn infer(
        &self,
        text: &str,
        speaker: Option<&str>,
        _language: Option<&str>,
    ) -> Result<Vec<f32>, ModelError> {
        if self.config.sample_rate == 0 {
            return Err(ModelError::BackendError("sample rate is 0".to_string()));
        }

        let samples = self.render(text, speaker);
        tracing::debug!(
            text_len = text.chars().count(),
            samples = samples.len(),
            "ToneModel rendered"
        );
        Ok(samples)
    }
}
