//! WAV Decoder - 解析 tts-server 返回的 WAV
//!
//! tts-server 输出整数 PCM（通常 16-bit）或 32-bit float，采样率随模型而定。
//! 解析为 [-1, 1] 浮点样本后，由调用方下混并重采样到输出采样率。

use hound::{SampleFormat, WavReader};
use std::io::Cursor;

use crate::application::ports::ModelError;

/// 解码后的 PCM 数据
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// 交错样本
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u8,
}

impl DecodedAudio {
    /// 多声道取平均下混为单声道
    pub fn into_mono(self) -> Self {
        if self.channels <= 1 {
            return self;
        }

        let samples = self
            .samples
            .chunks(self.channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        Self {
            samples,
            sample_rate: self.sample_rate,
            channels: 1,
        }
    }

    /// 线性插值重采样，多声道输入先下混
    pub fn resample(self, to_rate: u32) -> Self {
        let mono = self.into_mono();
        if mono.sample_rate == to_rate || mono.sample_rate == 0 || to_rate == 0 {
            return mono;
        }

        let last = match mono.samples.len().checked_sub(1) {
            Some(last) => last,
            None => return Self { sample_rate: to_rate, ..mono },
        };

        let step = mono.sample_rate as f64 / to_rate as f64;
        let out_len = (mono.samples.len() as f64 / step) as usize;
        let samples = (0..out_len)
            .map(|i| {
                let pos = i as f64 * step;
                let left = (pos as usize).min(last);
                let right = (left + 1).min(last);
                let t = (pos - left as f64) as f32;
                mono.samples[left] * (1.0 - t) + mono.samples[right] * t
            })
            .collect();

        Self {
            samples,
            sample_rate: to_rate,
            channels: 1,
        }
    }
}

fn invalid(e: hound::Error) -> ModelError {
    ModelError::InvalidResponse(format!("Malformed WAV: {}", e))
}

/// 解析 WAV 字节为浮点样本
pub fn decode_wav(data: &[u8]) -> Result<DecodedAudio, ModelError> {
    let mut reader = WavReader::new(Cursor::new(data)).map_err(invalid)?;
    let spec = reader.spec();

    if spec.channels == 0 || spec.channels > u8::MAX as u16 {
        return Err(ModelError::InvalidResponse(format!(
            "Unsupported channel count: {}",
            spec.channels
        )));
    }

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?,
        (SampleFormat::Int, bits @ 8..=32) => {
            let scale = 1.0 / (1u64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(invalid)?
        }
        (format, bits) => {
            return Err(ModelError::InvalidResponse(format!(
                "Unsupported sample format: {:?} {}-bit",
                format, bits
            )));
        }
    };

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels as u8,
    })
}
