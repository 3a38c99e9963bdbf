//! WAV Encoder - 浮点样本 → 16 位 PCM 单声道 WAV
//!
//! 幅度乘以 32767 后截断为 i16。超出 [-1, 1] 的样本先钳位，不会回绕。

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

use crate::application::ports::{AudioEncoderPort, EncodeError};

/// 默认输出采样率
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// WAV 编码器
#[derive(Debug, Clone)]
pub struct WavEncoder {
    sample_rate: u32,
}

impl WavEncoder {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    fn spec(&self) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }
}

impl Default for WavEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

/// f32 样本转换为 i16
pub fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

impl AudioEncoderPort for WavEncoder {
    fn encode(&self, samples: &[f32]) -> Result<Vec<u8>, EncodeError> {
        if samples.is_empty() {
            return Err(EncodeError::InvalidInput("model produced no audio".to_string()));
        }

        let mut buffer = Vec::with_capacity(44 + samples.len() * 2);
        {
            let mut cursor = Cursor::new(&mut buffer);
            let mut writer = WavWriter::new(&mut cursor, self.spec())
                .map_err(|e| EncodeError::EncodingError(format!("WAV header: {}", e)))?;

            for &sample in samples {
                writer
                    .write_sample(to_pcm16(sample))
                    .map_err(|e| EncodeError::EncodingError(format!("WAV write: {}", e)))?;
            }

            writer
                .finalize()
                .map_err(|e| EncodeError::EncodingError(format!("WAV finalize: {}", e)))?;
        }

        Ok(buffer)
    }

    fn content_type(&self) -> &'static str {
        "audio/wav"
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm16_scaling() {
        assert_eq!(to_pcm16(0.0), 0);
        assert_eq!(to_pcm16(1.0), 32767);
        assert_eq!(to_pcm16(-1.0), -32767);
        assert_eq!(to_pcm16(0.5), 16383);
    }

    #[test]
    fn test_pcm16_clamps_out_of_range() {
        assert_eq!(to_pcm16(1.5), 32767);
        assert_eq!(to_pcm16(-3.0), -32767);
        assert_eq!(to_pcm16(f32::NAN), 0);
    }

    #[test]
    fn test_encode_header() {
        let encoder = WavEncoder::default();
        let wav = encoder.encode(&[0.0, 0.25, -0.25, 1.0]).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + 4 * 2);
        // channels, sample rate, bits per sample
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 1);
        assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 22050);
        assert_eq!(u16::from_le_bytes([wav[34], wav[35]]), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(i16::from_le_bytes([wav[50], wav[51]]), 32767);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = WavEncoder::new(16000);
        let samples: Vec<f32> = (0..100).map(|i| (i as f32 / 10.0).sin()).collect();
        assert_eq!(encoder.encode(&samples).unwrap(), encoder.encode(&samples).unwrap());
        assert_eq!(encoder.sample_rate(), 16000);
        assert_eq!(encoder.content_type(), "audio/wav");
    }

    #[test]
    fn test_encode_rejects_empty() {
        let encoder = WavEncoder::default();
        assert!(matches!(
            encoder.encode(&[]),
            Err(EncodeError::InvalidInput(_))
        ));
    }
}
