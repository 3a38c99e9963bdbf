//! Audio Adapter - WAV 编码与解码

mod wav_decoder;
mod wav_encoder;

pub use wav_decoder::{decode_wav, DecodedAudio};
pub use wav_encoder::{to_pcm16, WavEncoder, DEFAULT_SAMPLE_RATE};
