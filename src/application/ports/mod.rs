//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_encoder;
mod speech_model;

pub use audio_encoder::{AudioEncoderPort, EncodeError};
pub use speech_model::{ModelError, SpeechModel};
