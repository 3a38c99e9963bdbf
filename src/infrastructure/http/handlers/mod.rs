//! HTTP Handlers

mod service;
mod synth;

pub use service::*;
pub use synth::*;
