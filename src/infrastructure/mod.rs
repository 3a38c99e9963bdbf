//! Infrastructure Layer - 基础设施层
//!
//! 提供端口的具体实现（模型后端、WAV 编解码）以及 HTTP 接口

pub mod adapters;
pub mod http;
