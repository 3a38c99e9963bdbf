//! HTTP Layer - RESTful API
//!
//! POST /synth、GET /health、GET /、GET /cache/stats

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::HttpServer;
pub use state::{AppState, SynthLimits};
