//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::CacheStats;

// ============================================================================
// Synth DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SynthRequest {
    pub text: String,
    /// 缺省时使用配置的默认 locale
    #[serde(default)]
    pub locale: Option<String>,
}

// ============================================================================
// Service DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub status: &'static str,
    pub version: &'static str,
    pub supported_locales: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub coalesced: u64,
    pub in_flight: usize,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            entries: stats.entries,
            capacity: stats.capacity,
            hits: stats.hit_count,
            misses: stats.miss_count,
            coalesced: stats.coalesced_count,
            in_flight: stats.in_flight,
        }
    }
}
