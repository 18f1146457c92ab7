//! Cache configuration.

use std::time::Duration;

use serde::Deserialize;

use super::keys::TtlClass;

const DEFAULT_LISTING_TTL_SECS: u64 = 300;
const DEFAULT_DETAIL_TTL_SECS: u64 = 600;
const DEFAULT_AGGREGATE_TTL_SECS: u64 = 0;

/// Response cache configuration.
///
/// A TTL of `0` stores entries without expiry; they live until invalidated or flushed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the response cache.
    pub enabled: bool,
    /// TTL for list endpoints.
    pub listing_ttl_seconds: u64,
    /// TTL for single-entity endpoints.
    pub detail_ttl_seconds: u64,
    /// TTL for stats endpoints.
    pub aggregate_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listing_ttl_seconds: DEFAULT_LISTING_TTL_SECS,
            detail_ttl_seconds: DEFAULT_DETAIL_TTL_SECS,
            aggregate_ttl_seconds: DEFAULT_AGGREGATE_TTL_SECS,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            listing_ttl_seconds: settings.listing_ttl_seconds,
            detail_ttl_seconds: settings.detail_ttl_seconds,
            aggregate_ttl_seconds: settings.aggregate_ttl_seconds,
        }
    }
}

impl CacheConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Expiry for a TTL class; `None` means the entry never expires.
    pub fn ttl_for(&self, class: TtlClass) -> Option<Duration> {
        let seconds = match class {
            TtlClass::Listing => self.listing_ttl_seconds,
            TtlClass::Detail => self.detail_ttl_seconds,
            TtlClass::Aggregate => self.aggregate_ttl_seconds,
        };
        (seconds > 0).then(|| Duration::from_secs(seconds))
    }
}
