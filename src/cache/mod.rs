//! PolyBites response cache.
//!
//! - [`ResponseCache`]: process-wide JSON store with per-entry TTL and hit/miss counters
//! - [`CacheKey`]: structured `{resource, id?, variant?}` key derived from read routes
//! - [`InvalidationPolicy`]: mutation → key families to evict
//! - [`CacheInvalidator`]: applies eviction plans after committed writes
//! - [`response_cache_layer`]: axum middleware serving cacheable reads
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! listing_ttl_seconds = 300
//! detail_ttl_seconds = 600
//! aggregate_ttl_seconds = 0   # kept until invalidated
//! ```

mod config;
mod events;
mod keys;
mod middleware;
mod planner;
mod store;
mod trigger;

pub use config::CacheConfig;
pub use events::Mutation;
pub use keys::{CacheKey, KeyFamily, Resource, TtlClass};
pub use middleware::{CACHE_STATUS_HEADER, CacheState, response_cache_layer};
pub use planner::{EvictionPlan, InvalidationPolicy};
pub use store::{CacheStats, ResponseCache};
pub use trigger::CacheInvalidator;
