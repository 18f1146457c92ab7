//! Response cache middleware.
//!
//! Serves cacheable `GET` routes from [`ResponseCache`] and stores successful JSON
//! responses on a miss. Routes without a [`CacheKey`] pass straight through.

use std::sync::Arc;

use axum::{
    Json,
    body::{Body, HttpBody},
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{CacheConfig, CacheKey, ResponseCache};

/// Header reporting whether a response came from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Largest body the layer will buffer for caching.
const MAX_CACHEABLE_BODY_BYTES: u64 = 1024 * 1024;

/// Shared cache state for middleware.
#[derive(Clone)]
pub struct CacheState {
    pub config: CacheConfig,
    pub cache: Arc<ResponseCache>,
}

/// Middleware for response caching.
///
/// Only `GET` requests with a derivable key are considered; only `200 OK` JSON
/// bodies of known size are stored, with the TTL of the key's resource. A body
/// is dropped instead of stored if any eviction ran while the handler did.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(state): State<CacheState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.is_enabled() || request.method() != Method::GET {
        return next.run(request).await;
    }

    let Some(key) = CacheKey::from_request(request.uri().path(), request.uri().query()) else {
        return next.run(request).await;
    };

    if let Some(value) = state.cache.get(&key) {
        debug!(cache = "response", outcome = "hit", key = %key, "serving cached response");
        return cached_response(value);
    }

    debug!(
        cache = "response",
        outcome = "miss",
        key = %key,
        "cache miss, executing handler"
    );

    let generation = state.cache.generation();
    let response = next.run(request).await;
    if response.status() != StatusCode::OK || !is_json(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let fits = body
        .size_hint()
        .upper()
        .is_some_and(|upper| upper <= MAX_CACHEABLE_BODY_BYTES);
    if !fits {
        debug!(cache = "response", key = %key, "body too large or unsized, not cached");
        return Response::from_parts(parts, body);
    }

    let bytes: Bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            warn!(cache = "response", key = %key, error = %err, "failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => {
            let ttl = state.config.ttl_for(key.ttl_class());
            debug!(cache = "response", key = %key, ttl = ?ttl, "caching response");
            if !state.cache.set_if_current(key.clone(), value, ttl, generation) {
                debug!(
                    cache = "response",
                    key = %key,
                    "invalidated while the handler ran, not cached"
                );
            }
            parts
                .headers
                .insert(CACHE_STATUS_HEADER, HeaderValue::from_static("MISS"));
        }
        Err(err) => {
            warn!(cache = "response", key = %key, error = %err, "response body is not valid JSON");
        }
    }

    Response::from_parts(parts, Body::from(bytes))
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

fn cached_response(value: Value) -> Response {
    let mut response = Json(value).into_response();
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static("HIT"));
    response
}
