//! Token-bucket limiter for the `/api` routes.
//!
//! The bucket holds up to `general.rate_limit_per_sec` tokens and refills
//! at that many per second, so a client may burst a full second's worth of
//! chat requests and then settles to the configured rate. An empty bucket
//! answers 429 with a `Retry-After` hint.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Extension, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use jarvis_core::config::GeneralConfig;

use crate::error::ApiError;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    refilled_at: Instant,
}

/// Shared limiter state. Clones draw from the same bucket.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    per_sec: f64,
    bucket: Arc<Mutex<Bucket>>,
}

impl RateLimiter {
    /// A full bucket of `per_sec` tokens (at least one).
    pub fn new(per_sec: u32) -> Self {
        let per_sec = f64::from(per_sec.max(1));
        Self {
            per_sec,
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: per_sec,
                refilled_at: Instant::now(),
            })),
        }
    }

    pub fn from_config(config: &GeneralConfig) -> Self {
        Self::new(config.rate_limit_per_sec)
    }

    /// Take one token, or report how long until one is available.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> Result<(), Duration> {
        let mut bucket = self.bucket.lock().unwrap_or_else(|p| p.into_inner());

        let elapsed = now.saturating_duration_since(bucket.refilled_at);
        bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * self.per_sec).min(self.per_sec);
        bucket.refilled_at = bucket.refilled_at.max(now);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - bucket.tokens) / self.per_sec))
        }
    }
}

/// Axum middleware that enforces the limiter from the request extensions.
pub async fn rate_limit_middleware(
    Extension(limiter): Extension<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    match limiter.try_acquire() {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            tracing::debug!(path = %req.uri().path(), wait_ms = wait.as_millis() as u64, "Rate limited");
            ApiError::TooManyRequests {
                retry_after_secs: wait.as_secs_f64().ceil().max(1.0) as u64,
            }
            .into_response()
        }
    }
}
