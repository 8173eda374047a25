//! Per-client sliding-window rate limiter
//!
//! Each client identifier owns a bucket with a one-minute and a one-hour
//! window. A check purges, compares and records under that bucket's lock,
//! so requests from different clients never wait on each other.

use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Instant;

use crate::error::RateLimitError;
use crate::rate_limit::results::{LimitWindow, RateLimitResult};
use crate::rate_limit::window::SlidingWindow;

#[derive(Debug)]
struct Bucket {
    minute: SlidingWindow,
    hour: SlidingWindow,
}

impl Bucket {
    fn new() -> Self {
        Self {
            minute: SlidingWindow::new(LimitWindow::Minute.duration()),
            hour: SlidingWindow::new(LimitWindow::Hour.duration()),
        }
    }

    fn purge(&mut self, now: Instant) {
        self.minute.purge(now);
        self.hour.purge(now);
    }

    fn is_idle(&self) -> bool {
        self.minute.is_empty() && self.hour.is_empty()
    }
}

/// In-memory rate limiter shared by every request handler.
///
/// Construct once at startup and hand out by reference or `Arc`.
#[derive(Debug, Default)]
pub struct RateLimiter {
    buckets: RwLock<HashMap<String, Mutex<Bucket>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit or reject a request from `client_id`, recording it when admitted.
    pub fn check_rate_limit(
        &self,
        client_id: &str,
        max_per_minute: u32,
        max_per_hour: u32,
    ) -> Result<RateLimitResult, RateLimitError> {
        self.check_rate_limit_at(client_id, max_per_minute, max_per_hour, Instant::now())
    }

    /// Same as [`RateLimiter::check_rate_limit`] with an explicit clock reading.
    pub fn check_rate_limit_at(
        &self,
        client_id: &str,
        max_per_minute: u32,
        max_per_hour: u32,
        now: Instant,
    ) -> Result<RateLimitResult, RateLimitError> {
        validate_limit(LimitWindow::Minute, max_per_minute)?;
        validate_limit(LimitWindow::Hour, max_per_hour)?;

        let result = self.with_bucket(client_id, |bucket| {
            bucket.purge(now);

            if bucket.minute.len() >= max_per_minute as usize {
                return RateLimitResult::rejected(LimitWindow::Minute);
            }
            if bucket.hour.len() >= max_per_hour as usize {
                return RateLimitResult::rejected(LimitWindow::Hour);
            }

            bucket.minute.record(now);
            bucket.hour.record(now);
            RateLimitResult::allowed()
        });

        if let Some(window) = result.exceeded_window {
            debug!("Client {} over its per-{} limit", client_id, window);
        }
        Ok(result)
    }

    /// Remove buckets whose windows are both empty after purging.
    ///
    /// Returns the number of buckets removed.
    pub fn sweep_idle(&self, now: Instant) -> usize {
        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        let before = buckets.len();
        buckets.retain(|_, bucket| {
            let bucket = bucket.get_mut().unwrap_or_else(PoisonError::into_inner);
            bucket.purge(now);
            !bucket.is_idle()
        });
        let removed = before - buckets.len();
        if removed > 0 {
            info!(
                "Swept {} idle rate-limit buckets ({} remaining)",
                removed,
                buckets.len()
            );
        }
        removed
    }

    /// Number of client identifiers currently holding a bucket.
    pub fn tracked_clients(&self) -> usize {
        self.buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // The map read guard stays held while the bucket is locked, so a sweep
    // can never drop a bucket out from under an in-flight check.
    fn with_bucket<R>(&self, client_id: &str, f: impl FnOnce(&mut Bucket) -> R) -> R {
        {
            let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(bucket) = buckets.get(client_id) {
                let mut bucket = bucket.lock().unwrap_or_else(PoisonError::into_inner);
                return f(&mut *bucket);
            }
        }

        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        let bucket = buckets
            .entry(client_id.to_string())
            .or_insert_with(|| Mutex::new(Bucket::new()));
        let bucket = bucket.get_mut().unwrap_or_else(PoisonError::into_inner);
        f(bucket)
    }
}

fn validate_limit(window: LimitWindow, value: u32) -> Result<(), RateLimitError> {
    if value == 0 {
        return Err(RateLimitError::InvalidLimit { window, value });
    }
    Ok(())
}
