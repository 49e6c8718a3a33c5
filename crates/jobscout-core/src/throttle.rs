//! Per-host request pacing shared by every fetch in the process.
//!
//! [`HostThrottle`] owns the host → last-request map behind a mutex and
//! performs check-and-reserve as one critical section, so two tasks aimed
//! at the same host can never both observe a free slot. Clones share the
//! same map.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use jobscout_core::throttle::{HostThrottle, ThrottleConfig};
//!
//! # async fn run() {
//! let throttle = HostThrottle::new(ThrottleConfig::new(Duration::from_millis(200)));
//! throttle.wait_turn("www.indeed.com").await;
//! // ... send the request ...
//! throttle.record("www.indeed.com").await;
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::Mutex;
use url::Url;

/// Configuration for per-host pacing.
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Minimum gap between consecutive requests to the same host.
    pub min_interval: Duration,

    /// Maximum random jitter added when a wait is needed (uniform [0, jitter]).
    pub jitter: Duration,
}

impl ThrottleConfig {
    /// Create a config with the given interval and no jitter.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            jitter: Duration::ZERO,
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }
}

impl Default for ThrottleConfig {
    /// 200ms per host, up to 50ms jitter.
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(200),
            jitter: Duration::from_millis(50),
        }
    }
}

/// Injectable per-host rate limiter.
#[derive(Clone)]
pub struct HostThrottle {
    config: ThrottleConfig,
    /// Last request (or reserved slot) per host.
    last_request: Arc<Mutex<HashMap<String, Instant>>>,
}

impl HostThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            last_request: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    /// Extract the pacing key from a URL (host, plus port when explicit).
    pub fn host_key(url_str: &str) -> Option<String> {
        let url = Url::parse(url_str).ok()?;
        let host = url.host_str()?.to_lowercase();
        Some(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host,
        })
    }

    /// Wait until this host's slot is free.
    ///
    /// The slot is reserved before the lock is released: the map entry is
    /// moved forward to the moment this caller will send, so a concurrent
    /// caller computes its own wait from that reservation.
    pub async fn wait_turn(&self, host: &str) {
        let sleep_for = {
            let mut map = self.last_request.lock().await;
            let now = Instant::now();
            let wait = match map.get(host) {
                Some(&last) => (last + self.config.min_interval).saturating_duration_since(now),
                None => Duration::ZERO,
            };
            let wait = if wait.is_zero() {
                wait
            } else {
                wait + jitter(self.config.jitter)
            };
            map.insert(host.to_string(), now + wait);
            wait
        };

        if !sleep_for.is_zero() {
            tracing::debug!(
                host = %host,
                sleep_ms = %sleep_for.as_millis(),
                "Pacing request"
            );
            tokio::time::sleep(sleep_for).await;
        }
    }

    /// Record that a request to `host` just went out, successful or not.
    pub async fn record(&self, host: &str) {
        let now = Instant::now();
        let mut map = self.last_request.lock().await;
        let entry = map.entry(host.to_string()).or_insert(now);
        if *entry < now {
            *entry = now;
        }
    }

    /// Last recorded (or reserved) instant for a host.
    pub async fn last_seen(&self, host: &str) -> Option<Instant> {
        self.last_request.lock().await.get(host).copied()
    }
}

impl Default for HostThrottle {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}

/// Uniform random duration in [0, max].
pub(crate) fn jitter(max: Duration) -> Duration {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=max_ms))
}
