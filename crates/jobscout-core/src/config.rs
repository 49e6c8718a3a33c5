use std::time::Duration;

use crate::error::AppError;
use crate::fetch::RetryDelays;
use crate::identity::ProxyPool;
use crate::throttle::{HostThrottle, ThrottleConfig};

/// Environment-driven settings for the fetch layer.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub proxies: ProxyPool,
    pub per_host_interval: Duration,
    pub pre_delay: Duration,
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            proxies: ProxyPool::default(),
            per_host_interval: Duration::from_millis(200),
            pre_delay: Duration::from_millis(80),
            debug: false,
        }
    }
}

impl EngineConfig {
    /// Read configuration from environment variables.
    ///
    /// - `JOBSCOUT_PROXY_URLS`, else `PROXY_URLS`, else `PROXY_URL` (comma-separated)
    /// - `JOBSCOUT_PER_HOST_INTERVAL_MS` (optional, defaults to 200)
    /// - `JOBSCOUT_PREDELAY_MS` (optional, defaults to 80)
    /// - `JOBSCOUT_DEBUG` (optional; `0`/`false` or empty disables)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let proxies = ["JOBSCOUT_PROXY_URLS", "PROXY_URLS", "PROXY_URL"]
            .into_iter()
            .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
            .map(|list| ProxyPool::parse(&list))
            .unwrap_or_default();

        let per_host_interval = match lookup("JOBSCOUT_PER_HOST_INTERVAL_MS") {
            None => defaults.per_host_interval,
            Some(raw) => parse_millis("JOBSCOUT_PER_HOST_INTERVAL_MS", &raw)?,
        };
        let pre_delay = match lookup("JOBSCOUT_PREDELAY_MS") {
            None => defaults.pre_delay,
            Some(raw) => parse_millis("JOBSCOUT_PREDELAY_MS", &raw)?,
        };
        let debug = lookup("JOBSCOUT_DEBUG").is_some_and(|v| is_truthy(&v));

        Ok(Self {
            proxies,
            per_host_interval,
            pre_delay,
            debug,
        })
    }

    /// A fresh pacing component with the configured interval.
    pub fn throttle(&self) -> HostThrottle {
        HostThrottle::new(ThrottleConfig {
            min_interval: self.per_host_interval,
            ..ThrottleConfig::default()
        })
    }

    pub fn delays(&self) -> RetryDelays {
        RetryDelays::default().with_pre_delay(self.pre_delay)
    }

    /// `tracing` directive for the crate's own targets.
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "jobscout=debug"
        } else {
            "jobscout=info"
        }
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration, AppError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| {
            AppError::ConfigError(format!(
                "Invalid {key} '{raw}': must be a non-negative integer (milliseconds)"
            ))
        })
}

fn is_truthy(raw: &str) -> bool {
    !matches!(raw.trim().to_lowercase().as_str(), "" | "0" | "false" | "no" | "off")
}
