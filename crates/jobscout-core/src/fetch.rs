//! Resilient page fetching over a pluggable [`Transport`].
//!
//! Each attempt rotates the user-agent, optionally picks a proxy, waits for
//! the per-host slot, and classifies the response. HTTP 429 and known
//! challenge pages count as block events and are retried like network
//! errors. Attempts run strictly one after another.

use std::time::Duration;

use crate::error::AppError;
use crate::identity::{ProxyPool, user_agent};
use crate::throttle::{HostThrottle, jitter};
use crate::traits::{FetchOptions, Fetcher, HttpRequest, HttpResponse, Transport};

/// Phrases that mark a response body as an anti-bot challenge.
pub const BLOCK_SIGNATURES: &[&str] = &[
    "captcha",
    "unusual traffic",
    "verify you are a human",
    "access denied",
    "pardon our interruption",
];

/// Delays applied around each attempt.
#[derive(Debug, Clone)]
pub struct RetryDelays {
    /// Fixed delay before every attempt.
    pub pre_delay: Duration,
    /// Random extra on top of `pre_delay`.
    pub pre_jitter: Duration,
    /// Added once per previous attempt on retries.
    pub retry_step: Duration,
    /// Fixed part of the retry jitter.
    pub retry_jitter_base: Duration,
    /// Random part of the retry jitter.
    pub retry_jitter: Duration,
}

impl Default for RetryDelays {
    fn default() -> Self {
        Self {
            pre_delay: Duration::from_millis(80),
            pre_jitter: Duration::from_millis(120),
            retry_step: Duration::from_millis(300),
            retry_jitter_base: Duration::from_millis(200),
            retry_jitter: Duration::from_millis(300),
        }
    }
}

impl RetryDelays {
    /// No delays at all. Useful in tests.
    pub fn none() -> Self {
        Self {
            pre_delay: Duration::ZERO,
            pre_jitter: Duration::ZERO,
            retry_step: Duration::ZERO,
            retry_jitter_base: Duration::ZERO,
            retry_jitter: Duration::ZERO,
        }
    }

    pub fn with_pre_delay(mut self, pre_delay: Duration) -> Self {
        self.pre_delay = pre_delay;
        self
    }

    /// Total sleep before the 0-based `attempt`.
    pub fn before_attempt(&self, attempt: u32) -> Duration {
        let mut delay = self.pre_delay + jitter(self.pre_jitter);
        if attempt > 0 {
            delay += self.retry_step * attempt
                + self.retry_jitter_base
                + jitter(self.retry_jitter);
        }
        delay
    }
}

/// Classify a response as a block event, if it is one.
pub fn detect_block(status: u16, body: &str) -> Option<String> {
    if status == 429 {
        return Some("HTTP 429".to_string());
    }
    let lower = body.to_lowercase();
    BLOCK_SIGNATURES
        .iter()
        .find(|sig| lower.contains(*sig))
        .map(|sig| format!("block page ({sig})"))
}

/// Turn a raw response into a page body or the error to retry on.
fn classify(url: &str, response: HttpResponse) -> Result<String, AppError> {
    if let Some(reason) = detect_block(response.status, &response.body) {
        return Err(AppError::BlockDetected(reason));
    }
    if !(200..400).contains(&response.status) {
        return Err(AppError::HttpError(format!(
            "HTTP {} for {}",
            response.status, url
        )));
    }
    Ok(response.body)
}

/// [`Fetcher`] that retries through identity rotation, proxies and pacing.
#[derive(Clone)]
pub struct ResilientFetcher<T> {
    transport: T,
    throttle: HostThrottle,
    proxies: ProxyPool,
    delays: RetryDelays,
}

impl<T: Transport> ResilientFetcher<T> {
    pub fn new(transport: T, throttle: HostThrottle) -> Self {
        Self {
            transport,
            throttle,
            proxies: ProxyPool::default(),
            delays: RetryDelays::default(),
        }
    }

    pub fn with_proxies(mut self, proxies: ProxyPool) -> Self {
        self.proxies = proxies;
        self
    }

    pub fn with_delays(mut self, delays: RetryDelays) -> Self {
        self.delays = delays;
        self
    }

    pub fn throttle(&self) -> &HostThrottle {
        &self.throttle
    }

    fn build_request(&self, url: &str, options: &FetchOptions, attempt: u32) -> HttpRequest {
        let mut headers = vec![
            ("Accept-Language".to_string(), options.accept_language.clone()),
            ("Cache-Control".to_string(), "no-cache".to_string()),
            ("Pragma".to_string(), "no-cache".to_string()),
        ];
        headers.extend(options.extra_headers.iter().cloned());

        HttpRequest {
            url: url.to_string(),
            user_agent: user_agent(attempt).to_string(),
            headers,
            proxy: self.proxies.pick().map(str::to_string),
            timeout: options.timeout,
        }
    }

    async fn attempt(&self, url: &str, host: Option<&str>, request: &HttpRequest) -> Result<String, AppError> {
        if let Some(host) = host {
            self.throttle.wait_turn(host).await;
        }
        let result = self.transport.get(request).await;
        if let Some(host) = host {
            self.throttle.record(host).await;
        }
        classify(url, result?)
    }
}

impl<T: Transport> Fetcher for ResilientFetcher<T> {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, AppError> {
        if options.max_attempts == 0 {
            return Err(AppError::InvalidArgument(
                "max_attempts must be at least 1".into(),
            ));
        }
        let host = HostThrottle::host_key(url);
        let mut last_error = None;

        for attempt in 0..options.max_attempts {
            let delay = self.delays.before_attempt(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let request = self.build_request(url, options, attempt);
            tracing::debug!(
                %url,
                attempt = attempt + 1,
                max_attempts = options.max_attempts,
                via_proxy = request.proxy.is_some(),
                "GET"
            );

            match self.attempt(url, host.as_deref(), &request).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    if e.is_block() {
                        tracing::warn!(%url, attempt = attempt + 1, error = %e, "Blocked, retrying");
                    } else {
                        tracing::debug!(%url, attempt = attempt + 1, error = %e, "Attempt failed");
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(AppError::FetchExhausted {
            attempts: options.max_attempts,
            last: Box::new(
                last_error.unwrap_or_else(|| AppError::NetworkError("no attempt made".into())),
            ),
        })
    }
}
