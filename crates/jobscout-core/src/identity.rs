//! Rotating client identities and proxy selection.

use rand::Rng;

/// Browser user-agents presented on successive attempts.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124 Safari/537.36",
];

/// User-agent for a 0-based attempt; the last entry is reused once exhausted.
pub fn user_agent(attempt: u32) -> &'static str {
    let idx = (attempt as usize).min(USER_AGENTS.len() - 1);
    USER_AGENTS[idx]
}

/// Externally supplied proxy endpoints, picked uniformly per attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyPool {
    proxies: Vec<String>,
}

impl ProxyPool {
    pub fn new(proxies: Vec<String>) -> Self {
        let proxies = proxies
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Self { proxies }
    }

    /// Parse a comma-separated list; blanks are dropped.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(',').map(str::to_string).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.proxies
    }

    /// Pick a proxy at random, or `None` when the pool is empty.
    pub fn pick(&self) -> Option<&str> {
        if self.proxies.is_empty() {
            return None;
        }
        let idx = rand::rng().random_range(0..self.proxies.len());
        Some(self.proxies[idx].as_str())
    }
}
