use thiserror::Error;

/// Application-wide error types for Jobscout.
#[derive(Error, Debug)]
pub enum AppError {
    /// The server answered with a status outside the accepted range.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// The response was an anti-bot challenge (HTTP 429 or a block page).
    #[error("Blocked by target site: {0}")]
    BlockDetected(String),

    /// Every attempt of a fetch failed. Carries the most recent cause.
    #[error("Fetch failed after {attempts} attempts: {last}")]
    FetchExhausted { attempts: u32, last: Box<AppError> },

    /// Markup or value could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The caller passed an argument the engine cannot work with.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration value is missing or malformed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// None of the requested source ids is registered.
    #[error("No registered source among: {0}")]
    NoSources(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Returns true if this error is transient and worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_)
            | AppError::Timeout(_)
            | AppError::BlockDetected(_)
            | AppError::HttpError(_) => true,
            _ => false,
        }
    }

    /// Returns true if this error (or its last cause) was an anti-bot block.
    pub fn is_block(&self) -> bool {
        match self {
            AppError::BlockDetected(_) => true,
            AppError::FetchExhausted { last, .. } => last.is_block(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(AppError::NetworkError("reset".into()).is_retryable());
        assert!(AppError::Timeout(3000).is_retryable());
        assert!(AppError::BlockDetected("captcha".into()).is_retryable());
        assert!(AppError::HttpError("HTTP 503".into()).is_retryable());
        assert!(!AppError::ParseError("bad selector".into()).is_retryable());
        assert!(!AppError::InvalidArgument("quota".into()).is_retryable());
    }

    #[test]
    fn test_exhausted_keeps_last_cause() {
        let err = AppError::FetchExhausted {
            attempts: 3,
            last: Box::new(AppError::BlockDetected("HTTP 429".into())),
        };
        assert!(err.is_block());
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Fetch failed after 3 attempts: Blocked by target site: HTTP 429"
        );
    }
}
