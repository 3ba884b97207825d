//! Error types for data fetching and analysis flows

use thiserror::Error;

/// Errors raised by the data clients and analysis flows
#[derive(Debug, Error)]
pub enum AnalystError {
    /// API request failed or returned an error status
    #[error("API error: {0}")]
    ApiError(String),

    /// The provider rejected the configured key
    #[error("Invalid {provider} API key; check your .env file")]
    InvalidApiKey { provider: String },

    /// A flow needs a credential that is not configured
    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    /// Data not available for the requested item
    #[error("Data not available for {item}: {reason}")]
    DataUnavailable { item: String, reason: String },

    /// User-supplied input was not in the expected shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prompt template error
    #[error("Prompt error: {0}")]
    PromptError(#[from] analyst_prompt::PromptError),

    /// Language model error
    #[error("LLM error: {0}")]
    LlmError(#[from] analyst_llm::LLMError),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalystError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalystError::MissingCredential("FRED_API_KEY");
        assert_eq!(err.to_string(), "Missing credential: FRED_API_KEY is not set");

        let err = AnalystError::InvalidApiKey {
            provider: "GNews".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid GNews API key; check your .env file");

        let err = AnalystError::DataUnavailable {
            item: "AAPL".to_string(),
            reason: "empty income statement".to_string(),
        };
        assert_eq!(err.to_string(), "Data not available for AAPL: empty income statement");
    }

    #[test]
    fn test_llm_error_conversion() {
        let err: AnalystError = analyst_llm::LLMError::RateLimitExceeded("quota".to_string()).into();
        assert!(matches!(err, AnalystError::LlmError(_)));
    }
}
