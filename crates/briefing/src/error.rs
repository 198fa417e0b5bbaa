//! Error types for the briefing pipeline

use thiserror::Error;

/// Briefing pipeline specific errors
#[derive(Debug, Error)]
pub enum BriefingError {
    /// Upstream returned an empty or missing time series
    #[error("No data available for {symbol}")]
    NoData { symbol: String },

    /// Network or HTTP transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider returned an explicit error payload or a non-success status
    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },

    /// Rate limit exceeded for a data provider
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// Chart rendering or saving failed
    #[error("Chart error: {0}")]
    Chart(String),

    /// Analysis pipeline failed (non-fatal for report generation)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file read/write/delete failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested report does not exist
    #[error("Report not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for briefing operations
pub type Result<T> = std::result::Result<T, BriefingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BriefingError::NoData {
            symbol: "ZZZZINVALID".to_string(),
        };
        assert_eq!(err.to_string(), "No data available for ZZZZINVALID");

        let err = BriefingError::Provider {
            provider: "Alpha Vantage".to_string(),
            message: "Invalid API call".to_string(),
        };
        assert_eq!(err.to_string(), "Alpha Vantage error: Invalid API call");

        let err = BriefingError::NotFound("AAPL_daily_report_20240101_000000".to_string());
        assert!(err.to_string().contains("Report not found"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BriefingError = io_err.into();
        assert!(matches!(err, BriefingError::Io(_)));
    }
}
