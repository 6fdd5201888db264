//! Error types for medium-api

use thiserror::Error;

/// Errors that can occur while talking to the Medium API
#[derive(Error, Debug)]
pub enum MediumError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with a non-200 status
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered 200 but the payload carried an `error` key,
    /// and retries were exhausted
    #[error("API error on {endpoint}: {message}")]
    Api { endpoint: String, message: String },

    /// Payload could not be decoded
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field the endpoint always returns was absent
    #[error("response from {endpoint} is missing field `{field}`")]
    MissingField { endpoint: String, field: String },

    /// Caller supplied an unusable argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Client configuration is invalid
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for MediumError {
    fn from(err: reqwest::Error) -> Self {
        MediumError::Http(err.to_string())
    }
}

/// Result type for Medium API operations.
pub type Result<T> = std::result::Result<T, MediumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = MediumError::Status {
            status: 403,
            body: "You are not subscribed to this API.".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("not subscribed"));
    }

    #[test]
    fn test_api_error_names_endpoint() {
        let err = MediumError::Api {
            endpoint: "/user/abc".to_string(),
            message: "User not found".to_string(),
        };
        assert!(err.to_string().contains("/user/abc"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: MediumError = parse.unwrap_err().into();
        assert!(matches!(err, MediumError::Json(_)));
    }
}
