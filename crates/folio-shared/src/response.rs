//! Standardized error body: `{"error": ..., "message": ...}`.

use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
///
/// `error` is the HTTP reason phrase, `message` a human-readable explanation
/// that never contains internal paths or causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("Bad Request", message)
    }

    pub fn forbidden() -> Self {
        Self::new("Forbidden", "Valid API Key required.")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("Not Found", message)
    }

    pub fn too_many_requests() -> Self {
        Self::new(
            "Too Many Requests",
            "You have exceeded your request rate limit. Please try again later.",
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("Internal Server Error", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_body() {
        let json = serde_json::to_string(&ErrorResponse::forbidden()).unwrap();
        assert_eq!(
            json,
            r#"{"error":"Forbidden","message":"Valid API Key required."}"#
        );
    }
}
