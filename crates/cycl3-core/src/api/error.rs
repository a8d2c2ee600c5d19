use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("{0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// XRPC error body: `{"error": "AuthenticationRequired", "message": "..."}`
#[derive(Debug, Deserialize)]
struct XrpcErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    /// Pull the human-readable part out of an XRPC error body, falling back
    /// to the raw (truncated) body.
    fn describe(body: &str) -> String {
        match serde_json::from_str::<XrpcErrorBody>(body) {
            Ok(XrpcErrorBody { message: Some(message), .. }) if !message.is_empty() => message,
            Ok(XrpcErrorBody { error: Some(error), .. }) if !error.is_empty() => error,
            _ => Self::truncate_body(body),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::describe(body);
        match status.as_u16() {
            400 => ApiError::BadRequest(detail),
            401 => ApiError::Unauthorized(detail),
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }

    /// HTTP status this error was built from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            ApiError::ServerError(_) | ApiError::InvalidResponse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_auth_and_rate_limit() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"AuthenticationRequired","message":"Invalid identifier or password"}"#,
        );
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Invalid identifier or password"));
        assert_eq!(err.status(), Some(401));

        let err = ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(matches!(err, ApiError::RateLimited));
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_bad_request_uses_xrpc_message() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":"InvalidRequest","message":"Record/text must not be longer than 300 graphemes"}"#,
        );
        assert_eq!(err.to_string(), "Record/text must not be longer than 300 graphemes");
    }

    #[test]
    fn test_error_name_used_when_message_missing() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error":"ExpiredToken"}"#);
        assert_eq!(err.to_string(), "ExpiredToken");
    }

    #[test]
    fn test_non_json_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &body);
        match err {
            ApiError::ServerError(detail) => {
                assert!(detail.contains("truncated"));
                assert!(detail.contains(&format!("{} total bytes", body.len())));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
