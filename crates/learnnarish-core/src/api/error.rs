use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied to {collection}: {body}")]
    AccessDenied { collection: String, body: String },

    #[error("Unauthorized - the content server rejected the request")]
    Unauthorized,

    #[error("Collection not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(collection: &str, status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied {
                collection: collection.to_string(),
                body: truncated,
            },
            404 => ApiError::NotFound(collection.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            ApiError::from_status("words", StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status("words", StatusCode::NOT_FOUND, "{}"),
            ApiError::NotFound(ref c) if c == "words"
        ));
        assert!(matches!(
            ApiError::from_status("words", StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::ServerError(ref b) if b == "upstream"
        ));
        assert!(matches!(
            ApiError::from_status("words", StatusCode::BAD_REQUEST, "bad filter"),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "ɂ".repeat(400);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated, 800 total bytes"));
    }
}
