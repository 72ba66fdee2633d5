//! Backend transport errors and the shared error-code contract.
//!
//! ERROR HANDLING
//! ==============
//! Every layer has its own `thiserror` enum. All of them implement
//! [`ErrorCode`] so screens and logs can branch on a stable code instead of
//! matching display strings. `retryable` is a hint only; nothing in this
//! crate retries on its own.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

/// Stable machine-readable classification of an error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Errors produced while talking to the backend service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("backend responded {status}: {message}")]
    Response { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ClientError {
    /// HTTP status of a backend response error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend reported the record as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl ErrorCode for ClientError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Response { status: 400, .. } => "E_BAD_REQUEST",
            Self::Response { status: 401 | 403, .. } => "E_UNAUTHORIZED",
            Self::Response { status: 404, .. } => "E_NOT_FOUND",
            Self::Response { .. } => "E_RESPONSE",
            Self::Parse(_) => "E_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Response { status: 429 | 500..=599, .. })
    }
}
