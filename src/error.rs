//! Client error types
//!
//! Failures of a single backend call. Every failure is scoped to the view
//! that issued the call; nothing here is fatal to the application.

use thiserror::Error;

/// Errors that can occur talking to the analysis backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Request never produced a response (connection refused, DNS, aborted by the network)
    #[error("Network error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("Request failed ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Status {
        status: u16,
        /// `message` field of the error body, when the backend sent one
        message: Option<String>,
    },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Decode(String),

    /// The view that issued the request was torn down
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    /// Server-provided message, if the backend sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Status { status: 401 | 403, .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type for backend calls
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message() {
        let err = ClientError::Status {
            status: 400,
            message: Some("Username already exists".to_string()),
        };
        assert_eq!(err.server_message(), Some("Username already exists"));
        assert_eq!(
            err.to_string(),
            "Request failed (400): Username already exists"
        );
        assert!(ClientError::Transport("refused".into()).server_message().is_none());
    }

    #[test]
    fn test_unauthorized() {
        assert!(ClientError::Status { status: 403, message: None }.is_unauthorized());
        assert!(!ClientError::Status { status: 500, message: None }.is_unauthorized());
    }
}
