use reqwest::StatusCode;
use thiserror::Error;

use crate::validation::ValidationErrors;

use super::envelope::Envelope;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Connection error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {}", detail_text(.message, .body))]
    Status {
        status: StatusCode,
        /// `error` or `message` from a JSON error envelope.
        message: Option<String>,
        /// Raw (truncated) body when it was not an envelope.
        body: Option<String>,
    },

    #[error("Response is missing its data field ({0})")]
    MissingData(&'static str),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// The server answered 2xx but reported a failure in the envelope.
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn detail_text<'a>(message: &'a Option<String>, body: &'a Option<String>) -> &'a str {
    message
        .as_deref()
        .or(body.as_deref())
        .unwrap_or("no message")
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build a status error from a non-success response body.
    ///
    /// The server usually answers with the `{error, message}` envelope; the
    /// `error` field wins over `message`. Anything else is kept as truncated
    /// text so it still shows up in logs, but is never shown to the user.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<Envelope<serde_json::Value>>(body) {
            Ok(envelope) => ApiError::Status {
                status,
                message: envelope.error.or(envelope.message),
                body: None,
            },
            Err(_) => ApiError::Status {
                status,
                message: None,
                body: Some(Self::truncate_body(body.trim())).filter(|b| !b.is_empty()),
            },
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Message supplied by the server, if it sent a JSON error envelope.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message: Some(m), .. } if !m.trim().is_empty() => Some(m),
            ApiError::Rejected(m) if !m.trim().is_empty() => Some(m),
            _ => None,
        }
    }

    /// Generic text for the failure class, ignoring any server message.
    pub fn generic_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "Connection error".to_string(),
            ApiError::Status { status, .. } => match status.as_u16() {
                401 => "Invalid credentials".to_string(),
                403 => "Access denied".to_string(),
                404 => "Not found".to_string(),
                429 => "Too many requests, please wait".to_string(),
                500..=599 => "Server error, please try again".to_string(),
                code => format!("Request failed ({})", code),
            },
            ApiError::MissingData(_) | ApiError::InvalidResponse(_) | ApiError::Rejected(_) => {
                "Unexpected response from server".to_string()
            }
            ApiError::Validation(errors) => errors.to_string(),
        }
    }

    /// Short human-readable text for notifications: the server's own
    /// message when present, otherwise the generic text.
    pub fn user_message(&self) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.generic_message())
    }
}
