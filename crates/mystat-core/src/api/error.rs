use std::fmt;

use thiserror::Error;

use crate::auth::FieldError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication rejected: {}", FieldErrors(.0))]
    Authentication(Vec<FieldError>),

    #[error("Unauthorized after token refresh: {path}")]
    Unauthorized { path: String },

    #[error("Request failed with status {status}: {}", ApiError::truncate_body(.body))]
    RequestFailed { status: u16, body: String },

    #[error("Client not initialized")]
    Uninitialized,

    #[error("Failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to resolve the user's group id")]
    GroupUnresolved,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

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

    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        ApiError::RequestFailed {
            status: status.as_u16(),
            body,
        }
    }

    pub fn decode(path: &str, source: serde_json::Error) -> Self {
        ApiError::Decode {
            path: path.to_string(),
            source,
        }
    }

    /// Field errors carried by a rejected login, empty for every other variant
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ApiError::Authentication(errors) => errors,
            _ => &[],
        }
    }
}

struct FieldErrors<'a>(&'a [FieldError]);

impl fmt::Display for FieldErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no details provided");
        }
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}
