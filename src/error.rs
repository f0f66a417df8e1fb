use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-2xx response. The raw body is kept so the operator sees the
    /// server's diagnostics verbatim.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed JSON response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Status code of an HTTP failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
