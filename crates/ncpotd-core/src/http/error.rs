//! Request error type: curl failure vs. non-2xx status.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
}

impl RequestError {
    /// Status code for HTTP failures, `None` for transport-level ones.
    pub fn status(&self) -> Option<u32> {
        match self {
            RequestError::Http(code) => Some(*code),
            RequestError::Curl(_) => None,
        }
    }
}
