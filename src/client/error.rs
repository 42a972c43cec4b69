//! Transport Error Taxonomy
//!
//! Every failure of the integrity service transport collapses into a
//! `ClientError`. None of them are fatal to a session: the controller
//! logs the loss and the next capture tick proceeds normally.

/// Failure of a single integrity service call
#[derive(Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, TLS)
    Transport(reqwest::Error),
    /// Service answered with a non-success HTTP status
    Rejected(reqwest::StatusCode),
    /// Response body could not be decoded
    Decode(reqwest::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "Request failed: {}", e),
            ClientError::Rejected(status) => {
                write!(f, "Service rejected request with status {}", status)
            }
            ClientError::Decode(e) => write!(f, "Invalid response body: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}
