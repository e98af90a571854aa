//! Error taxonomy for a single polling cycle and for startup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    /// The remote source could not be reached, answered with an error status,
    /// or returned a body that is not JSON.
    #[error("transport error: {0}")]
    Transport(String),

    /// The body parsed as JSON but does not have the marker document shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("notification failed: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for WatchError {
    fn from(err: ureq::Error) -> Self {
        WatchError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;
