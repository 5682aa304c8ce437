//! Common error types for Geli

use thiserror::Error;

/// Common result type for Geli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Geli client
#[derive(Error, Debug)]
pub enum Error {
    /// Request could not be sent or no response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Response arrived but could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Server answered with an `{error}` body
    #[error("{0}")]
    Application(String),

    /// Caller broke a controller contract (e.g. rating an already-ranked item)
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A submission for this surface is already in flight
    #[error("Busy: {0}")]
    Busy(&'static str),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True for failures of the HTTP exchange itself (as opposed to an
    /// application error reported by the server).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Parse(_))
    }
}
