//! Error taxonomy shared across the gateway.

use thiserror::Error;

/// Gateway error.
///
/// Every variant is rendered to text at the tool boundary; none is fatal to
/// the hosting process.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A document or file is absent.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A document is present but unparsable or of the wrong shape.
    #[error("Malformed document: {0}")]
    Malformed(String),
    /// The remote server answered with a non-success status.
    #[error("API request failed with status {status}")]
    RemoteError { status: u16 },
    /// A response body was missing or invalid where one was required.
    #[error("Protocol error: {0}")]
    ProtocolError(String),
    /// Unknown conversation id.
    #[error("Invalid conversation_id: {0}")]
    InvalidHandle(String),
    /// The request could not be delivered.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The configured request deadline elapsed.
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// A caller-supplied argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// Status code carried by a remote error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteError { status } => Some(*status),
            _ => None,
        }
    }
}
