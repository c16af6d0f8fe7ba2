//! Client error types.

use thiserror::Error;

use roomfinder_core::TimeError;
use roomfinder_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),

    /// A `pass::` or `env::` reference could not be resolved.
    #[error("secret error: {0}")]
    Secret(String),

    #[error("invalid time: {0}")]
    Time(#[from] TimeError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Every availability check failed.
    #[error("could not check room availability, please try again ({0})")]
    Resolution(#[source] ProviderError),

    #[error("could not book the room, please try again ({0})")]
    Booking(#[source] ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
