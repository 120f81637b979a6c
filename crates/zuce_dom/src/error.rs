//! Error types for zuce_dom

use thiserror::Error;
use zuce_platform::PlatformError;

/// Errors raised while building or starting an app
#[derive(Error, Debug)]
pub enum Error {
    /// The host rejected an operation
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Start options could not be parsed
    #[error("invalid start options: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for zuce_dom operations
pub type Result<T> = std::result::Result<T, Error>;
