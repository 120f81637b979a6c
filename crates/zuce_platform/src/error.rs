//! Platform error types

use thiserror::Error;

/// Errors raised by a host environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The stylesheet rejected a rule
    #[error("Invalid stylesheet rule: {0}")]
    InvalidRule(String),

    /// Rule insertion index past the end of the stylesheet
    #[error("Rule index {index} out of range for a stylesheet of {len} rules")]
    RuleIndex { index: usize, len: usize },

    /// No host has been installed on the current thread
    #[error("No host installed on this thread")]
    NoHost,

    /// Generic host error
    #[error("Host error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
