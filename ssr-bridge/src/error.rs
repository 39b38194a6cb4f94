//! Error types for the command bridge

use crate::scene::SourceId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// Wrong argument count, shape or element type
    #[error("{0}")]
    Usage(String),

    #[error("Not initialized, use 'init' first!")]
    Uninitialized,

    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("Couldn't convert source model string '{0}'!")]
    Conversion(String),

    #[error("Number of {what} must be {expected} ({context}), got {actual}!")]
    DimensionMismatch {
        what: &'static str,
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Three-dimensional positions are not supported (yet)!")]
    ThreeDimensional,

    #[error("Source {0} not found")]
    SourceNotFound(SourceId),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Engine error: {0}")]
    Engine(String),
}

impl BridgeError {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub(crate) fn rows(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what: "rows",
            context,
            expected,
            actual,
        }
    }

    pub(crate) fn columns(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what: "columns",
            context,
            expected,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
