// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Grover search service.

use std::fmt;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Service error types.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Amplitude engine error
    Amplitude(AmplitudeError),
    /// Validation error
    Validation(ValidationError),
    /// Server error
    Server(String),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Amplitude(e) => write!(f, "Amplitude error: {}", e),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Server(msg) => write!(f, "Server error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Amplitude(e) => Some(e),
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// Whether the error was caused by caller input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Amplitude(_) | Error::Validation(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<AmplitudeError> for Error {
    fn from(e: AmplitudeError) -> Self {
        Error::Amplitude(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Errors raised by an amplitude engine.
///
/// Every engine operation validates its arguments before touching state, so
/// a failed call leaves the vector exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmplitudeError {
    /// Requested size is non-positive or above the engine's maximum
    InvalidSize { size: i64, max: usize },
    /// Index outside `[0, size)`
    InvalidIndex { index: i64, size: usize },
    /// Range not contained in `[0, size)` or with `start > end`
    InvalidRange { start: usize, end: usize, size: usize },
    /// Operation invoked before `initialize`
    NotInitialized,
}

impl fmt::Display for AmplitudeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmplitudeError::InvalidSize { size, max } => {
                write!(f, "Invalid size {}: must be in [1, {}]", size, max)
            }
            AmplitudeError::InvalidIndex { index, size } => {
                write!(f, "Index {} is out of bounds [0, {})", index, size)
            }
            AmplitudeError::InvalidRange { start, end, size } => {
                write!(
                    f,
                    "Range [{}, {}] is not contained in [0, {})",
                    start, end, size
                )
            }
            AmplitudeError::NotInitialized => write!(f, "Amplitudes not initialized"),
        }
    }
}

impl std::error::Error for AmplitudeError {}

/// Validation errors.
#[derive(Debug)]
pub enum ValidationError {
    /// Field validation failed
    Field { field: String, message: String },
    /// Resource limit exceeded
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Field '{}': {}", field, message)
            }
            ValidationError::ResourceLimit {
                resource,
                limit,
                requested,
            } => {
                write!(
                    f,
                    "Resource limit exceeded for {}: limit={}, requested={}",
                    resource, limit, requested
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
