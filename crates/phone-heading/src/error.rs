// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for heading rules and stores

use thiserror::Error;

/// Result type alias for heading operations
pub type HeadingResult<T> = Result<T, HeadingError>;

/// Errors raised while building or loading heading rules
///
/// Classification itself never fails; these only surface when rules are
/// constructed or a store is loaded from disk.
#[derive(Debug, Error)]
pub enum HeadingError {
    /// Prefix is not 1-4 digits with an optional leading '+'
    #[error("Invalid heading prefix '{prefix}': {message}")]
    InvalidPrefix {
        /// The rejected prefix
        prefix: String,
        /// Why it was rejected
        message: String,
    },

    /// Region label is empty
    #[error("Invalid region: {message}")]
    InvalidRegion {
        /// Why it was rejected
        message: String,
    },

    /// Heading file could not be read
    #[error("I/O error: {message}")]
    Io {
        /// Error message
        message: String,
    },

    /// Heading file could not be parsed
    #[error("Parse error: {message}")]
    Parse {
        /// Error message
        message: String,
    },
}

impl HeadingError {
    /// Create an invalid prefix error
    pub fn invalid_prefix<P: ToString, M: ToString>(prefix: P, message: M) -> Self {
        Self::InvalidPrefix {
            prefix: prefix.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an invalid region error
    pub fn invalid_region<T: ToString>(message: T) -> Self {
        Self::InvalidRegion {
            message: message.to_string(),
        }
    }

    /// Create an I/O error
    pub fn io<T: ToString>(message: T) -> Self {
        Self::Io {
            message: message.to_string(),
        }
    }

    /// Create a parse error
    pub fn parse<T: ToString>(message: T) -> Self {
        Self::Parse {
            message: message.to_string(),
        }
    }

    /// Check if this error comes from rule validation rather than I/O
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            HeadingError::InvalidPrefix { .. } | HeadingError::InvalidRegion { .. }
        )
    }
}

impl From<std::io::Error> for HeadingError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err)
    }
}

impl From<serde_json::Error> for HeadingError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err)
    }
}

impl From<serde_yaml::Error> for HeadingError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(err)
    }
}
