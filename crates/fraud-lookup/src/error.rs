// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for wiring the lookup context

use phone_heading::HeadingError;
use sms_predictor::SmsPredictorError;
use thiserror::Error;

/// Errors raised while building a [`crate::FraudLookup`]
///
/// Classification itself never fails; these only surface during setup.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Heading rules could not be loaded
    #[error("Heading store error: {0}")]
    Heading(#[from] HeadingError),

    /// SMS predictor could not be created
    #[error("SMS predictor error: {0}")]
    Predictor(#[from] SmsPredictorError),
}

/// Result type for lookup setup
pub type LookupResult<T> = Result<T, LookupError>;

impl LookupError {
    /// Create a configuration error
    pub fn config<T: ToString>(message: T) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Check if this error came from configuration
    pub fn is_config_error(&self) -> bool {
        match self {
            Self::Config { .. } => true,
            Self::Predictor(inner) => inner.is_config_error(),
            Self::Heading(_) => false,
        }
    }
}

impl From<config::ConfigError> for LookupError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(format!("failed to load configuration: {err}"))
    }
}
