// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for SMS prediction operations
//!
//! This module provides error handling for the whole model lifecycle:
//! artifact download, integrity checks, deserialization, capability
//! validation and per-call classification failures.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::DEFAULT_REQUEST_TIMEOUT_SECONDS;

/// Result type alias for SMS prediction operations
pub type SmsPredictorResult<T> = Result<T, SmsPredictorError>;

/// Error context with load-cycle correlation
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Load cycle ID for correlation across logs
    pub cycle_id: Option<String>,
    /// Operation that failed
    pub operation: Option<String>,
    /// Timestamp when error occurred
    pub timestamp: Option<DateTime<Utc>>,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
}

impl ErrorContext {
    /// Create new error context
    pub fn new() -> Self {
        Self {
            cycle_id: None,
            operation: None,
            timestamp: Some(Utc::now()),
            metadata: HashMap::new(),
        }
    }

    /// Set load cycle ID for correlation
    pub fn with_cycle_id(mut self, cycle_id: impl Into<String>) -> Self {
        self.cycle_id = Some(cycle_id.into());
        self
    }

    /// Set operation name
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Add metadata key-value pair
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    fn annotate(&self, message: &mut String) {
        if let Some(cycle_id) = &self.cycle_id {
            message.push_str(&format!(" [cycle_id: {cycle_id}]"));
        }

        if let Some(operation) = &self.operation {
            message.push_str(&format!(" [operation: {operation}]"));
        }

        let mut metadata: Vec<_> = self.metadata.iter().collect();
        metadata.sort();
        for (key, value) in metadata {
            message.push_str(&format!(" [{key}: {value}]"));
        }
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types for SMS prediction and model lifecycle operations
#[derive(Debug, Error)]
pub enum SmsPredictorError {
    /// Loader or classifier configuration is invalid
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Artifact could not be fetched
    #[error("Download error: {message}")]
    Download {
        /// Error message
        message: String,
    },

    /// Fetched artifact failed verification
    #[error("Integrity error: {message}")]
    Integrity {
        /// Error message
        message: String,
    },

    /// Artifact bytes could not be decoded by any strategy
    #[error("Deserialization error: {message}")]
    Deserialization {
        /// Error message
        message: String,
    },

    /// Decoded artifact exposes no usable prediction capability
    #[error("Capability error: {message}")]
    Capability {
        /// Error message
        message: String,
    },

    /// A single prediction call failed
    #[error("Classification error: {message}")]
    Classification {
        /// Error message
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message
        message: String,
    },

    /// Artifact host rejected the credentials
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message
        message: String,
    },

    /// Artifact does not exist on the host
    #[error("Artifact not found: {message}")]
    NotFound {
        /// Error message
        message: String,
    },

    /// Request timeout
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout {
        /// Configured timeout
        timeout_seconds: u64,
    },

    /// Artifact host is temporarily unavailable
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Error message
        message: String,
    },

    /// I/O error (file operations)
    #[error("I/O error: {message}")]
    Io {
        /// Error message
        message: String,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message
        message: String,
    },
}

impl SmsPredictorError {
    /// Create a configuration error
    pub fn config<T: ToString>(message: T) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }

    /// Create a download error
    pub fn download<T: ToString>(message: T) -> Self {
        Self::Download {
            message: message.to_string(),
        }
    }

    /// Create an integrity error
    pub fn integrity<T: ToString>(message: T) -> Self {
        Self::Integrity {
            message: message.to_string(),
        }
    }

    /// Create a deserialization error
    pub fn deserialization<T: ToString>(message: T) -> Self {
        Self::Deserialization {
            message: message.to_string(),
        }
    }

    /// Create a capability error
    pub fn capability<T: ToString>(message: T) -> Self {
        Self::Capability {
            message: message.to_string(),
        }
    }

    /// Create a classification error
    pub fn classification<T: ToString>(message: T) -> Self {
        Self::Classification {
            message: message.to_string(),
        }
    }

    /// Create an HTTP error
    pub fn http<T: ToString>(message: T) -> Self {
        Self::Http {
            message: message.to_string(),
        }
    }

    /// Create an authentication error
    pub fn authentication<T: ToString>(message: T) -> Self {
        Self::Authentication {
            message: message.to_string(),
        }
    }

    /// Create a not found error
    pub fn not_found<T: ToString>(message: T) -> Self {
        Self::NotFound {
            message: message.to_string(),
        }
    }

    /// Create a timeout error
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Create an I/O error
    pub fn io<T: ToString>(message: T) -> Self {
        Self::Io {
            message: message.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal<T: ToString>(message: T) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create an HTTP error with context
    pub fn http_with_context<T: ToString>(message: T, context: &ErrorContext) -> Self {
        let mut enhanced_message = message.to_string();
        context.annotate(&mut enhanced_message);
        Self::Http {
            message: enhanced_message,
        }
    }

    /// Create a service unavailable error with context
    pub fn service_unavailable_with_context<T: ToString>(message: T, context: &ErrorContext) -> Self {
        let mut enhanced_message = message.to_string();
        context.annotate(&mut enhanced_message);
        Self::ServiceUnavailable {
            message: enhanced_message,
        }
    }

    /// Wrap any error raised while fetching into a download error
    pub fn into_download(self, context: &ErrorContext) -> Self {
        match self {
            Self::Download { .. } => self,
            other => {
                let mut message = other.to_string();
                context.annotate(&mut message);
                Self::Download { message }
            }
        }
    }

    /// Check if this error indicates a transient transport failure
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SmsPredictorError::Http { .. }
                | SmsPredictorError::Timeout { .. }
                | SmsPredictorError::ServiceUnavailable { .. }
        )
    }

    /// Check if a load cycle failing with this error may be attempted again
    ///
    /// Capability errors are terminal; the artifact will not change between
    /// attempts.
    pub fn is_cycle_retryable(&self) -> bool {
        !self.is_capability_error() && !self.is_config_error()
    }

    /// Check if this error indicates the artifact cannot serve predictions
    pub fn is_capability_error(&self) -> bool {
        matches!(self, SmsPredictorError::Capability { .. })
    }

    /// Check if this error indicates a configuration problem
    pub fn is_config_error(&self) -> bool {
        matches!(self, SmsPredictorError::Configuration { .. })
    }
}

/// Convert from reqwest errors
impl From<reqwest::Error> for SmsPredictorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            }
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                401 | 403 => Self::Authentication {
                    message: err.to_string(),
                },
                404 => Self::NotFound {
                    message: err.to_string(),
                },
                code if code >= 500 => Self::ServiceUnavailable {
                    message: err.to_string(),
                },
                _ => Self::Http {
                    message: err.to_string(),
                },
            }
        } else {
            Self::Http {
                message: err.to_string(),
            }
        }
    }
}

/// Convert from I/O errors
impl From<std::io::Error> for SmsPredictorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
