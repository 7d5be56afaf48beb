// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Phone heading safety status

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Safety status attached to a phone number heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingStatus {
    /// Heading belongs to a trusted range
    Safe,
    /// Heading is untrusted or unknown
    Unsafe,
}

/// Error returned when a status string is neither `safe` nor `unsafe`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown heading status '{value}', expected 'safe' or 'unsafe'")]
pub struct ParseStatusError {
    /// The rejected input
    pub value: String,
}

impl HeadingStatus {
    /// Check if the status represents a trusted heading
    pub fn is_safe(&self) -> bool {
        matches!(self, HeadingStatus::Safe)
    }

    /// Check if the status represents an untrusted heading
    pub fn is_unsafe(&self) -> bool {
        matches!(self, HeadingStatus::Unsafe)
    }

    /// Get the wire representation of this status
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingStatus::Safe => "safe",
            HeadingStatus::Unsafe => "unsafe",
        }
    }
}

impl fmt::Display for HeadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(HeadingStatus::Safe),
            "unsafe" => Ok(HeadingStatus::Unsafe),
            _ => Err(ParseStatusError {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_boolean_checks() {
        assert!(HeadingStatus::Safe.is_safe());
        assert!(!HeadingStatus::Safe.is_unsafe());
        assert!(HeadingStatus::Unsafe.is_unsafe());
        assert!(!HeadingStatus::Unsafe.is_safe());
    }

    #[test]
    fn parse_accepts_mixed_case() {
        assert_eq!("SAFE".parse::<HeadingStatus>(), Ok(HeadingStatus::Safe));
        assert_eq!(" unsafe ".parse::<HeadingStatus>(), Ok(HeadingStatus::Unsafe));
        assert!("blocked".parse::<HeadingStatus>().is_err());
    }

    #[test]
    fn serde_round_trip_uses_lowercase() {
        let serialized = serde_json::to_string(&HeadingStatus::Unsafe).unwrap();
        assert_eq!(serialized, "\"unsafe\"");

        let deserialized: HeadingStatus = serde_json::from_str("\"safe\"").unwrap();
        assert_eq!(deserialized, HeadingStatus::Safe);
    }
}
