// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! SMS verdict vocabulary

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label assigned to an SMS message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsLabel {
    /// Message is spam or fraud
    Spam,
    /// Message is legitimate
    Ham,
    /// No classification could be made
    Unknown,
}

impl SmsLabel {
    /// Check if the label represents spam
    pub fn is_spam(&self) -> bool {
        matches!(self, SmsLabel::Spam)
    }

    /// Check if the label represents a legitimate message
    pub fn is_ham(&self) -> bool {
        matches!(self, SmsLabel::Ham)
    }

    /// Get the wire representation of this label
    pub fn as_str(&self) -> &'static str {
        match self {
            SmsLabel::Spam => "spam",
            SmsLabel::Ham => "ham",
            SmsLabel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SmsLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced an SMS verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    /// The loaded predictive model
    Model,
    /// The keyword heuristic fallback
    Heuristic,
    /// Nothing was classified
    None,
}

impl PredictionMethod {
    /// Get the wire representation of this method
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMethod::Model => "model",
            PredictionMethod::Heuristic => "heuristic",
            PredictionMethod::None => "none",
        }
    }
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk tier derived from a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Not spam, or spam with weak confidence
    Low,
    /// Spam with moderate confidence
    Medium,
    /// Spam with strong confidence
    High,
}

impl RiskLevel {
    /// Confidence at or above which spam is high risk
    pub const HIGH_THRESHOLD: f64 = 0.8;
    /// Confidence at or above which spam is medium risk
    pub const MEDIUM_THRESHOLD: f64 = 0.6;

    /// Derive the risk tier for a label and confidence
    pub fn from_verdict(label: SmsLabel, confidence: f64) -> Self {
        if !label.is_spam() {
            return RiskLevel::Low;
        }

        if confidence >= Self::HIGH_THRESHOLD {
            RiskLevel::High
        } else if confidence >= Self::MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Get the wire representation of this tier
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_boolean_checks() {
        assert!(SmsLabel::Spam.is_spam());
        assert!(!SmsLabel::Spam.is_ham());
        assert!(SmsLabel::Ham.is_ham());
        assert!(!SmsLabel::Unknown.is_spam());
        assert!(!SmsLabel::Unknown.is_ham());
    }

    #[test]
    fn risk_tiers() {
        assert_eq!(RiskLevel::from_verdict(SmsLabel::Spam, 0.95), RiskLevel::High);
        assert_eq!(RiskLevel::from_verdict(SmsLabel::Spam, 0.8), RiskLevel::High);
        assert_eq!(RiskLevel::from_verdict(SmsLabel::Spam, 0.7), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_verdict(SmsLabel::Spam, 0.6), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_verdict(SmsLabel::Spam, 0.3), RiskLevel::Low);
        assert_eq!(RiskLevel::from_verdict(SmsLabel::Ham, 0.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_verdict(SmsLabel::Unknown, 0.0), RiskLevel::Low);
    }

    #[test]
    fn serde_serialization() {
        assert_eq!(serde_json::to_string(&SmsLabel::Ham).unwrap(), "\"ham\"");
        assert_eq!(
            serde_json::to_string(&PredictionMethod::Heuristic).unwrap(),
            "\"heuristic\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn serde_deserialization() {
        let label: SmsLabel = serde_json::from_str("\"spam\"").unwrap();
        assert_eq!(label, SmsLabel::Spam);

        let method: PredictionMethod = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(method, PredictionMethod::None);

        let risk: RiskLevel = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(risk, RiskLevel::Medium);
    }
}
