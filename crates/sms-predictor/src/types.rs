// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Type-safe domain models for SMS prediction
//!
//! Strongly-typed wrappers for verdicts, raw model outputs and loader
//! status, so invalid confidences and impossible states cannot be built.

use std::{fmt, path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{PredictionMethod, RiskLevel, SmsLabel};

use crate::error::{SmsPredictorError, SmsPredictorResult};

/// Confidence score between 0.0 and 1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    /// Create a new confidence score with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the score is not between 0.0 and 1.0 or is NaN
    pub fn new(score: f64) -> SmsPredictorResult<Self> {
        if score.is_nan() {
            return Err(SmsPredictorError::classification(
                "Confidence score cannot be NaN",
            ));
        }

        if !(0.0..=1.0).contains(&score) {
            return Err(SmsPredictorError::classification(format!(
                "Confidence score must be between 0.0 and 1.0, got {score}"
            )));
        }

        Ok(Self(score))
    }

    /// Clamp any value into range; NaN becomes zero
    pub fn saturating(score: f64) -> Self {
        if score.is_nan() {
            Self(0.0)
        } else {
            Self(score.clamp(0.0, 1.0))
        }
    }

    /// Zero confidence
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Get the score as f64
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ConfidenceScore {
    type Error = SmsPredictorError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceScore> for f64 {
    fn from(score: ConfidenceScore) -> Self {
        score.0
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Raw output of a predictive model for one input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawPrediction {
    /// Integer class index
    ClassId(i64),
    /// Textual class label
    Label(String),
    /// Spam score in `[0, 1]`
    Score(f64),
}

impl RawPrediction {
    /// Map a raw output onto spam or ham
    ///
    /// Class 1, the labels `spam`/`1`/`true` and scores of at least 0.5
    /// are spam; everything else is ham.
    pub fn to_label(&self) -> SmsLabel {
        let is_spam = match self {
            RawPrediction::ClassId(class) => *class == 1,
            RawPrediction::Label(label) => {
                matches!(
                    label.trim().to_lowercase().as_str(),
                    "spam" | "1" | "true"
                )
            }
            RawPrediction::Score(score) => *score >= 0.5,
        };

        if is_spam { SmsLabel::Spam } else { SmsLabel::Ham }
    }
}

/// Per-class probabilities for one input, indexed by class id
pub type ClassProbabilities = Vec<f64>;

/// Final verdict for one SMS message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsVerdict {
    /// Assigned label
    pub label: SmsLabel,
    /// Confidence in the label
    pub confidence: ConfidenceScore,
    /// Path that produced the label
    pub method: PredictionMethod,
}

impl SmsVerdict {
    /// Create a verdict
    pub fn new(label: SmsLabel, confidence: ConfidenceScore, method: PredictionMethod) -> Self {
        Self {
            label,
            confidence,
            method,
        }
    }

    /// Verdict for input with nothing to classify
    pub fn unknown() -> Self {
        Self::new(
            SmsLabel::Unknown,
            ConfidenceScore::zero(),
            PredictionMethod::None,
        )
    }

    /// Risk tier of this verdict
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_verdict(self.label, self.confidence.as_f64())
    }
}

/// Phases of the model load state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "attempt")]
pub enum LoadPhase {
    /// No model held, no load attempted since start or unload
    Unloaded,
    /// Fetching the artifact
    Downloading,
    /// Checking the fetched artifact
    Verifying,
    /// Decoding the artifact
    Deserializing,
    /// Resolving a prediction capability
    Validating,
    /// Model ready for predictions
    Loaded,
    /// The given attempt failed; another may follow
    Failed(u32),
    /// Attempts exhausted, heuristic predictions only
    Fallback,
}

impl LoadPhase {
    /// Whether the phase is stable until an unload
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadPhase::Loaded | LoadPhase::Fallback)
    }

    /// Whether a load cycle is running
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            LoadPhase::Downloading
                | LoadPhase::Verifying
                | LoadPhase::Deserializing
                | LoadPhase::Validating
                | LoadPhase::Failed(_)
        )
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPhase::Unloaded => f.write_str("unloaded"),
            LoadPhase::Downloading => f.write_str("downloading"),
            LoadPhase::Verifying => f.write_str("verifying"),
            LoadPhase::Deserializing => f.write_str("deserializing"),
            LoadPhase::Validating => f.write_str("validating"),
            LoadPhase::Loaded => f.write_str("loaded"),
            LoadPhase::Failed(attempt) => write!(f, "failed({attempt})"),
            LoadPhase::Fallback => f.write_str("fallback"),
        }
    }
}

/// How the loaded artifact was adapted to the prediction interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Artifact is itself predict-capable
    Direct,
    /// Artifact wraps a predict-capable model under a known key
    DictWrapped,
    /// Artifact only exposes a scoring call
    Callable,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Direct => f.write_str("direct"),
            ModelKind::DictWrapped => f.write_str("dict_wrapped"),
            ModelKind::Callable => f.write_str("callable"),
        }
    }
}

/// Where the artifact comes from and where it is cached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactIdentity {
    /// Repository identifier
    pub repo_id: String,
    /// Artifact file name
    pub filename: String,
    /// Local path of the artifact
    pub path: PathBuf,
}

/// Snapshot of the loader state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatus {
    /// Current phase
    pub phase: LoadPhase,
    /// Whether a model is ready
    pub is_loaded: bool,
    /// Whether predictions are heuristic only
    pub fallback_mode: bool,
    /// Failed attempts since the last success or unload
    pub load_attempts: u32,
    /// Configured attempt budget
    pub max_attempts: u32,
    /// Message of the most recent failure
    pub last_error: Option<String>,
    /// When the model was last loaded
    pub last_load_time: Option<DateTime<Utc>>,
    /// Duration of the last successful load cycle
    pub last_load_duration_ms: Option<u64>,
    /// Adapter used for the loaded model
    pub model_kind: Option<ModelKind>,
    /// Whether the loaded model produces probabilities
    pub supports_proba: bool,
    /// Size of the loaded artifact on disk
    pub artifact_size_bytes: Option<u64>,
    /// Artifact identity
    pub artifact: ArtifactIdentity,
}

/// Result of a load request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum LoadOutcome {
    /// This call completed a load cycle
    Loaded {
        /// Attempts the cycle needed
        attempts: u32,
        /// Wall time of the cycle in milliseconds
        duration_ms: u64,
    },
    /// A model was already loaded
    AlreadyLoaded,
    /// The loader is in fallback mode
    Fallback {
        /// Failed attempts recorded
        attempts: u32,
        /// Message of the most recent failure
        last_error: Option<String>,
    },
}

impl LoadOutcome {
    /// Whether a model is available after this outcome
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. } | LoadOutcome::AlreadyLoaded)
    }

    pub(crate) fn loaded(attempts: u32, duration: Duration) -> Self {
        LoadOutcome::Loaded {
            attempts,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Health report of the SMS classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmsHealthStatus {
    /// Whether a probe prediction produced a label
    pub healthy: bool,
    /// Whether a model is loaded
    pub model_loaded: bool,
    /// Whether the loader is in fallback mode
    pub fallback_mode: bool,
    /// Path that served the probe
    pub prediction_method: PredictionMethod,
}
