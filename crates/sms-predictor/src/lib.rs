// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! SMS spam prediction with a remotely hosted model
//!
//! The model artifact is downloaded from an artifact host, verified,
//! decoded and checked for a usable prediction capability. Until that
//! succeeds, or after it has failed too many times, messages are scored by
//! a keyword and pattern heuristic so classification always returns a
//! verdict.
//!
//! # Architecture
//!
//! - [`loader`]: load state machine with retries and fallback mode
//! - [`source`]: where artifact bytes come from (HTTP host or local file)
//! - [`artifact`]: decoding strategies and capability resolution
//! - [`model`]: the prediction interface and its adapters
//! - [`heuristic`]: rule-based scoring used without a model
//! - [`classifier`]: the front that picks model or heuristic per message
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use sms_predictor::{ClassifierConfig, LoaderConfig, SmsClassifier};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader_config = LoaderConfig::new(
//!     "hoangson2006/vietnamese-fraud-detection",
//!     "sms_classifier.json",
//! );
//! let classifier = SmsClassifier::from_config(loader_config, ClassifierConfig::default())?;
//!
//! let verdict = classifier.predict("Chúc mừng bạn đã trúng thưởng!").await;
//! println!("{} via {}", verdict.label, verdict.method);
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod classifier;
pub mod config;
pub mod definition;
pub mod error;
pub mod heuristic;
pub mod loader;
pub mod model;
pub mod source;
pub mod types;

// Re-export main types for convenience
pub use classifier::{SmsClassifier, preprocess};
pub use config::{ClassifierConfig, LoaderConfig};
pub use error::{ErrorContext, SmsPredictorError, SmsPredictorResult};
pub use heuristic::{HeuristicClassifier, HeuristicScore, HeuristicSignal};
pub use loader::ModelArtifactLoader;
pub use model::PredictiveModel;
pub use source::{ArtifactSource, ConfiguredSource, HttpArtifactSource, LocalFileSource};
pub use types::{
    ConfidenceScore, LoadOutcome, LoadPhase, ModelKind, ModelStatus, RawPrediction,
    SmsHealthStatus, SmsVerdict,
};
