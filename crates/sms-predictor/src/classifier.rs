// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! SMS classification front
//!
//! Uses the loaded model when there is one and the heuristic otherwise.
//! Prediction never fails: any model error is logged and the message is
//! scored by the heuristic instead.

use std::sync::Arc;

use shared_types::{PredictionMethod, SmsLabel};
use tracing::{debug, instrument, warn};

use crate::{
    config::{ClassifierConfig, LoaderConfig},
    error::{SmsPredictorError, SmsPredictorResult},
    heuristic::HeuristicClassifier,
    loader::ModelArtifactLoader,
    source::{ArtifactSource, ConfiguredSource},
    types::{ConfidenceScore, SmsHealthStatus, SmsVerdict},
};

const HEALTH_PROBE: &str = "Test message";

/// Normalise a message before it reaches the model
///
/// Trims, lowercases and collapses runs of whitespace into one space.
pub fn preprocess(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Classifies SMS messages as spam or ham
#[derive(Debug)]
pub struct SmsClassifier<S = ConfiguredSource> {
    loader: Arc<ModelArtifactLoader<S>>,
    heuristic: HeuristicClassifier,
    config: ClassifierConfig,
}

impl SmsClassifier<ConfiguredSource> {
    /// Build a classifier and its loader from configuration
    pub fn from_config(
        loader_config: LoaderConfig,
        config: ClassifierConfig,
    ) -> SmsPredictorResult<Self> {
        let loader = ModelArtifactLoader::from_config(loader_config)?;
        Self::new(Arc::new(loader), config)
    }
}

impl<S: ArtifactSource> SmsClassifier<S> {
    /// Create a classifier over a shared loader
    pub fn new(loader: Arc<ModelArtifactLoader<S>>, config: ClassifierConfig) -> SmsPredictorResult<Self> {
        config.validate()?;
        Ok(Self {
            loader,
            heuristic: HeuristicClassifier::new(),
            config,
        })
    }

    /// The underlying loader
    pub fn loader(&self) -> &Arc<ModelArtifactLoader<S>> {
        &self.loader
    }

    /// Classifier settings
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one message
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn predict(&self, text: &str) -> SmsVerdict {
        let processed = preprocess(text);
        if processed.is_empty() {
            debug!("Nothing to classify");
            return SmsVerdict::unknown();
        }

        if self.config.lazy_load {
            self.loader.load().await;
        }

        match self.predict_with_model(&processed).await {
            Ok(Some(verdict)) => verdict,
            Ok(None) => {
                debug!("No model loaded, using heuristic");
                self.heuristic.classify(text)
            }
            Err(e) => {
                warn!(error = %e, "Model prediction failed, using heuristic");
                self.heuristic.classify(text)
            }
        }
    }

    async fn predict_with_model(&self, processed: &str) -> SmsPredictorResult<Option<SmsVerdict>> {
        let Some(model) = self.loader.model().await else {
            return Ok(None);
        };

        let batch = [processed.to_string()];
        let prediction = model
            .predict(&batch)?
            .into_iter()
            .next()
            .ok_or_else(|| SmsPredictorError::classification("model returned no prediction"))?;
        let label = prediction.to_label();

        let confidence = if model.supports_proba() {
            let class_index = usize::from(label.is_spam());
            let probability = model
                .predict_proba(&batch)?
                .first()
                .and_then(|row| row.get(class_index))
                .copied()
                .ok_or_else(|| {
                    SmsPredictorError::classification(format!(
                        "model returned no probability for class {class_index}"
                    ))
                })?;
            ConfidenceScore::saturating(probability)
        } else {
            ConfidenceScore::saturating(self.config.default_confidence)
        };

        Ok(Some(SmsVerdict::new(label, confidence, PredictionMethod::Model)))
    }

    /// Classify a probe message and report which path served it
    pub async fn health_check(&self) -> SmsHealthStatus {
        let verdict = self.predict(HEALTH_PROBE).await;
        let status = self.loader.status().await;

        SmsHealthStatus {
            healthy: verdict.label != SmsLabel::Unknown,
            model_loaded: status.is_loaded,
            fallback_mode: status.fallback_mode,
            prediction_method: verdict.method,
        }
    }
}
