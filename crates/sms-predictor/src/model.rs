// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prediction interface and the adapters that provide it
//!
//! An artifact can expose prediction in different shapes. Each adapter
//! turns one shape into a [`PredictiveModel`]:
//!
//! - [`DirectModel`]: the artifact is a predict-capable model
//! - [`DictWrappedModel`]: the model sits under a known key of a mapping
//! - [`CallableModel`]: the artifact only exposes a scoring call

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    definition::LinearTextModel,
    error::{SmsPredictorError, SmsPredictorResult},
    types::{ClassProbabilities, ModelKind, RawPrediction},
};

/// Batch prediction interface every loaded model provides
pub trait PredictiveModel: Send + Sync + fmt::Debug {
    /// Which adapter produced this model
    fn kind(&self) -> ModelKind;

    /// Predict one raw output per input
    fn predict(&self, batch: &[String]) -> SmsPredictorResult<Vec<RawPrediction>>;

    /// Whether [`PredictiveModel::predict_proba`] is available
    fn supports_proba(&self) -> bool {
        false
    }

    /// Per-class probabilities, one vector per input
    fn predict_proba(&self, batch: &[String]) -> SmsPredictorResult<Vec<ClassProbabilities>> {
        let _ = batch;
        Err(SmsPredictorError::capability(
            "model does not provide class probabilities",
        ))
    }
}

/// A predict-capable model used as is
#[derive(Debug, Clone)]
pub struct DirectModel {
    inner: LinearTextModel,
}

impl DirectModel {
    /// Wrap a predict-capable model
    pub fn new(inner: LinearTextModel) -> Self {
        Self { inner }
    }
}

impl PredictiveModel for DirectModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Direct
    }

    fn predict(&self, batch: &[String]) -> SmsPredictorResult<Vec<RawPrediction>> {
        Ok(batch.iter().map(|text| self.inner.predict_one(text)).collect())
    }

    fn supports_proba(&self) -> bool {
        true
    }

    fn predict_proba(&self, batch: &[String]) -> SmsPredictorResult<Vec<ClassProbabilities>> {
        Ok(batch
            .iter()
            .map(|text| self.inner.probabilities(text))
            .collect())
    }
}

/// Descriptive metadata carried next to a wrapped model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactMetadata {
    /// Model name
    pub name: Option<String>,
    /// Model version as published
    pub version: Option<String>,
    /// Class labels in index order
    pub class_names: Vec<String>,
}

/// A model unwrapped from a mapping
#[derive(Debug)]
pub struct DictWrappedModel {
    inner: Box<dyn PredictiveModel>,
    wrapper_key: String,
    metadata: ArtifactMetadata,
}

impl DictWrappedModel {
    /// Wrap an already validated inner model
    pub fn new(
        inner: Box<dyn PredictiveModel>,
        wrapper_key: impl Into<String>,
        metadata: ArtifactMetadata,
    ) -> Self {
        Self {
            inner,
            wrapper_key: wrapper_key.into(),
            metadata,
        }
    }

    /// Key the model was found under
    pub fn wrapper_key(&self) -> &str {
        &self.wrapper_key
    }

    /// Metadata found next to the model
    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Adapter of the inner model
    pub fn inner_kind(&self) -> ModelKind {
        self.inner.kind()
    }
}

impl PredictiveModel for DictWrappedModel {
    fn kind(&self) -> ModelKind {
        ModelKind::DictWrapped
    }

    fn predict(&self, batch: &[String]) -> SmsPredictorResult<Vec<RawPrediction>> {
        self.inner.predict(batch)
    }

    fn supports_proba(&self) -> bool {
        self.inner.supports_proba()
    }

    fn predict_proba(&self, batch: &[String]) -> SmsPredictorResult<Vec<ClassProbabilities>> {
        self.inner.predict_proba(batch)
    }
}

/// Scoring call: one spam score per input
pub type ScoreFn = Arc<dyn Fn(&[String]) -> Vec<f64> + Send + Sync>;

/// A bare scoring call exposed through the prediction interface
#[derive(Clone)]
pub struct CallableModel {
    name: String,
    call: ScoreFn,
}

impl CallableModel {
    /// Wrap a scoring call
    pub fn new(name: impl Into<String>, call: ScoreFn) -> Self {
        Self {
            name: name.into(),
            call,
        }
    }

    /// Name of the wrapped call
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CallableModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableModel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PredictiveModel for CallableModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Callable
    }

    fn predict(&self, batch: &[String]) -> SmsPredictorResult<Vec<RawPrediction>> {
        let scores = (self.call)(batch);
        if scores.len() != batch.len() {
            return Err(SmsPredictorError::classification(format!(
                "callable '{}' returned {} scores for {} inputs",
                self.name,
                scores.len(),
                batch.len()
            )));
        }

        Ok(scores.into_iter().map(RawPrediction::Score).collect())
    }
}
