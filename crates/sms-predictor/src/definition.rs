// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Model definitions carried inside an artifact
//!
//! Two definitions are understood. `linear_text` is a full model with
//! predict and probability outputs. `keyword_score` is only a scoring
//! function and needs the callable adapter.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{SmsPredictorError, SmsPredictorResult},
    types::{ClassProbabilities, RawPrediction},
};

const MAX_NGRAM: usize = 3;

/// Shape of the value returned by `predict`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Integer class index
    #[default]
    ClassId,
    /// Class label from `class_names`
    Label,
    /// Spam probability
    Score,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_class_names() -> [String; 2] {
    ["ham".to_string(), "spam".to_string()]
}

fn default_max_ngram() -> usize {
    1
}

/// Logistic model over lowercase word n-grams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearTextModel {
    /// Intercept added to every logit
    #[serde(default)]
    pub bias: f64,
    /// Weight per n-gram
    pub weights: HashMap<String, f64>,
    /// Spam probability at which class 1 is predicted
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Shape of the `predict` output
    #[serde(default)]
    pub output: OutputKind,
    /// Labels for class 0 and class 1
    #[serde(default = "default_class_names")]
    pub class_names: [String; 2],
    /// Longest n-gram looked up in `weights`
    #[serde(default = "default_max_ngram")]
    pub max_ngram: usize,
}

impl LinearTextModel {
    /// Create a unigram model with default threshold and outputs
    pub fn new(bias: f64, weights: HashMap<String, f64>) -> Self {
        Self {
            bias,
            weights,
            threshold: default_threshold(),
            output: OutputKind::default(),
            class_names: default_class_names(),
            max_ngram: default_max_ngram(),
        }
    }

    /// Check the model can produce predictions
    pub fn validate(&self) -> SmsPredictorResult<()> {
        if self.weights.is_empty() {
            return Err(SmsPredictorError::capability(
                "linear_text model has no weights",
            ));
        }

        if !self.bias.is_finite() || self.weights.values().any(|w| !w.is_finite()) {
            return Err(SmsPredictorError::capability(
                "linear_text model has non-finite weights",
            ));
        }

        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(SmsPredictorError::capability(format!(
                "linear_text threshold {} is outside (0, 1)",
                self.threshold
            )));
        }

        if self.max_ngram == 0 || self.max_ngram > MAX_NGRAM {
            return Err(SmsPredictorError::capability(format!(
                "linear_text max_ngram {} is outside 1-{MAX_NGRAM}",
                self.max_ngram
            )));
        }

        Ok(())
    }

    /// Spam probability for one text
    pub fn spam_probability(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .collect();

        let mut logit = self.bias;
        for n in 1..=self.max_ngram.min(tokens.len()) {
            for window in tokens.windows(n) {
                let weight = if n == 1 {
                    self.weights.get(window[0])
                } else {
                    self.weights.get(&window.join(" "))
                };
                logit += weight.copied().unwrap_or(0.0);
            }
        }

        1.0 / (1.0 + (-logit).exp())
    }

    /// Raw prediction for one text
    pub fn predict_one(&self, text: &str) -> RawPrediction {
        let probability = self.spam_probability(text);
        let is_spam = probability >= self.threshold;

        match self.output {
            OutputKind::ClassId => RawPrediction::ClassId(i64::from(is_spam)),
            OutputKind::Label => RawPrediction::Label(self.class_names[usize::from(is_spam)].clone()),
            OutputKind::Score => RawPrediction::Score(probability),
        }
    }

    /// Probabilities of class 0 and class 1 for one text
    pub fn probabilities(&self, text: &str) -> ClassProbabilities {
        let probability = self.spam_probability(text);
        vec![1.0 - probability, probability]
    }
}

/// Additive keyword scoring function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordScoreFunction {
    /// Score before any keyword is seen
    #[serde(default)]
    pub base: f64,
    /// Score added when the keyword occurs in the lowercased text
    pub keywords: HashMap<String, f64>,
}

impl KeywordScoreFunction {
    /// Check the function can produce scores
    pub fn validate(&self) -> SmsPredictorResult<()> {
        if self.keywords.is_empty() {
            return Err(SmsPredictorError::capability(
                "keyword_score function has no keywords",
            ));
        }

        if !self.base.is_finite() || self.keywords.values().any(|w| !w.is_finite()) {
            return Err(SmsPredictorError::capability(
                "keyword_score function has non-finite weights",
            ));
        }

        Ok(())
    }

    /// Spam score in `[0, 1]` for one text
    pub fn score(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let total = self
            .keywords
            .iter()
            .filter(|(keyword, _)| lowered.contains(keyword.to_lowercase().as_str()))
            .fold(self.base, |acc, (_, weight)| acc + weight);
        total.clamp(0.0, 1.0)
    }
}
