// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Lookup context
//!
//! Owns the phone heading classifier and the SMS classifier and exposes the
//! operations callers use. Construct one per process and share it; the
//! model loader inside is single-flight.

use std::sync::Arc;

use phone_heading::{HeadingStore, InMemoryHeadingStore, PhoneAnalysis, PhoneClassifier};
use sms_predictor::{
    ArtifactSource, ConfiguredSource, LoadOutcome, ModelStatus, SmsClassifier, SmsHealthStatus,
    SmsVerdict,
};
use tracing::{info, instrument};

use crate::{config::LookupConfig, error::LookupResult};

/// Phone and SMS fraud lookup
#[derive(Debug)]
pub struct FraudLookup<H = Arc<InMemoryHeadingStore>, S = ConfiguredSource> {
    phones: PhoneClassifier<H>,
    sms: SmsClassifier<S>,
}

impl FraudLookup {
    /// Build the context from configuration
    ///
    /// Loads stored heading rules, seeds the international codes when
    /// configured and, with `warm_up`, loads the model before returning.
    pub async fn from_config(config: &LookupConfig) -> LookupResult<Self> {
        config.validate()?;

        let store = match &config.headings_file {
            Some(path) => InMemoryHeadingStore::from_file(path).await?,
            None => InMemoryHeadingStore::new(),
        };
        if config.populate_defaults {
            store.populate_defaults();
        }
        info!(
            environment = %config.environment,
            stored_headings = store.len(),
            "Heading store ready"
        );

        let sms = SmsClassifier::from_config(config.loader.clone(), config.classifier.clone())?;
        let lookup = Self::new(Arc::new(store), sms);

        if config.warm_up {
            let outcome = lookup.load_model().await;
            info!(loaded = outcome.is_loaded(), "Model warm-up finished");
        }

        Ok(lookup)
    }
}

impl<H: HeadingStore, S: ArtifactSource> FraudLookup<H, S> {
    /// Create a context from its collaborators
    pub fn new(store: H, sms: SmsClassifier<S>) -> Self {
        Self {
            phones: PhoneClassifier::new(store),
            sms,
        }
    }

    /// The heading store consulted before the built-in table
    pub fn heading_store(&self) -> &H {
        self.phones.store()
    }

    /// Classify a raw phone number by its heading
    #[instrument(skip(self))]
    pub fn classify_phone_head(&self, phone_number: &str) -> PhoneAnalysis {
        let analysis = self.phones.analyze(phone_number);
        info!(
            head = %analysis.head,
            region = %analysis.region,
            status = %analysis.status,
            "Classified phone number"
        );
        analysis
    }

    /// Classify an SMS message
    pub async fn predict_sms(&self, text: &str) -> SmsVerdict {
        let verdict = self.sms.predict(text).await;
        info!(
            label = %verdict.label,
            confidence = verdict.confidence.as_f64(),
            method = %verdict.method,
            "Classified SMS"
        );
        verdict
    }

    /// Load the model now; a no-op once loaded or in fallback mode
    pub async fn load_model(&self) -> LoadOutcome {
        self.sms.loader().load().await
    }

    /// Drop the model and allow a fresh load
    pub async fn unload_model(&self) {
        self.sms.loader().unload().await;
    }

    /// Drop the model and delete the cached artifact so the next load
    /// downloads it again
    pub async fn clear_model_cache(&self) -> LookupResult<()> {
        self.sms.loader().clear_cache().await?;
        Ok(())
    }

    /// Model loader status
    pub async fn get_model_status(&self) -> ModelStatus {
        self.sms.loader().status().await
    }

    /// Probe the SMS path
    pub async fn health_check(&self) -> SmsHealthStatus {
        self.sms.health_check().await
    }
}
