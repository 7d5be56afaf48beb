// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Model artifact loader
//!
//! Drives the artifact through download, verification, deserialization and
//! capability validation, retrying whole cycles up to `max_attempts` times
//! with a fixed delay. Once attempts are exhausted, or the artifact turns
//! out to have no usable capability, the loader settles in fallback mode
//! until [`ModelArtifactLoader::unload`] is called.
//!
//! Load cycles are single-flight: concurrent callers queue on one gate and
//! observe the outcome of the cycle that ran.

use std::{
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tokio::{
    fs,
    sync::{Mutex, RwLock},
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    artifact::{deserialize_artifact, resolve_model},
    config::{LoaderConfig, partial_path},
    error::{ErrorContext, SmsPredictorError, SmsPredictorResult},
    model::PredictiveModel,
    source::{ArtifactSource, ConfiguredSource},
    types::{
        ArtifactIdentity, ClassProbabilities, LoadOutcome, LoadPhase, ModelStatus, RawPrediction,
    },
};

/// Input used to check a freshly resolved model can predict
const PROBE_TEXT: &str = "test message";

#[derive(Debug)]
struct LoaderState {
    phase: LoadPhase,
    model: Option<Arc<dyn PredictiveModel>>,
    load_attempts: u32,
    last_error: Option<String>,
    last_load_time: Option<DateTime<Utc>>,
    last_load_duration: Option<Duration>,
    artifact_size_bytes: Option<u64>,
}

impl Default for LoaderState {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Unloaded,
            model: None,
            load_attempts: 0,
            last_error: None,
            last_load_time: None,
            last_load_duration: None,
            artifact_size_bytes: None,
        }
    }
}

/// Loads the model artifact and serves predictions from it
#[derive(Debug)]
pub struct ModelArtifactLoader<S = ConfiguredSource> {
    config: LoaderConfig,
    source: S,
    load_gate: Mutex<()>,
    state: RwLock<LoaderState>,
}

impl ModelArtifactLoader<ConfiguredSource> {
    /// Create a loader with the source the configuration selects
    pub fn from_config(config: LoaderConfig) -> SmsPredictorResult<Self> {
        let source = ConfiguredSource::from_config(&config)?;
        Self::new(config, source)
    }
}

impl<S: ArtifactSource> ModelArtifactLoader<S> {
    /// Create a loader over an explicit source
    pub fn new(config: LoaderConfig, source: S) -> SmsPredictorResult<Self> {
        config.validate()?;

        info!(
            repo_id = %config.remote_repo_id,
            artifact = %config.artifact_filename,
            source = %source.describe(),
            max_attempts = config.max_attempts,
            "Created model artifact loader"
        );

        Ok(Self {
            config,
            source,
            load_gate: Mutex::new(()),
            state: RwLock::new(LoaderState::default()),
        })
    }

    /// Loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Current phase
    pub async fn phase(&self) -> LoadPhase {
        self.state.read().await.phase
    }

    /// Whether predictions must be served by the heuristic
    pub async fn is_fallback(&self) -> bool {
        self.phase().await == LoadPhase::Fallback
    }

    /// The loaded model, if any
    pub async fn model(&self) -> Option<Arc<dyn PredictiveModel>> {
        self.state.read().await.model.clone()
    }

    /// Load the model unless it is loaded or the loader is in fallback mode
    ///
    /// Never fails: exhausting attempts is reported as
    /// [`LoadOutcome::Fallback`].
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn load(&self) -> LoadOutcome {
        if let Some(outcome) = self.settled_outcome().await {
            return outcome;
        }

        let _gate = self.load_gate.lock().await;

        // Another caller may have finished a cycle while this one waited.
        if let Some(outcome) = self.settled_outcome().await {
            debug!("Load already settled by a concurrent caller");
            return outcome;
        }

        self.run_cycles().await
    }

    /// Drop the model and reset to the unloaded state
    ///
    /// Waits for an in-flight load cycle to finish first.
    pub async fn unload(&self) {
        let _gate = self.load_gate.lock().await;
        let mut state = self.state.write().await;
        let previous = state.phase;
        *state = LoaderState::default();
        info!(previous = %previous, "Model unloaded");
    }

    /// Serve predictions from an already built model
    ///
    /// Replaces whatever the loader held, including fallback mode. Waits
    /// for an in-flight load cycle to finish first.
    pub async fn install(&self, model: Arc<dyn PredictiveModel>) {
        let _gate = self.load_gate.lock().await;
        let kind = model.kind();
        let mut state = self.state.write().await;
        *state = LoaderState {
            phase: LoadPhase::Loaded,
            model: Some(model),
            last_load_time: Some(Utc::now()),
            ..LoaderState::default()
        };
        info!(model_kind = %kind, "Model installed");
    }

    /// Unload and delete the cached artifact
    ///
    /// A local artifact override is never deleted.
    pub async fn clear_cache(&self) -> SmsPredictorResult<()> {
        self.unload().await;

        if self.config.uses_local_artifact() {
            return Ok(());
        }

        let path = self.config.artifact_path();
        for candidate in [partial_path(&path), path] {
            match fs::remove_file(&candidate).await {
                Ok(()) => info!(path = %candidate.display(), "Removed cached artifact"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(SmsPredictorError::io(format!(
                        "Failed to remove {}: {e}",
                        candidate.display()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Predict raw outputs with the loaded model
    pub async fn predict(&self, batch: &[String]) -> SmsPredictorResult<Vec<RawPrediction>> {
        let model = self.require_model().await?;
        model.predict(batch)
    }

    /// Class probabilities from the loaded model
    pub async fn predict_proba(
        &self,
        batch: &[String],
    ) -> SmsPredictorResult<Vec<ClassProbabilities>> {
        let model = self.require_model().await?;
        model.predict_proba(batch)
    }

    /// Snapshot of the loader state
    pub async fn status(&self) -> ModelStatus {
        let state = self.state.read().await;
        ModelStatus {
            phase: state.phase,
            is_loaded: state.phase == LoadPhase::Loaded,
            fallback_mode: state.phase == LoadPhase::Fallback,
            load_attempts: state.load_attempts,
            max_attempts: self.config.max_attempts,
            last_error: state.last_error.clone(),
            last_load_time: state.last_load_time,
            last_load_duration_ms: state
                .last_load_duration
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            model_kind: state.model.as_ref().map(|m| m.kind()),
            supports_proba: state.model.as_ref().is_some_and(|m| m.supports_proba()),
            artifact_size_bytes: state.artifact_size_bytes,
            artifact: ArtifactIdentity {
                repo_id: self.config.remote_repo_id.clone(),
                filename: self.config.artifact_filename.clone(),
                path: self.config.artifact_path(),
            },
        }
    }

    async fn require_model(&self) -> SmsPredictorResult<Arc<dyn PredictiveModel>> {
        self.model()
            .await
            .ok_or_else(|| SmsPredictorError::classification("no model is loaded"))
    }

    async fn settled_outcome(&self) -> Option<LoadOutcome> {
        let state = self.state.read().await;
        match state.phase {
            LoadPhase::Loaded => Some(LoadOutcome::AlreadyLoaded),
            LoadPhase::Fallback => Some(LoadOutcome::Fallback {
                attempts: state.load_attempts,
                last_error: state.last_error.clone(),
            }),
            _ => None,
        }
    }

    async fn enter(&self, phase: LoadPhase) {
        self.state.write().await.phase = phase;
        debug!(phase = %phase, "Loader phase changed");
    }

    async fn run_cycles(&self) -> LoadOutcome {
        let cycle_id = Uuid::new_v4();
        let started = Instant::now();

        loop {
            let attempt = {
                let mut state = self.state.write().await;
                state.load_attempts += 1;
                state.load_attempts
            };

            info!(
                cycle_id = %cycle_id,
                attempt,
                max_attempts = self.config.max_attempts,
                "Starting model load attempt"
            );

            match self.attempt(cycle_id).await {
                Ok((model, size)) => {
                    let elapsed = started.elapsed();
                    let kind = model.kind();
                    let mut state = self.state.write().await;
                    state.phase = LoadPhase::Loaded;
                    state.model = Some(model);
                    state.load_attempts = 0;
                    state.last_error = None;
                    state.last_load_time = Some(Utc::now());
                    state.last_load_duration = Some(elapsed);
                    state.artifact_size_bytes = Some(size);

                    info!(
                        cycle_id = %cycle_id,
                        attempt,
                        model_kind = %kind,
                        size_mb = size / (1024 * 1024),
                        elapsed_ms = elapsed.as_millis(),
                        "Model loaded"
                    );
                    return LoadOutcome::loaded(attempt, elapsed);
                }
                Err(failure) => {
                    let message = failure.to_string();
                    let terminal =
                        !failure.is_cycle_retryable() || attempt >= self.config.max_attempts;

                    {
                        let mut state = self.state.write().await;
                        state.last_error = Some(message.clone());
                        state.phase = if terminal {
                            LoadPhase::Fallback
                        } else {
                            LoadPhase::Failed(attempt)
                        };
                    }

                    if terminal {
                        error!(
                            cycle_id = %cycle_id,
                            attempt,
                            error = %failure,
                            "Model load failed, switching to heuristic fallback"
                        );
                        return LoadOutcome::Fallback {
                            attempts: attempt,
                            last_error: Some(message),
                        };
                    }

                    warn!(
                        cycle_id = %cycle_id,
                        attempt,
                        error = %failure,
                        retry_in_seconds = self.config.retry_delay_seconds,
                        "Model load attempt failed, retrying"
                    );
                    tokio::time::sleep(self.config.retry_delay()).await;
                }
            }
        }
    }

    async fn attempt(&self, cycle_id: Uuid) -> SmsPredictorResult<(Arc<dyn PredictiveModel>, u64)> {
        let path = self.config.artifact_path();

        self.enter(LoadPhase::Downloading).await;
        if self.has_valid_cached_artifact(&path).await {
            info!(path = %path.display(), "Using cached artifact");
        } else {
            let context = ErrorContext::new()
                .with_cycle_id(cycle_id.to_string())
                .with_operation("artifact_download");
            self.source
                .fetch(&path)
                .await
                .map_err(|e| e.into_download(&context))?;
        }

        self.enter(LoadPhase::Verifying).await;
        let size = self.verify(&path).await?;

        self.enter(LoadPhase::Deserializing).await;
        let bytes = fs::read(&path).await.map_err(|e| {
            SmsPredictorError::deserialization(format!("Failed to read {}: {e}", path.display()))
        })?;
        let decoded = tokio::task::spawn_blocking(move || deserialize_artifact(&bytes))
            .await
            .map_err(|e| SmsPredictorError::internal(format!("Deserialization task failed: {e}")))?;
        let document = match decoded {
            Ok(document) => document,
            Err(failure) => {
                self.discard(&path).await;
                return Err(failure);
            }
        };
        debug!(strategy = %document.strategy, "Artifact decoded");

        self.enter(LoadPhase::Validating).await;
        let model = resolve_model(&document)?;
        model
            .predict(&[PROBE_TEXT.to_string()])
            .map_err(|e| SmsPredictorError::capability(format!("probe prediction failed: {e}")))?;

        Ok((model, size))
    }

    async fn has_valid_cached_artifact(&self, path: &Path) -> bool {
        if self.config.uses_local_artifact() {
            return false;
        }

        fs::metadata(path)
            .await
            .is_ok_and(|meta| meta.is_file() && meta.len() >= self.config.min_valid_size_bytes)
    }

    async fn verify(&self, path: &Path) -> SmsPredictorResult<u64> {
        let size = fs::metadata(path)
            .await
            .map_err(|e| {
                SmsPredictorError::integrity(format!(
                    "artifact {} is missing after download: {e}",
                    path.display()
                ))
            })?
            .len();

        if size < self.config.min_valid_size_bytes {
            self.discard(path).await;
            return Err(SmsPredictorError::integrity(format!(
                "artifact is {size} bytes, expected at least {}",
                self.config.min_valid_size_bytes
            )));
        }

        debug!(size, "Artifact passed size verification");
        Ok(size)
    }

    /// Remove a cached artifact so the next attempt fetches it again
    async fn discard(&self, path: &Path) {
        if self.config.uses_local_artifact() {
            return;
        }

        if let Err(e) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove rejected artifact");
        } else {
            info!(path = %path.display(), "Removed rejected artifact");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::types::ModelKind;

    /// Source that replays a fixed script of results
    #[derive(Debug, Default)]
    struct ScriptedSource {
        script: std::sync::Mutex<VecDeque<SmsPredictorResult<Vec<u8>>>>,
        calls: AtomicUsize,
        fetched_at: std::sync::Mutex<Vec<tokio::time::Instant>>,
        delay: Duration,
    }

    impl ScriptedSource {
        fn new(script: Vec<SmsPredictorResult<Vec<u8>>>) -> Self {
            Self {
                script: std::sync::Mutex::new(script.into()),
                ..Self::default()
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn fetched_at(&self) -> Vec<tokio::time::Instant> {
            self.fetched_at.lock().unwrap().clone()
        }
    }

    impl ArtifactSource for ScriptedSource {
        async fn fetch(&self, destination: &Path) -> SmsPredictorResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.fetched_at.lock().unwrap().push(tokio::time::Instant::now());
            let next = self.script.lock().unwrap().pop_front();
            tokio::time::sleep(self.delay).await;

            let bytes = next.unwrap_or_else(|| Err(SmsPredictorError::download("script exhausted")))?;
            fs::create_dir_all(destination.parent().unwrap()).await?;
            fs::write(destination, &bytes).await?;
            Ok(bytes.len() as u64)
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn linear_artifact() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "format_version": "1.0.0",
            "type": "linear_text",
            "bias": -1.0,
            "weights": {"prize": 3.0, "otp": 3.0}
        }))
        .unwrap()
    }

    fn test_config(cache: &TempDir) -> LoaderConfig {
        LoaderConfig::new("owner/model", "model.json")
            .with_cache_dir(cache.path())
            .with_retry_delay_seconds(0)
            .with_min_valid_size_bytes(16)
    }

    #[tokio::test]
    async fn loads_on_first_attempt() {
        let cache = TempDir::new().unwrap();
        let loader =
            ModelArtifactLoader::new(test_config(&cache), ScriptedSource::new(vec![Ok(linear_artifact())]))
                .unwrap();

        let outcome = loader.load().await;
        assert!(matches!(outcome, LoadOutcome::Loaded { attempts: 1, .. }));

        let status = loader.status().await;
        assert!(status.is_loaded);
        assert!(!status.fallback_mode);
        assert_eq!(status.load_attempts, 0);
        assert_eq!(status.model_kind, Some(ModelKind::Direct));
        assert!(status.supports_proba);
        assert!(status.last_load_time.is_some());

        let predictions = loader.predict(&["your otp code".to_string()]).await.unwrap();
        assert_eq!(predictions, vec![RawPrediction::ClassId(1)]);
    }

    #[tokio::test]
    async fn third_attempt_follows_two_download_failures() {
        let cache = TempDir::new().unwrap();
        let source = ScriptedSource::new(vec![
            Err(SmsPredictorError::download("connection reset")),
            Err(SmsPredictorError::download("connection reset")),
            Ok(linear_artifact()),
        ]);
        let loader = ModelArtifactLoader::new(test_config(&cache), source).unwrap();

        let outcome = loader.load().await;
        assert!(matches!(outcome, LoadOutcome::Loaded { attempts: 3, .. }));
        assert_eq!(loader.source.calls(), 3);
        assert_eq!(loader.status().await.load_attempts, 0);
    }

    #[tokio::test]
    async fn exhausted_attempts_enter_fallback() {
        let cache = TempDir::new().unwrap();
        let source = ScriptedSource::new(vec![
            Err(SmsPredictorError::download("down")),
            Err(SmsPredictorError::download("down")),
            Err(SmsPredictorError::download("still down")),
        ]);
        let loader = ModelArtifactLoader::new(test_config(&cache), source).unwrap();

        let outcome = loader.load().await;
        assert!(matches!(outcome, LoadOutcome::Fallback { attempts: 3, .. }));

        let status = loader.status().await;
        assert_eq!(status.phase, LoadPhase::Fallback);
        assert!(status.fallback_mode);
        assert_eq!(status.load_attempts, 3);
        assert!(status.last_error.unwrap().contains("still down"));

        // Fallback is stable: no further downloads
        let again = loader.load().await;
        assert!(matches!(again, LoadOutcome::Fallback { attempts: 3, .. }));
        assert_eq!(loader.source.calls(), 3);
        assert!(loader.predict(&["hi".to_string()]).await.is_err());
    }

    #[tokio::test]
    async fn capability_error_skips_remaining_attempts() {
        let cache = TempDir::new().unwrap();
        let unusable = serde_json::to_vec(&json!({"type": "random_forest", "trees": []})).unwrap();
        let source = ScriptedSource::new(vec![Ok(unusable), Ok(linear_artifact())]);
        let loader = ModelArtifactLoader::new(test_config(&cache), source).unwrap();

        let outcome = loader.load().await;
        assert!(matches!(outcome, LoadOutcome::Fallback { attempts: 1, .. }));
        assert_eq!(loader.source.calls(), 1);
    }

    #[tokio::test]
    async fn undersized_artifact_is_removed() {
        let cache = TempDir::new().unwrap();
        let config = test_config(&cache).with_max_attempts(1);
        let path = config.artifact_path();
        let loader =
            ModelArtifactLoader::new(config, ScriptedSource::new(vec![Ok(b"tiny".to_vec())])).unwrap();

        let outcome = loader.load().await;
        assert!(matches!(outcome, LoadOutcome::Fallback { attempts: 1, .. }));
        assert!(!path.exists());
        assert!(loader.status().await.last_error.unwrap().contains("Integrity"));
    }

    #[tokio::test]
    async fn undecodable_artifact_is_refetched() {
        let cache = TempDir::new().unwrap();
        let source = ScriptedSource::new(vec![
            Ok(b"this is not a model artifact at all".to_vec()),
            Ok(linear_artifact()),
        ]);
        let loader = ModelArtifactLoader::new(test_config(&cache), source).unwrap();

        let outcome = loader.load().await;
        assert!(matches!(outcome, LoadOutcome::Loaded { attempts: 2, .. }));
        assert_eq!(loader.source.calls(), 2);
    }

    #[tokio::test]
    async fn valid_cache_skips_download() {
        let cache = TempDir::new().unwrap();
        let config = test_config(&cache);
        let path = config.artifact_path();
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, linear_artifact()).await.unwrap();

        let loader = ModelArtifactLoader::new(config, ScriptedSource::default()).unwrap();
        assert!(loader.load().await.is_loaded());
        assert_eq!(loader.source.calls(), 0);
    }

    #[tokio::test]
    async fn unload_resets_attempts() {
        let cache = TempDir::new().unwrap();
        let config = test_config(&cache).with_max_attempts(1);
        let source = ScriptedSource::new(vec![
            Err(SmsPredictorError::download("down")),
            Ok(linear_artifact()),
        ]);
        let loader = ModelArtifactLoader::new(config, source).unwrap();

        assert!(!loader.load().await.is_loaded());
        assert!(loader.is_fallback().await);

        loader.unload().await;
        let status = loader.status().await;
        assert_eq!(status.phase, LoadPhase::Unloaded);
        assert_eq!(status.load_attempts, 0);
        assert!(status.last_error.is_none());

        assert!(loader.load().await.is_loaded());
        assert_eq!(loader.load().await, LoadOutcome::AlreadyLoaded);
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_cycle() {
        let cache = TempDir::new().unwrap();
        let source = ScriptedSource::new(vec![Ok(linear_artifact())])
            .with_delay(Duration::from_millis(50));
        let loader = Arc::new(ModelArtifactLoader::new(test_config(&cache), source).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let loader = Arc::clone(&loader);
                tokio::spawn(async move { loader.load().await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_loaded());
        }
        assert_eq!(loader.source.calls(), 1);
    }

    #[tokio::test]
    async fn wrapped_artifact_reports_kind() {
        let cache = TempDir::new().unwrap();
        let wrapped = serde_json::to_vec(&json!({
            "format_version": "1.1.0",
            "classifier": {"type": "keyword_score", "keywords": {"otp": 0.9}},
            "model_info": {"name": "keywords"}
        }))
        .unwrap();
        let loader =
            ModelArtifactLoader::new(test_config(&cache), ScriptedSource::new(vec![Ok(wrapped)]))
                .unwrap();

        assert!(loader.load().await.is_loaded());
        let status = loader.status().await;
        assert_eq!(status.model_kind, Some(ModelKind::DictWrapped));
        assert!(!status.supports_proba);
        assert!(loader.predict_proba(&["otp".to_string()]).await.is_err());
    }

    #[tokio::test]
    async fn installed_model_leaves_fallback() {
        let cache = TempDir::new().unwrap();
        let config = test_config(&cache).with_max_attempts(1);
        let source = ScriptedSource::new(vec![Err(SmsPredictorError::download("down"))]);
        let loader = ModelArtifactLoader::new(config, source).unwrap();
        assert!(!loader.load().await.is_loaded());

        let document = deserialize_artifact(&linear_artifact()).unwrap();
        loader.install(resolve_model(&document).unwrap()).await;

        let status = loader.status().await;
        assert!(status.is_loaded);
        assert!(!status.fallback_mode);
        assert_eq!(status.load_attempts, 0);
        assert_eq!(loader.load().await, LoadOutcome::AlreadyLoaded);
        assert_eq!(loader.source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_retry_delay_between_attempts() {
        let cache = TempDir::new().unwrap();
        let config = test_config(&cache).with_retry_delay_seconds(10);
        let delay = config.retry_delay();
        let source = ScriptedSource::new(vec![
            Err(SmsPredictorError::download("connection reset")),
            Err(SmsPredictorError::download("connection reset")),
            Ok(linear_artifact()),
        ]);
        let loader = ModelArtifactLoader::new(config, source).unwrap();

        let started = tokio::time::Instant::now();
        let outcome = loader.load().await;

        assert!(matches!(outcome, LoadOutcome::Loaded { attempts: 3, .. }));
        let fetches = loader.source.fetched_at();
        assert_eq!(fetches.len(), 3);
        assert!(fetches[1] - fetches[0] >= delay);
        assert!(fetches[2] - fetches[1] >= delay);
        assert!(started.elapsed() >= delay * 2);
    }

    #[tokio::test]
    async fn clear_cache_removes_artifact() {
        let cache = TempDir::new().unwrap();
        let config = test_config(&cache);
        let path = config.artifact_path();
        let loader =
            ModelArtifactLoader::new(config, ScriptedSource::new(vec![Ok(linear_artifact())]))
                .unwrap();

        assert!(loader.load().await.is_loaded());
        assert!(path.exists());

        loader.clear_cache().await.unwrap();
        assert!(!path.exists());
        assert_eq!(loader.phase().await, LoadPhase::Unloaded);
    }

    #[tokio::test]
    async fn local_override_is_never_deleted() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("local.json");
        fs::write(&local, b"{\"not\": \"a model\", \"padding\": \"................\"}")
            .await
            .unwrap();
        let config = test_config(&dir)
            .with_local_artifact_path(&local)
            .with_max_attempts(1);

        let loader = ModelArtifactLoader::from_config(config).unwrap();
        assert!(!loader.load().await.is_loaded());
        assert!(local.exists());

        loader.clear_cache().await.unwrap();
        assert!(local.exists());
    }
}
