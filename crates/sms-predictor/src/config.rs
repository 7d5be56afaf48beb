// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the model loader and the SMS classifier
//!
//! Both structs deserialize with defaults for every field, so a service can
//! layer partial configuration on top of them.

use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::{SmsPredictorError, SmsPredictorResult};

/// Default model repository on the artifact host
pub const DEFAULT_REPO_ID: &str = "hoangson2006/vietnamese-fraud-detection";
/// Default artifact file name within the repository
pub const DEFAULT_ARTIFACT_FILENAME: &str = "sms_classifier.json";
/// Default artifact host
pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co";
/// Default repository revision
pub const DEFAULT_REVISION: &str = "main";
/// Default number of load cycles before falling back
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default pause between load cycles
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 10;
/// Default minimum size of a complete artifact (100 MiB)
pub const DEFAULT_MIN_VALID_SIZE_BYTES: u64 = 100 * 1024 * 1024;
/// Default per-request timeout for artifact downloads
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 300;
/// Default transient-failure retries within one download
pub const DEFAULT_DOWNLOAD_RETRIES: usize = 3;
/// Confidence reported when the model cannot produce probabilities
pub const DEFAULT_CONFIDENCE: f64 = 0.85;

const MAX_ATTEMPTS_LIMIT: u32 = 20;
const MAX_RETRY_DELAY_SECONDS: u64 = 600;
const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 3600;

/// Settings for fetching, verifying and loading the model artifact
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Repository identifier on the artifact host
    pub remote_repo_id: String,
    /// Artifact file name within the repository
    pub artifact_filename: String,
    /// Repository revision (branch, tag or commit)
    pub revision: String,
    /// Base URL of the artifact host
    pub endpoint: Url,
    /// Local cache directory for downloaded artifacts
    pub cache_dir: PathBuf,
    /// Bearer token for private repositories
    pub auth_token: Option<String>,
    /// Load cycles before entering fallback mode
    pub max_attempts: u32,
    /// Fixed pause between load cycles
    pub retry_delay_seconds: u64,
    /// Smallest artifact size accepted as complete
    pub min_valid_size_bytes: u64,
    /// Timeout for a single download request
    pub request_timeout_seconds: u64,
    /// Transient-failure retries within one download
    pub download_retries: usize,
    /// Load from this file instead of the artifact host
    pub local_artifact_path: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            remote_repo_id: DEFAULT_REPO_ID.to_string(),
            artifact_filename: DEFAULT_ARTIFACT_FILENAME.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            endpoint: default_endpoint(),
            cache_dir: std::env::temp_dir().join("fraud_model_cache"),
            auth_token: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_seconds: DEFAULT_RETRY_DELAY_SECONDS,
            min_valid_size_bytes: DEFAULT_MIN_VALID_SIZE_BYTES,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            download_retries: DEFAULT_DOWNLOAD_RETRIES,
            local_artifact_path: None,
        }
    }
}

impl fmt::Debug for LoaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderConfig")
            .field("remote_repo_id", &self.remote_repo_id)
            .field("artifact_filename", &self.artifact_filename)
            .field("revision", &self.revision)
            .field("endpoint", &self.endpoint.as_str())
            .field("cache_dir", &self.cache_dir)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("max_attempts", &self.max_attempts)
            .field("retry_delay_seconds", &self.retry_delay_seconds)
            .field("min_valid_size_bytes", &self.min_valid_size_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("download_retries", &self.download_retries)
            .field("local_artifact_path", &self.local_artifact_path)
            .finish()
    }
}

fn default_endpoint() -> Url {
    // Constant input, parsing cannot fail.
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}

impl LoaderConfig {
    /// Create a loader configuration for a repository artifact
    pub fn new(remote_repo_id: impl Into<String>, artifact_filename: impl Into<String>) -> Self {
        Self {
            remote_repo_id: remote_repo_id.into(),
            artifact_filename: artifact_filename.into(),
            ..Self::default()
        }
    }

    /// Set the cache directory
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Set the bearer token
    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    /// Set the artifact host
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Set the number of load cycles before fallback
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the pause between load cycles
    pub fn with_retry_delay_seconds(mut self, retry_delay_seconds: u64) -> Self {
        self.retry_delay_seconds = retry_delay_seconds;
        self
    }

    /// Set the minimum accepted artifact size
    pub fn with_min_valid_size_bytes(mut self, min_valid_size_bytes: u64) -> Self {
        self.min_valid_size_bytes = min_valid_size_bytes;
        self
    }

    /// Set the transient-failure retries within one download
    pub fn with_download_retries(mut self, download_retries: usize) -> Self {
        self.download_retries = download_retries;
        self
    }

    /// Load from a local file instead of the artifact host
    pub fn with_local_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_artifact_path = Some(path.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SmsPredictorResult<()> {
        let repo_parts: Vec<_> = self.remote_repo_id.split('/').collect();
        if repo_parts.len() != 2 || repo_parts.iter().any(|part| part.trim().is_empty()) {
            return Err(SmsPredictorError::config(format!(
                "Invalid remote_repo_id '{}' (expected 'owner/name')",
                self.remote_repo_id
            )));
        }

        if self.artifact_filename.is_empty()
            || self.artifact_filename.contains(['/', '\\'])
            || self.artifact_filename == ".."
        {
            return Err(SmsPredictorError::config(format!(
                "Invalid artifact_filename '{}'",
                self.artifact_filename
            )));
        }

        if self.revision.trim().is_empty() {
            return Err(SmsPredictorError::config("Revision cannot be empty"));
        }

        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(SmsPredictorError::config(format!(
                "Unsupported endpoint scheme '{}'",
                self.endpoint.scheme()
            )));
        }

        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(SmsPredictorError::config(format!(
                "Invalid max_attempts: {} (must be 1-{MAX_ATTEMPTS_LIMIT})",
                self.max_attempts
            )));
        }

        if self.retry_delay_seconds > MAX_RETRY_DELAY_SECONDS {
            return Err(SmsPredictorError::config(format!(
                "Invalid retry_delay_seconds: {} (must be 0-{MAX_RETRY_DELAY_SECONDS})",
                self.retry_delay_seconds
            )));
        }

        if self.request_timeout_seconds == 0
            || self.request_timeout_seconds > MAX_REQUEST_TIMEOUT_SECONDS
        {
            return Err(SmsPredictorError::config(format!(
                "Invalid request_timeout_seconds: {} (must be 1-{MAX_REQUEST_TIMEOUT_SECONDS})",
                self.request_timeout_seconds
            )));
        }

        if self.min_valid_size_bytes == 0 {
            warn!("min_valid_size_bytes is 0, truncated artifacts will not be detected");
        }

        Ok(())
    }

    /// Pause between load cycles
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    /// Timeout for a single download request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Where the artifact lives on disk
    ///
    /// The repository identifier is part of the path so different artifacts
    /// never share a cache slot. A local override is used as is.
    pub fn artifact_path(&self) -> PathBuf {
        if let Some(path) = &self.local_artifact_path {
            return path.clone();
        }

        self.cache_dir
            .join(self.remote_repo_id.replace('/', "--"))
            .join(&self.artifact_filename)
    }

    /// Remote URL of the artifact
    pub fn artifact_url(&self) -> SmsPredictorResult<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let url = format!(
            "{base}/{}/resolve/{}/{}",
            self.remote_repo_id, self.revision, self.artifact_filename
        );
        Url::parse(&url)
            .map_err(|e| SmsPredictorError::config(format!("Invalid artifact URL '{url}': {e}")))
    }

    /// Whether the artifact is served from a local file
    pub fn uses_local_artifact(&self) -> bool {
        self.local_artifact_path.is_some()
    }
}

/// Path of the in-progress download for an artifact
pub fn partial_path(artifact_path: &Path) -> PathBuf {
    let mut name = artifact_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    artifact_path.with_file_name(name)
}

/// Settings for the SMS classifier front
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Trigger a model load on the first prediction
    pub lazy_load: bool,
    /// Confidence reported when the model has no probabilities
    pub default_confidence: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            lazy_load: true,
            default_confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl ClassifierConfig {
    /// Enable or disable loading on first prediction
    pub fn with_lazy_load(mut self, lazy_load: bool) -> Self {
        self.lazy_load = lazy_load;
        self
    }

    /// Set the confidence reported without probabilities
    pub fn with_default_confidence(mut self, default_confidence: f64) -> Self {
        self.default_confidence = default_confidence;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SmsPredictorResult<()> {
        if !(0.0..=1.0).contains(&self.default_confidence) {
            return Err(SmsPredictorError::config(format!(
                "Invalid default_confidence: {} (must be 0.0-1.0)",
                self.default_confidence
            )));
        }
        Ok(())
    }
}
