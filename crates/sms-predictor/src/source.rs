// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Artifact sources
//!
//! A source puts the artifact bytes at a destination path. The HTTP source
//! streams from the artifact host with resume and transient-failure
//! retries; the local source serves a file that is already on disk.

use std::{
    fmt,
    future::Future,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::{
    Client, ClientBuilder, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue, RANGE},
};
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
};
use tokio_retry::{
    RetryIf,
    strategy::{ExponentialBackoff, jitter},
};
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::{
    config::{LoaderConfig, partial_path},
    error::{ErrorContext, SmsPredictorError, SmsPredictorResult},
};

const MIB: u64 = 1024 * 1024;

/// Bytes between download progress log lines
const PROGRESS_STEP: u64 = 10 * MIB;

/// Something that can place the model artifact on local disk
pub trait ArtifactSource: Send + Sync {
    /// Fetch the artifact to `destination`, returning the bytes written
    fn fetch(&self, destination: &Path) -> impl Future<Output = SmsPredictorResult<u64>> + Send;

    /// Human-readable origin for logs and status
    fn describe(&self) -> String;
}

/// Streams the artifact from an HTTP artifact host
#[derive(Clone)]
pub struct HttpArtifactSource {
    client: Client,
    url: Url,
    timeout_seconds: u64,
    retries: usize,
}

impl fmt::Debug for HttpArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpArtifactSource")
            .field("url", &self.url.as_str())
            .field("timeout_seconds", &self.timeout_seconds)
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}

impl HttpArtifactSource {
    /// Create a source for the artifact described by the configuration
    pub fn new(config: &LoaderConfig) -> SmsPredictorResult<Self> {
        let url = config.artifact_url()?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| SmsPredictorError::config(format!("Invalid auth token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = ClientBuilder::new()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .user_agent(concat!("sms-predictor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SmsPredictorError::http(format!("Failed to create HTTP client: {e}")))?;

        info!(
            url = %url,
            authenticated = config.auth_token.is_some(),
            "Created artifact download client"
        );

        Ok(Self {
            client,
            url,
            timeout_seconds: config.request_timeout_seconds,
            retries: config.download_retries,
        })
    }

    /// Remote URL of the artifact
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Determine if an HTTP status code should trigger a retry
    fn should_retry_status(status: StatusCode) -> bool {
        matches!(
            status.as_u16(),
            408 |          // Request timeout
            429 |          // Rate limit
            500..=599 // Server errors
        )
    }

    fn status_error(status: StatusCode, context: &ErrorContext) -> SmsPredictorError {
        let message = format!("HTTP {} fetching artifact", status.as_u16());
        match status.as_u16() {
            401 | 403 => SmsPredictorError::authentication(message),
            404 => SmsPredictorError::not_found(message),
            500..=599 => SmsPredictorError::service_unavailable_with_context(message, context),
            _ if Self::should_retry_status(status) => {
                SmsPredictorError::http_with_context(message, context)
            }
            _ => SmsPredictorError::download(message),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> SmsPredictorError {
        if err.is_timeout() {
            SmsPredictorError::timeout(self.timeout_seconds)
        } else {
            err.into()
        }
    }

    async fn fetch_once(&self, destination: &Path, download_id: Uuid) -> SmsPredictorResult<u64> {
        let part = partial_path(destination);
        let resume_from = fs::metadata(&part).await.map(|m| m.len()).unwrap_or(0);

        let context = ErrorContext::new()
            .with_cycle_id(download_id.to_string())
            .with_operation("artifact_download")
            .with_metadata("url", self.url.as_str());

        let mut request = self.client.get(self.url.clone());
        if resume_from > 0 {
            debug!(resume_from, "Resuming partial download");
            request = request.header(RANGE, format!("bytes={resume_from}-"));
        }

        let mut response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if status == StatusCode::RANGE_NOT_SATISFIABLE {
            warn!(resume_from, "Server rejected resume range, discarding partial download");
            if let Err(e) = fs::remove_file(&part).await {
                warn!(path = %part.display(), error = %e, "Failed to remove partial download");
            }
            return Err(SmsPredictorError::http_with_context(
                "HTTP 416 resuming artifact download",
                &context,
            ));
        }

        if !status.is_success() {
            let error = Self::status_error(status, &context);
            warn!(status = status.as_u16(), error = %error, "Artifact request failed");
            return Err(error);
        }

        let resumed = resume_from > 0 && status == StatusCode::PARTIAL_CONTENT;
        let mut file = if resumed {
            OpenOptions::new().append(true).open(&part).await?
        } else {
            File::create(&part).await?
        };

        let mut written = if resumed { resume_from } else { 0 };
        let total = response.content_length().map(|len| len + written);
        let mut next_report = (written / PROGRESS_STEP + 1) * PROGRESS_STEP;

        info!(
            download_id = %download_id,
            total_bytes = ?total,
            resumed,
            "Downloading artifact"
        );

        while let Some(chunk) = response.chunk().await.map_err(|e| self.transport_error(e))? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;

            if written >= next_report {
                info!(
                    download_id = %download_id,
                    downloaded_mb = written / MIB,
                    total_mb = ?total.map(|t| t / MIB),
                    "Download progress"
                );
                next_report = (written / PROGRESS_STEP + 1) * PROGRESS_STEP;
            }
        }

        file.flush().await?;
        drop(file);
        fs::rename(&part, destination).await?;

        info!(download_id = %download_id, bytes = written, "Artifact download complete");
        Ok(written)
    }
}

impl ArtifactSource for HttpArtifactSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self, destination: &Path) -> SmsPredictorResult<u64> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                SmsPredictorError::io(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let download_id = Uuid::new_v4();
        // 500ms, 1s, 2s, ... capped at 10s
        let retry_strategy = ExponentialBackoff::from_millis(2)
            .factor(250)
            .max_delay(Duration::from_secs(10))
            .take(self.retries)
            .map(jitter);

        RetryIf::spawn(
            retry_strategy,
            || self.fetch_once(destination, download_id),
            |error: &SmsPredictorError| {
                let retry = error.is_retryable();
                if retry {
                    warn!(download_id = %download_id, error = %error, "Transient download failure, will retry");
                }
                retry
            },
        )
        .await
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Serves an artifact that is already on local disk
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    /// Create a source for a local file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactSource for LocalFileSource {
    async fn fetch(&self, destination: &Path) -> SmsPredictorResult<u64> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(SmsPredictorError::download(format!(
                "local artifact {} does not exist",
                self.path.display()
            )));
        }

        if self.path == destination {
            return Ok(fs::metadata(&self.path).await?.len());
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(fs::copy(&self.path, destination).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Source chosen from configuration
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    /// Artifact host download
    Http(HttpArtifactSource),
    /// Local file override
    Local(LocalFileSource),
}

impl ConfiguredSource {
    /// Pick the local override when set, the artifact host otherwise
    pub fn from_config(config: &LoaderConfig) -> SmsPredictorResult<Self> {
        match &config.local_artifact_path {
            Some(path) => Ok(Self::Local(LocalFileSource::new(path))),
            None => Ok(Self::Http(HttpArtifactSource::new(config)?)),
        }
    }
}

impl ArtifactSource for ConfiguredSource {
    async fn fetch(&self, destination: &Path) -> SmsPredictorResult<u64> {
        match self {
            Self::Http(source) => source.fetch(destination).await,
            Self::Local(source) => source.fetch(destination).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Http(source) => source.describe(),
            Self::Local(source) => source.describe(),
        }
    }
}
