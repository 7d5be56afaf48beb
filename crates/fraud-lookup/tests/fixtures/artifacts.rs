// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(dead_code)]

//! Artifact fixtures served by the mock artifact host

use std::path::Path;

use fraud_lookup::LookupConfig;
use serde_json::json;

/// Repository the fixtures are published under
pub const REPO_ID: &str = "acme/sms-fraud";

/// Artifact file name within the repository
pub const ARTIFACT_FILENAME: &str = "sms_classifier.json";

/// Request path of the artifact on the mock host
pub const ARTIFACT_PATH: &str = "/acme/sms-fraud/resolve/main/sms_classifier.json";

/// Linear model flagging OTP and prize messages
pub fn linear_artifact() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "format_version": "1.0.0",
        "type": "linear_text",
        "bias": -2.0,
        "max_ngram": 2,
        "weights": {
            "otp": 5.0,
            "prize": 4.0,
            "trúng thưởng": 5.0,
            "meeting": -3.0
        }
    }))
    .expect("Fixture artifact serializes")
}

/// Linear model wrapped under a `model` key with metadata
pub fn wrapped_artifact() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "format_version": "1.0.0",
        "model": {
            "type": "linear_text",
            "bias": -2.0,
            "weights": {"otp": 5.0}
        },
        "model_info": {"name": "sms-fraud", "version": "2024.1"}
    }))
    .expect("Fixture artifact serializes")
}

/// Artifact whose format major version is not understood
pub fn future_format_artifact() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "format_version": "2.0.0",
        "type": "linear_text",
        "weights": {"otp": 5.0}
    }))
    .expect("Fixture artifact serializes")
}

/// Configuration fetching from `endpoint` into `cache_dir`
pub fn remote_config(endpoint: &str, cache_dir: &Path, max_attempts: u32) -> LookupConfig {
    let mut config = LookupConfig::for_testing();
    config.loader.remote_repo_id = REPO_ID.to_string();
    config.loader.artifact_filename = ARTIFACT_FILENAME.to_string();
    config.loader.endpoint = endpoint.parse().expect("Mock server URI is a valid URL");
    config.loader.cache_dir = cache_dir.to_path_buf();
    config.loader.max_attempts = max_attempts;
    config.loader.min_valid_size_bytes = 32;
    config
}
