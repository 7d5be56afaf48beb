// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Artifact decoding and capability resolution
//!
//! An artifact is a versioned JSON or YAML document. Decoding tries JSON
//! first and YAML second. Resolution then looks for a prediction
//! capability in this order: a direct model, a model wrapped under a known
//! key, a bare scoring function.

use std::{fmt, sync::Arc};

use semver::Version;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    definition::{KeywordScoreFunction, LinearTextModel},
    error::{SmsPredictorError, SmsPredictorResult},
    model::{ArtifactMetadata, CallableModel, DictWrappedModel, DirectModel, PredictiveModel},
};

/// Artifact format major version this crate understands
pub const SUPPORTED_FORMAT_MAJOR: u64 = 1;

/// Keys under which a mapping may hold the real model
pub const WRAPPER_KEYS: [&str; 3] = ["model", "classifier", "pipeline"];

const METADATA_KEY: &str = "model_info";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decoding strategy that produced a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeserializeStrategy {
    /// Strict JSON
    Json,
    /// YAML, which also accepts JSON with comments and trailing commas
    Yaml,
}

impl fmt::Display for DeserializeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeserializeStrategy::Json => f.write_str("json"),
            DeserializeStrategy::Yaml => f.write_str("yaml"),
        }
    }
}

/// A decoded artifact document
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactDocument {
    /// Top-level mapping
    pub root: Value,
    /// Strategy that decoded it
    pub strategy: DeserializeStrategy,
}

/// Decode artifact bytes, trying each strategy in turn
pub fn deserialize_artifact(bytes: &[u8]) -> SmsPredictorResult<ArtifactDocument> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut failures = Vec::with_capacity(2);

    match serde_json::from_slice::<Value>(bytes) {
        Ok(root) if root.is_object() => {
            return Ok(ArtifactDocument {
                root,
                strategy: DeserializeStrategy::Json,
            });
        }
        Ok(_) => failures.push("json: top level is not a mapping".to_string()),
        Err(e) => failures.push(format!("json: {e}")),
    }
    debug!(error = %failures[0], "JSON decoding failed, trying YAML");

    match serde_yaml::from_slice::<Value>(bytes) {
        Ok(root) if root.is_object() => {
            return Ok(ArtifactDocument {
                root,
                strategy: DeserializeStrategy::Yaml,
            });
        }
        Ok(_) => failures.push("yaml: top level is not a mapping".to_string()),
        Err(e) => failures.push(format!("yaml: {e}")),
    }

    Err(SmsPredictorError::deserialization(format!(
        "no strategy could decode the artifact ({})",
        failures.join("; ")
    )))
}

/// Check the document's `format_version`, if present
pub fn check_format_version(root: &Value) -> SmsPredictorResult<Option<Version>> {
    let Some(raw) = root.get("format_version") else {
        warn!("Artifact has no format_version, assuming {SUPPORTED_FORMAT_MAJOR}.x");
        return Ok(None);
    };

    let text = raw.as_str().ok_or_else(|| {
        SmsPredictorError::capability("format_version must be a semantic version string")
    })?;
    let version = Version::parse(text).map_err(|e| {
        SmsPredictorError::capability(format!("invalid format_version '{text}': {e}"))
    })?;

    if version.major != SUPPORTED_FORMAT_MAJOR {
        return Err(SmsPredictorError::capability(format!(
            "unsupported artifact format {version}, expected {SUPPORTED_FORMAT_MAJOR}.x"
        )));
    }

    Ok(Some(version))
}

enum Definition {
    LinearText(LinearTextModel),
    KeywordScore(KeywordScoreFunction),
}

fn parse_definition(value: &Value) -> SmsPredictorResult<Option<Definition>> {
    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return Ok(None);
    };

    match kind {
        "linear_text" => {
            let model: LinearTextModel = serde_json::from_value(value.clone()).map_err(|e| {
                SmsPredictorError::capability(format!("malformed linear_text model: {e}"))
            })?;
            model.validate()?;
            Ok(Some(Definition::LinearText(model)))
        }
        "keyword_score" => {
            let function: KeywordScoreFunction =
                serde_json::from_value(value.clone()).map_err(|e| {
                    SmsPredictorError::capability(format!("malformed keyword_score function: {e}"))
                })?;
            function.validate()?;
            Ok(Some(Definition::KeywordScore(function)))
        }
        other => {
            debug!(model_type = other, "Unrecognised model type");
            Ok(None)
        }
    }
}

fn wrapped_model(value: &Value) -> Option<(&'static str, &Value)> {
    WRAPPER_KEYS.iter().find_map(|key| {
        value
            .get(*key)
            .filter(|inner| inner.is_object())
            .map(|inner| (*key, inner))
    })
}

fn callable_from(function: KeywordScoreFunction) -> CallableModel {
    CallableModel::new(
        "keyword_score",
        Arc::new(move |batch: &[String]| batch.iter().map(|text| function.score(text)).collect()),
    )
}

fn resolve_value(value: &Value, allow_unwrap: bool) -> SmsPredictorResult<Box<dyn PredictiveModel>> {
    let definition = match parse_definition(value)? {
        Some(Definition::LinearText(model)) => return Ok(Box::new(DirectModel::new(model))),
        other => other,
    };

    if allow_unwrap && let Some((key, inner)) = wrapped_model(value) {
        debug!(wrapper_key = key, "Unwrapping model from mapping");
        let inner = resolve_value(inner, false).map_err(|e| {
            SmsPredictorError::capability(format!("model under '{key}' is unusable: {e}"))
        })?;
        let metadata = match value.get(METADATA_KEY) {
            Some(info) => {
                serde_json::from_value::<ArtifactMetadata>(info.clone()).unwrap_or_else(|e| {
                    warn!(error = %e, "Ignoring malformed {METADATA_KEY}");
                    ArtifactMetadata::default()
                })
            }
            None => ArtifactMetadata::default(),
        };
        return Ok(Box::new(DictWrappedModel::new(inner, key, metadata)));
    }

    if let Some(Definition::KeywordScore(function)) = definition {
        return Ok(Box::new(callable_from(function)));
    }

    Err(SmsPredictorError::capability(
        "artifact exposes no predict capability, no wrapped model and no scoring function",
    ))
}

/// Resolve a decoded document into a prediction interface
pub fn resolve_model(document: &ArtifactDocument) -> SmsPredictorResult<Arc<dyn PredictiveModel>> {
    check_format_version(&document.root)?;
    let model = resolve_value(&document.root, true)?;
    debug!(kind = %model.kind(), strategy = %document.strategy, "Resolved model capability");
    Ok(Arc::from(model))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{ModelKind, RawPrediction};

    fn document(root: Value) -> ArtifactDocument {
        ArtifactDocument {
            root,
            strategy: DeserializeStrategy::Json,
        }
    }

    fn linear_definition() -> Value {
        json!({
            "type": "linear_text",
            "bias": -1.0,
            "weights": {"prize": 3.0}
        })
    }

    #[test]
    fn json_is_tried_first() {
        let bytes = br#"{"format_version": "1.0.0", "type": "linear_text", "weights": {"a": 1.0}}"#;
        let decoded = deserialize_artifact(bytes).unwrap();
        assert_eq!(decoded.strategy, DeserializeStrategy::Json);
    }

    #[test]
    fn yaml_is_the_alternate_strategy() {
        let bytes = "\u{feff}format_version: 1.2.0\ntype: keyword_score\nkeywords:\n  free: 0.5\n";
        let decoded = deserialize_artifact(bytes.as_bytes()).unwrap();
        assert_eq!(decoded.strategy, DeserializeStrategy::Yaml);
        assert_eq!(decoded.root["type"], "keyword_score");
    }

    #[test]
    fn undecodable_bytes_fail() {
        let error = deserialize_artifact(&[0x80, 0x04, 0x95, 0xff, 0x00]).unwrap_err();
        assert!(matches!(error, SmsPredictorError::Deserialization { .. }));

        let scalar = deserialize_artifact(b"just some words").unwrap_err();
        assert!(matches!(scalar, SmsPredictorError::Deserialization { .. }));

        let truncated = deserialize_artifact(br#"{"type": "linear_te"#).unwrap_err();
        assert!(matches!(truncated, SmsPredictorError::Deserialization { .. }));
    }

    #[test]
    fn format_version_is_checked() {
        assert!(check_format_version(&json!({})).unwrap().is_none());
        assert_eq!(
            check_format_version(&json!({"format_version": "1.4.2"})).unwrap(),
            Some(Version::new(1, 4, 2))
        );
        assert!(
            check_format_version(&json!({"format_version": "2.0.0"}))
                .unwrap_err()
                .is_capability_error()
        );
        assert!(check_format_version(&json!({"format_version": 1})).is_err());
        assert!(check_format_version(&json!({"format_version": "one"})).is_err());
    }

    #[test]
    fn direct_model_resolution() {
        let model = resolve_model(&document(linear_definition())).unwrap();
        assert_eq!(model.kind(), ModelKind::Direct);
        assert_eq!(
            model.predict(&["win a prize".to_string()]).unwrap(),
            vec![RawPrediction::ClassId(1)]
        );
    }

    #[test]
    fn dict_wrapped_resolution() {
        for key in WRAPPER_KEYS {
            let root = json!({
                "format_version": "1.0.0",
                key: linear_definition(),
                "model_info": {"name": "phobert", "class_names": ["ham", "spam"]}
            });
            let model = resolve_model(&document(root)).unwrap();
            assert_eq!(model.kind(), ModelKind::DictWrapped, "key {key}");
            assert!(model.supports_proba());
        }
    }

    #[test]
    fn malformed_metadata_does_not_block_wrapped_model() {
        let root = json!({
            "format_version": "1.0.0",
            "pipeline": linear_definition(),
            "model_info": "phobert v2"
        });
        let model = resolve_model(&document(root)).unwrap();
        assert_eq!(model.kind(), ModelKind::DictWrapped);
        assert_eq!(
            model.predict(&["prize".to_string()]).unwrap(),
            vec![RawPrediction::ClassId(1)]
        );
    }

    #[test]
    fn callable_resolution() {
        let root = json!({
            "type": "keyword_score",
            "keywords": {"otp": 0.8}
        });
        let model = resolve_model(&document(root)).unwrap();
        assert_eq!(model.kind(), ModelKind::Callable);
        assert_eq!(
            model.predict(&["your otp".to_string()]).unwrap(),
            vec![RawPrediction::Score(0.8)]
        );
    }

    #[test]
    fn wrapped_callable_resolution() {
        let root = json!({
            "pipeline": {"type": "keyword_score", "keywords": {"otp": 0.8}}
        });
        let model = resolve_model(&document(root)).unwrap();
        assert_eq!(model.kind(), ModelKind::DictWrapped);
        assert!(!model.supports_proba());
    }

    #[test]
    fn unwrapping_happens_only_once() {
        let root = json!({"model": {"model": linear_definition()}});
        let error = resolve_model(&document(root)).unwrap_err();
        assert!(error.is_capability_error());
    }

    #[test]
    fn unusable_artifacts_are_capability_errors() {
        for root in [
            json!({"type": "random_forest", "trees": []}),
            json!({"weights": {"a": 1.0}}),
            json!({"model": "not a mapping"}),
            json!({"type": "linear_text", "weights": {}}),
            json!({"type": "linear_text", "weights": "nope"}),
        ] {
            let error = resolve_model(&document(root.clone())).unwrap_err();
            assert!(error.is_capability_error(), "{root}");
        }
    }
}
