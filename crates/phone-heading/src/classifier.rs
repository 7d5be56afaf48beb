// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Phone heading classification

use serde::Serialize;
use shared_types::HeadingStatus;
use tracing::debug;

use crate::{
    extractor::extract_head,
    rules::{DefaultHeadingTable, HeadingRule, UNKNOWN_REGION},
    store::{HeadingId, HeadingStore},
};

/// Region and status resolved for a single heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingVerdict {
    /// Region label
    pub region: String,
    /// Safety status
    pub status: HeadingStatus,
    /// Store identifier when the store matched
    pub rule_id: Option<HeadingId>,
    /// Rule that matched, if any
    pub matched_rule: Option<HeadingRule>,
}

impl HeadingVerdict {
    fn unknown() -> Self {
        Self {
            region: UNKNOWN_REGION.to_string(),
            status: HeadingStatus::Unsafe,
            rule_id: None,
            matched_rule: None,
        }
    }
}

/// Full analysis of a raw phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneAnalysis {
    /// Number as supplied by the caller
    pub phone_number: String,
    /// Extracted heading
    pub head: String,
    /// Region label
    pub region: String,
    /// Safety status
    pub status: HeadingStatus,
    /// Store identifier when the store matched
    pub rule_id: Option<HeadingId>,
    /// Rule that matched, if any
    pub matched_rule: Option<HeadingRule>,
}

/// Resolves headings against a store and the built-in table
#[derive(Debug)]
pub struct PhoneClassifier<S> {
    store: S,
    defaults: &'static DefaultHeadingTable,
}

impl<S: HeadingStore> PhoneClassifier<S> {
    /// Create a classifier over the given store
    pub fn new(store: S) -> Self {
        Self {
            store,
            defaults: DefaultHeadingTable::builtin(),
        }
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a heading to a region and status
    ///
    /// Store first, then the default table, then `("Unknown", unsafe)`.
    pub fn classify(&self, head: &str) -> HeadingVerdict {
        if let Some(stored) = self.store.lookup_heading(head) {
            debug!(head, rule_id = %stored.id, "Heading matched store rule");
            return HeadingVerdict {
                region: stored.rule.region().to_string(),
                status: stored.rule.status(),
                rule_id: Some(stored.id),
                matched_rule: Some(stored.rule),
            };
        }

        if let Some(rule) = self.defaults.lookup(head) {
            debug!(head, region = rule.region(), "Heading matched default table");
            return HeadingVerdict {
                region: rule.region().to_string(),
                status: rule.status(),
                rule_id: None,
                matched_rule: Some(rule.clone()),
            };
        }

        debug!(head, "Heading not recognised, defaulting to unsafe");
        HeadingVerdict::unknown()
    }

    /// Extract the heading of a raw number and classify it
    pub fn analyze(&self, phone_number: &str) -> PhoneAnalysis {
        let head = extract_head(phone_number);
        let verdict = self.classify(&head);

        PhoneAnalysis {
            phone_number: phone_number.to_string(),
            head,
            region: verdict.region,
            status: verdict.status,
            rule_id: verdict.rule_id,
            matched_rule: verdict.matched_rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;

    use super::*;
    use crate::store::{InMemoryHeadingStore, MockHeadingStore, StoredHeading};

    #[test]
    fn vietnamese_mobile_number_is_safe() {
        let classifier = PhoneClassifier::new(InMemoryHeadingStore::new());
        let analysis = classifier.analyze("0965842855");

        assert_eq!(analysis.head, "096");
        assert_eq!(analysis.region, "Vietnam");
        assert_eq!(analysis.status, HeadingStatus::Safe);
        assert_eq!(analysis.rule_id, None);
    }

    #[test]
    fn north_american_number_is_unsafe() {
        let classifier = PhoneClassifier::new(InMemoryHeadingStore::new());
        let analysis = classifier.analyze("+12345678901");

        assert_eq!(analysis.head, "+1");
        assert_eq!(analysis.region, "USA/Canada");
        assert_eq!(analysis.status, HeadingStatus::Unsafe);
        assert_eq!(analysis.rule_id, None);
    }

    #[test]
    fn vietnam_country_code_is_safe() {
        let classifier = PhoneClassifier::new(InMemoryHeadingStore::new());
        let analysis = classifier.analyze("+84 96 584 2855");

        assert_eq!(analysis.head, "+84");
        assert_eq!(analysis.region, "Vietnam");
        assert!(analysis.status.is_safe());
    }

    #[test]
    fn landline_reports_area() {
        let classifier = PhoneClassifier::new(InMemoryHeadingStore::new());
        let verdict = classifier.classify("028");

        assert_eq!(verdict.region, "Vietnam - TP.HCM");
        assert!(verdict.status.is_unsafe());
    }

    #[test]
    fn unknown_heads_default_to_unsafe() {
        let classifier = PhoneClassifier::new(InMemoryHeadingStore::new());
        for raw in ["", "+", "12", "0123456", "+3591234", "garbage"] {
            let analysis = classifier.analyze(raw);
            assert!(analysis.status.is_unsafe(), "{raw} should be unsafe");
            assert_eq!(analysis.region, UNKNOWN_REGION);
            assert_eq!(analysis.matched_rule, None);
        }
    }

    #[test]
    fn store_rule_takes_precedence() {
        let store = InMemoryHeadingStore::new();
        let id = store
            .insert(HeadingRule::unsafe_rule("096", "Flagged range").unwrap())
            .unwrap();
        let classifier = PhoneClassifier::new(store);

        let verdict = classifier.classify("096");
        assert_eq!(verdict.region, "Flagged range");
        assert!(verdict.status.is_unsafe());
        assert_eq!(verdict.rule_id, Some(id));
    }

    #[test]
    fn classification_reads_store_once_per_call() {
        let mut store = MockHeadingStore::new();
        store
            .expect_lookup_heading()
            .with(eq("+44"))
            .times(2)
            .returning(|_| {
                Some(StoredHeading {
                    id: HeadingId::new(7),
                    rule: HeadingRule::safe("+44", "United Kingdom").unwrap(),
                })
            });
        let classifier = PhoneClassifier::new(store);

        let first = classifier.classify("+44");
        let second = classifier.classify("+44");
        assert_eq!(first, second);
        assert_eq!(first.rule_id, Some(HeadingId::new(7)));
    }

    #[test]
    fn store_miss_falls_through_to_defaults() {
        let mut store = MockHeadingStore::new();
        store.expect_lookup_heading().returning(|_| None);
        let classifier = PhoneClassifier::new(store);

        let verdict = classifier.classify("+1");
        assert_eq!(verdict.region, "USA/Canada");
        assert_eq!(verdict.rule_id, None);
    }

    #[test]
    fn shared_store_is_usable_through_arc() {
        let store = Arc::new(InMemoryHeadingStore::new());
        store.populate_defaults();
        let classifier = PhoneClassifier::new(Arc::clone(&store));

        let verdict = classifier.classify("+855");
        assert_eq!(verdict.region, "Cambodia");
        assert!(verdict.rule_id.is_some());
    }
}
