// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Heading store collaborator
//!
//! The classifier reads headings through [`HeadingStore`] and never writes.
//! [`InMemoryHeadingStore`] is a concurrent reference implementation that
//! also carries the administrative populate step.

use std::{
    fmt,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use dashmap::{DashMap, mapref::entry::Entry};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::{
    error::{HeadingError, HeadingResult},
    rules::{DefaultHeadingTable, HeadingRule},
};

/// Identifier of a stored heading rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadingId(u64);

impl HeadingId {
    /// Create an identifier from its raw value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HeadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rule as held by a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHeading {
    /// Store-assigned identifier
    pub id: HeadingId,
    /// The rule itself
    pub rule: HeadingRule,
}

/// Read access to persisted heading rules
#[cfg_attr(test, mockall::automock)]
pub trait HeadingStore: Send + Sync {
    /// Exact-match lookup of a heading prefix
    fn lookup_heading(&self, prefix: &str) -> Option<StoredHeading>;
}

impl<T: HeadingStore + ?Sized> HeadingStore for Arc<T> {
    fn lookup_heading(&self, prefix: &str) -> Option<StoredHeading> {
        (**self).lookup_heading(prefix)
    }
}

/// Outcome of seeding rules into a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopulateSummary {
    /// Rules newly added
    pub added: usize,
    /// Rules skipped because the prefix already existed
    pub skipped: usize,
    /// Rules in the store afterwards
    pub total: usize,
    /// Trusted rules in the store afterwards
    pub safe_count: usize,
    /// Untrusted rules in the store afterwards
    pub unsafe_count: usize,
}

/// Concurrent in-memory heading store
#[derive(Debug, Default)]
pub struct InMemoryHeadingStore {
    headings: DashMap<String, StoredHeading>,
    next_id: AtomicU64,
}

impl InMemoryHeadingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a YAML or JSON list of rules
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as YAML.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> HeadingResult<Self> {
        let path = path.as_ref();
        debug!("Loading heading rules from: {}", path.display());

        let content = fs::read_to_string(path).await.map_err(|e| {
            HeadingError::io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let rules: Vec<HeadingRule> = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                HeadingError::parse(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                HeadingError::parse(format!("Failed to parse {}: {}", path.display(), e))
            })?
        };

        let store = Self::new();
        let summary = store.populate(rules);

        info!(
            added = summary.added,
            skipped = summary.skipped,
            "Loaded heading rules from {}",
            path.display()
        );

        Ok(store)
    }

    /// Add a rule unless its prefix is already present
    ///
    /// Returns the new identifier, or `None` when the prefix existed.
    pub fn insert(&self, rule: HeadingRule) -> Option<HeadingId> {
        match self.headings.entry(rule.prefix().to_string()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let id = self.allocate_id();
                slot.insert(StoredHeading { id, rule });
                Some(id)
            }
        }
    }

    /// Add or replace a rule, keeping the identifier of a replaced rule
    pub fn upsert(&self, rule: HeadingRule) -> HeadingId {
        match self.headings.entry(rule.prefix().to_string()) {
            Entry::Occupied(mut existing) => {
                let id = existing.get().id;
                existing.insert(StoredHeading { id, rule });
                id
            }
            Entry::Vacant(slot) => {
                let id = self.allocate_id();
                slot.insert(StoredHeading { id, rule });
                id
            }
        }
    }

    /// Remove a rule by prefix
    pub fn remove(&self, prefix: &str) -> Option<StoredHeading> {
        self.headings.remove(prefix).map(|(_, stored)| stored)
    }

    /// Add every rule whose prefix is absent
    pub fn populate<I>(&self, rules: I) -> PopulateSummary
    where
        I: IntoIterator<Item = HeadingRule>,
    {
        let mut summary = PopulateSummary::default();
        for rule in rules {
            if self.insert(rule).is_some() {
                summary.added += 1;
            } else {
                summary.skipped += 1;
            }
        }

        summary.total = self.len();
        summary.safe_count = self
            .headings
            .iter()
            .filter(|entry| entry.rule.status().is_safe())
            .count();
        summary.unsafe_count = summary.total - summary.safe_count;
        summary
    }

    /// Seed the international country codes
    pub fn populate_defaults(&self) -> PopulateSummary {
        let summary = self.populate(
            DefaultHeadingTable::builtin()
                .international_rules()
                .cloned(),
        );
        info!(
            added = summary.added,
            total = summary.total,
            safe = summary.safe_count,
            unsafe_headings = summary.unsafe_count,
            "Populated international headings"
        );
        summary
    }

    /// All stored rules ordered by identifier
    pub fn snapshot(&self) -> Vec<StoredHeading> {
        let mut headings: Vec<_> = self
            .headings
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        headings.sort_by_key(|stored| stored.id);
        headings
    }

    /// Number of stored rules
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    fn allocate_id(&self) -> HeadingId {
        HeadingId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl HeadingStore for InMemoryHeadingStore {
    fn lookup_heading(&self, prefix: &str) -> Option<StoredHeading> {
        self.headings.get(prefix).map(|entry| entry.value().clone())
    }
}
