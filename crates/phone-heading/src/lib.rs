// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Phone number heading classification
//!
//! Turns an arbitrary phone number string into a short "heading" (country
//! code or domestic prefix) and resolves that heading to a region and a
//! safe/unsafe status.
//!
//! # Resolution order
//!
//! 1. An exact match in the injected [`HeadingStore`]
//! 2. The built-in [`DefaultHeadingTable`] (Vietnamese mobile allow-list,
//!    Vietnamese landline areas, international country codes)
//! 3. `("Unknown", unsafe)`
//!
//! Classification never fails and never mutates the store.
//!
//! # Example Usage
//!
//! ```rust
//! use phone_heading::{InMemoryHeadingStore, PhoneClassifier};
//!
//! let classifier = PhoneClassifier::new(InMemoryHeadingStore::new());
//! let analysis = classifier.analyze("0965 842 855");
//!
//! assert_eq!(analysis.head, "096");
//! assert_eq!(analysis.region, "Vietnam");
//! assert!(analysis.status.is_safe());
//! ```

pub mod classifier;
pub mod error;
pub mod extractor;
pub mod rules;
pub mod store;

pub use classifier::{HeadingVerdict, PhoneAnalysis, PhoneClassifier};
pub use error::{HeadingError, HeadingResult};
pub use extractor::{clean_number, extract_head};
pub use rules::{DefaultHeadingTable, HeadingRule, UNKNOWN_REGION, VIETNAM_REGION};
pub use store::{HeadingId, HeadingStore, InMemoryHeadingStore, PopulateSummary, StoredHeading};
