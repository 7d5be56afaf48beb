// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the fraud lookup core
//!
//! This crate provides the verdict vocabulary that is shared across the
//! phone heading classifier, the SMS predictor and the service wiring,
//! avoiding circular dependencies between them.

pub mod heading_status;
pub mod sms_verdict;

pub use heading_status::{HeadingStatus, ParseStatusError};
pub use sms_verdict::{PredictionMethod, RiskLevel, SmsLabel};
