// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Phone number and SMS fraud lookup
//!
//! Wires the phone heading classifier and the SMS predictor into one
//! [`FraudLookup`] context built from layered configuration.
//!
//! ```rust,no_run
//! use fraud_lookup::{FraudLookup, LookupConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LookupConfig::from_env()?;
//! let lookup = FraudLookup::from_config(&config).await?;
//!
//! let phone = lookup.classify_phone_head("0965842855");
//! println!("{} {} {}", phone.head, phone.region, phone.status);
//!
//! let sms = lookup.predict_sms("Chúc mừng bạn đã trúng thưởng!").await;
//! println!("{} ({})", sms.label, sms.method);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;

pub use config::{Environment, LookupConfig};
pub use context::FraudLookup;
pub use error::{LookupError, LookupResult};
