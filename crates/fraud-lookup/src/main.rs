// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Fraud lookup command line
//!
//! Classifies phone numbers and SMS messages and manages the model cache,
//! printing JSON to stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fraud_lookup::{FraudLookup, LookupConfig};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "fraud-lookup", version)]
#[command(about = "Phone heading and SMS fraud lookup", long_about = None)]
struct Cli {
    /// Load the model before running the command
    #[arg(long, env = "FRAUD_LOOKUP_WARM_UP")]
    warm_up: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify phone numbers by their heading
    Phone {
        /// Raw phone numbers, any formatting
        #[arg(required = true)]
        numbers: Vec<String>,
    },
    /// Classify an SMS message
    Sms {
        /// Message text
        text: String,
    },
    /// Download and load the model artifact
    WarmUp,
    /// Print the model loader status
    Status,
    /// Classify a probe message and report which path served it
    Health,
    /// Delete the cached model artifact
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = LookupConfig::from_env()?;
    config.warm_up |= cli.warm_up;
    info!(environment = %config.environment, "Starting fraud lookup");

    let lookup = FraudLookup::from_config(&config).await?;

    let output = match cli.command {
        Command::Phone { numbers } => {
            let analyses: Vec<_> = numbers
                .iter()
                .map(|number| lookup.classify_phone_head(number))
                .collect();
            serde_json::to_value(analyses)?
        }
        Command::Sms { text } => {
            let verdict = lookup.predict_sms(&text).await;
            json!({
                "text": text,
                "label": verdict.label,
                "confidence": verdict.confidence,
                "method": verdict.method,
                "risk_level": verdict.risk_level(),
            })
        }
        Command::WarmUp => serde_json::to_value(lookup.load_model().await)?,
        Command::Status => serde_json::to_value(lookup.get_model_status().await)?,
        Command::Health => serde_json::to_value(lookup.health_check().await)?,
        Command::ClearCache => {
            lookup.clear_model_cache().await?;
            serde_json::to_value(lookup.get_model_status().await)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
