// ABOUTME: Tracing subscriber setup with env-filter and pretty/compact/json output
// ABOUTME: RUST_LOG overrides the configured level when present
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, registry, EnvFilter};

use crate::config::environment::{LogFormat, LoggingConfig};
use crate::errors::{AppError, AppResult};

/// Build the filter: `RUST_LOG` if set, otherwise the configured level
///
/// # Errors
///
/// Returns an error if the configured level is not a valid filter directive
pub fn build_filter(config: &LoggingConfig) -> AppResult<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.level)
            .map_err(|e| AppError::config(format!("Invalid log level '{}': {e}", config.level)))
    })
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = build_filter(config)?;
    let subscriber = registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Compact => subscriber.with(fmt::layer().compact()).try_init(),
        LogFormat::Pretty => subscriber.with(fmt::layer().pretty()).try_init(),
    };

    installed.map_err(|e| AppError::config(format!("Failed to install tracing subscriber: {e}")))
}
