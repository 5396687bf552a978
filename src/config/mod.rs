// ABOUTME: Configuration module root
// ABOUTME: Exposes environment-driven database and logging settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable configuration
pub mod environment;

pub use environment::{DatabaseConfig, LogFormat, LoggingConfig, ServerConfig};
