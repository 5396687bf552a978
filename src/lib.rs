// ABOUTME: Main library entry point for Pierre coaching programs
// ABOUTME: Materializes program templates into dated per-client programs with care-team sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Programs
//!
//! Coaches author reusable program templates (days, modules, exercises and
//! their prescriptions). Assigning a template to a client deep-copies it into
//! client-owned rows with calendar dates, and adds a session for every
//! care-team specialist whose discipline the coach's template does not
//! already cover that day.
//!
//! ## Architecture
//!
//! - **Models**: template, care-team and client program types (`pierre-core`)
//! - **Database**: `SQLite` managers and repository traits over them
//! - **Programs**: pure planning plus the transactional assignment engine
//! - **Onboarding / Permissions**: client funnel states and role checks
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use pierre_programs::config::ServerConfig;
//! use pierre_programs::database::Database;
//! use pierre_programs::errors::AppResult;
//! use pierre_programs::programs::{AssignmentRequest, ProgramAssignmentEngine};
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let db = Database::from_config(&config.database).await?;
//!     let engine = ProgramAssignmentEngine::from_database(&db);
//!
//!     let request = AssignmentRequest {
//!         coach_user_id: Uuid::new_v4(),
//!         client_user_id: Uuid::new_v4(),
//!         subscription_id: Uuid::new_v4(),
//!         program_template_id: Uuid::new_v4(),
//!         start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default(),
//!         team_id: None,
//!     };
//!     let outcome = engine.assign(&request).await;
//!     println!("assigned: {}", outcome.success);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// `SQLite` persistence for templates, care teams and client programs
pub mod database;

/// Error types
pub mod errors;

/// Tracing subscriber setup
pub mod logging;

/// Domain models
pub mod models;

/// Client onboarding state machine
pub mod onboarding;

/// Role permissions
pub mod permissions;

/// Program planning and assignment
pub mod programs;
