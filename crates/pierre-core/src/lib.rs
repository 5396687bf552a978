// ABOUTME: Core crate for Pierre Programs shared by the engine, storage and CLI
// ABOUTME: Exposes the program/care-team domain models and the unified error type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pierre Core
//!
//! Domain types that cross module boundaries: program templates, care-team
//! assignments, materialized client programs and the `AppError` taxonomy.

/// Unified error handling with error codes
pub mod errors;

/// Domain models for templates, care teams and client programs
pub mod models;
