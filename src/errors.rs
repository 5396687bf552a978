// ABOUTME: Application error types shared with the core crate
// ABOUTME: Re-exports AppError, AppResult and ErrorCode from pierre-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_core::errors::{AppError, AppResult, ErrorCode};
