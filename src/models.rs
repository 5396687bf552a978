// ABOUTME: Domain models for templates, care teams and client programs
// ABOUTME: Re-exports the pierre-core model types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_core::models::*;
