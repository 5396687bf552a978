// ABOUTME: Subcommand implementations for the pierre-programs CLI
// ABOUTME: One module per subcommand
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod assign;
pub mod migrate;
pub mod show;
