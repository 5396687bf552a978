// ABOUTME: Migration command for pierre-programs
// ABOUTME: Applies embedded migrations and reports success
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_programs::database::Database;
use pierre_programs::errors::AppResult;
use tracing::info;

/// Apply any pending migrations
pub async fn run(database: &Database) -> AppResult<()> {
    database.migrate().await?;
    info!("Database schema is up to date");
    println!("Success Database schema is up to date");
    Ok(())
}
