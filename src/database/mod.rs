// ABOUTME: SQLite database handle with embedded migrations for templates, care teams and programs
// ABOUTME: Hands out per-table managers sharing one connection pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Care-team registry storage
pub mod care_team;
/// Materialized client program storage
pub mod client_programs;
/// Repository traits used as collaborator seams by the engine
pub mod repositories;
/// Program template authoring storage
pub mod templates;
/// RAII transaction guard
pub mod transactions;

mod rows;

pub use care_team::{CareTeamManager, CreateCareTeamAssignmentRequest};
pub use client_programs::ClientProgramsManager;
pub use templates::{CreateTemplateExerciseRequest, ProgramTemplatesManager};

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::environment::DatabaseConfig;
use crate::errors::{AppError, AppResult};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - Migration process fails
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let db = Self::connect(database_url, max_connections).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Open the connection pool without touching the schema
    ///
    /// In-memory URLs are pinned to a single connection so every query sees
    /// the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the connection fails
    pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL {database_url}: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let max_connections = if is_in_memory(database_url) {
            1
        } else {
            max_connections.max(1)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::storage_read(format!("Failed to connect to database: {e}")))?;

        Ok(Self { pool })
    }

    /// Connect using environment configuration
    ///
    /// # Errors
    ///
    /// Returns an error if connection or migration fails
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        Self::new(&config.url, config.max_connections).await
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run all embedded migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::storage_write(format!("Migration failed: {e}")))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Template authoring operations
    #[must_use]
    pub fn templates(&self) -> ProgramTemplatesManager {
        ProgramTemplatesManager::new(self.pool.clone())
    }

    /// Care-team registry operations
    #[must_use]
    pub fn care_team(&self) -> CareTeamManager {
        CareTeamManager::new(self.pool.clone())
    }

    /// Client program operations
    #[must_use]
    pub fn client_programs(&self) -> ClientProgramsManager {
        ClientProgramsManager::new(self.pool.clone())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
