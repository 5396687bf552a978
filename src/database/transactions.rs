// ABOUTME: RAII transaction guard for SQLite multi-row writes
// ABOUTME: Rolls back automatically when dropped without an explicit commit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::warn;

use crate::errors::{AppError, AppResult};

/// Wraps a SQLite transaction so every early return rolls back
///
/// Dropping the guard before `commit` discards all writes made through
/// `executor`.
pub struct SqliteTransactionGuard<'c> {
    tx: Option<Transaction<'c, Sqlite>>,
}

impl<'c> SqliteTransactionGuard<'c> {
    /// Take ownership of an open transaction
    #[must_use]
    pub const fn new(tx: Transaction<'c, Sqlite>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Connection to run statements on inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already committed or rolled back
    pub fn executor(&mut self) -> AppResult<&mut SqliteConnection> {
        self.tx
            .as_mut()
            .map(|tx| &mut **tx)
            .ok_or_else(|| AppError::internal("Transaction already finished"))
    }

    /// Commit all writes
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails or the transaction already finished
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::internal("Transaction already finished"))?;
        tx.commit()
            .await
            .map_err(|e| AppError::storage_write(format!("Failed to commit transaction: {e}")))
    }

    /// Discard all writes
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails or the transaction already finished
    pub async fn rollback(mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::internal("Transaction already finished"))?;
        tx.rollback()
            .await
            .map_err(|e| AppError::storage_write(format!("Failed to roll back transaction: {e}")))
    }
}

impl Drop for SqliteTransactionGuard<'_> {
    fn drop(&mut self) {
        // sqlx queues the rollback itself when the transaction is dropped
        if self.tx.is_some() {
            warn!("Transaction dropped without commit, rolling back");
        }
    }
}
