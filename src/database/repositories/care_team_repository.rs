// ABOUTME: SQLite implementation of the care-team repository
// ABOUTME: Delegates roster reads to CareTeamManager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use uuid::Uuid;

use super::CareTeamRepository;
use crate::database::{CareTeamManager, Database};
use crate::errors::AppResult;
use crate::models::CareTeamAssignment;

/// SQLite implementation of `CareTeamRepository`
pub struct CareTeamRepositoryImpl {
    manager: CareTeamManager,
}

impl CareTeamRepositoryImpl {
    /// Create a new `CareTeamRepository` with the given database connection
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            manager: db.care_team(),
        }
    }
}

#[async_trait]
impl CareTeamRepository for CareTeamRepositoryImpl {
    async fn list_participating(
        &self,
        subscription_id: Uuid,
    ) -> AppResult<Vec<CareTeamAssignment>> {
        self.manager.list_participating(subscription_id).await
    }
}
