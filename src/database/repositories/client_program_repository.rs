// ABOUTME: SQLite implementation of the client program repository
// ABOUTME: Transactional plan persistence and nested program loading via ClientProgramsManager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use uuid::Uuid;

use super::ClientProgramRepository;
use crate::database::{ClientProgramsManager, Database};
use crate::errors::AppResult;
use crate::models::ClientProgramView;
use crate::programs::plan::MaterializationPlan;

/// SQLite implementation of `ClientProgramRepository`
pub struct ClientProgramRepositoryImpl {
    manager: ClientProgramsManager,
}

impl ClientProgramRepositoryImpl {
    /// Create a new `ClientProgramRepository` with the given database connection
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            manager: db.client_programs(),
        }
    }
}

#[async_trait]
impl ClientProgramRepository for ClientProgramRepositoryImpl {
    async fn persist_plan(&self, plan: &MaterializationPlan) -> AppResult<Uuid> {
        self.manager.persist_plan(plan).await
    }

    async fn load_program(&self, program_id: Uuid) -> AppResult<Option<ClientProgramView>> {
        self.manager.load_program(program_id).await
    }
}
