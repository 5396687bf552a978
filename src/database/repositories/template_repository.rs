// ABOUTME: SQLite implementation of the template repository
// ABOUTME: Delegates to ProgramTemplatesManager over the shared pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use uuid::Uuid;

use super::TemplateRepository;
use crate::database::{Database, ProgramTemplatesManager};
use crate::errors::AppResult;
use crate::models::{ProgramTemplate, TemplateExercise};

/// SQLite implementation of `TemplateRepository`
pub struct TemplateRepositoryImpl {
    manager: ProgramTemplatesManager,
}

impl TemplateRepositoryImpl {
    /// Create a new `TemplateRepository` with the given database connection
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            manager: db.templates(),
        }
    }
}

#[async_trait]
impl TemplateRepository for TemplateRepositoryImpl {
    async fn load_hierarchy(&self, template_id: Uuid) -> AppResult<Option<ProgramTemplate>> {
        self.manager.load_hierarchy(template_id).await
    }

    async fn list_module_exercises(&self, module_id: Uuid) -> AppResult<Vec<TemplateExercise>> {
        self.manager.list_module_exercises(module_id).await
    }
}
