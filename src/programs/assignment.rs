// ABOUTME: Program instantiation engine assigning a coaching template to a client
// ABOUTME: Loads template, exercises and care-team roster, plans the rows and persists them atomically
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::plan::{build_plan, AssignmentRequest};
use crate::database::repositories::{
    CareTeamRepository, CareTeamRepositoryImpl, ClientProgramRepository,
    ClientProgramRepositoryImpl, TemplateRepository, TemplateRepositoryImpl,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{ModuleProvenance, ProgramTemplate, TemplateExercise};

/// Caller-facing result of an assignment
///
/// Serializes as `{ "success": true, "clientProgramId": ... }` or
/// `{ "success": false, "error": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentOutcome {
    /// Whether the program was created
    pub success: bool,
    /// New program id on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_program_id: Option<Uuid>,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssignmentOutcome {
    /// Successful assignment
    #[must_use]
    pub const fn assigned(client_program_id: Uuid) -> Self {
        Self {
            success: true,
            client_program_id: Some(client_program_id),
            error: None,
        }
    }

    /// Failed assignment
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            client_program_id: None,
            error: Some(error.into()),
        }
    }
}

impl From<AppResult<Uuid>> for AssignmentOutcome {
    fn from(result: AppResult<Uuid>) -> Self {
        match result {
            Ok(id) => Self::assigned(id),
            Err(e) => Self::failed(e.message),
        }
    }
}

/// Materializes program templates into client programs
#[derive(Clone)]
pub struct ProgramAssignmentEngine {
    templates: Arc<dyn TemplateRepository>,
    care_team: Arc<dyn CareTeamRepository>,
    programs: Arc<dyn ClientProgramRepository>,
}

impl ProgramAssignmentEngine {
    /// Create an engine over explicit collaborators
    #[must_use]
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        care_team: Arc<dyn CareTeamRepository>,
        programs: Arc<dyn ClientProgramRepository>,
    ) -> Self {
        Self {
            templates,
            care_team,
            programs,
        }
    }

    /// Create an engine backed by the SQLite repositories
    #[must_use]
    pub fn from_database(db: &Database) -> Self {
        Self::new(
            Arc::new(TemplateRepositoryImpl::new(db)),
            Arc::new(CareTeamRepositoryImpl::new(db)),
            Arc::new(ClientProgramRepositoryImpl::new(db)),
        )
    }

    /// Assign a template to a client starting on `request.start_date`
    ///
    /// The roster is read once and reused for every day. All rows are written
    /// in a single transaction, so a failure leaves no partial program and the
    /// call can simply be retried.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template does not exist (`ResourceNotFound`)
    /// - The roster, hierarchy or an exercise list cannot be read (`StorageRead`)
    /// - A template day has an invalid index (`InvalidInput`)
    /// - Any insert or the commit fails (`StorageWrite`)
    pub async fn assign_program_to_client(&self, request: &AssignmentRequest) -> AppResult<Uuid> {
        info!(
            template_id = %request.program_template_id,
            client_id = %request.client_user_id,
            coach_id = %request.coach_user_id,
            start_date = %request.start_date,
            "Assigning program template to client"
        );

        let template = self
            .templates
            .load_hierarchy(request.program_template_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Program template {}", request.program_template_id))
            })?;

        let roster = self
            .care_team
            .list_participating(request.subscription_id)
            .await?;
        debug!(
            subscription_id = %request.subscription_id,
            roster_size = roster.len(),
            "Care-team roster loaded"
        );

        let exercises = self.load_published_exercises(&template).await?;
        let plan = build_plan(request, &template, &exercises, &roster, Utc::now())?;

        let program_id = self.programs.persist_plan(&plan).await?;

        info!(
            program_id = %program_id,
            days = plan.day_count(),
            template_modules = plan.module_count(ModuleProvenance::Template),
            care_team_modules = plan.module_count(ModuleProvenance::CareTeam),
            exercises = plan.exercise_count(),
            "Program assigned"
        );
        Ok(program_id)
    }

    /// Assign and fold any failure into an `AssignmentOutcome`
    pub async fn assign(&self, request: &AssignmentRequest) -> AssignmentOutcome {
        let result = self.assign_program_to_client(request).await;
        if let Err(e) = &result {
            error!(
                template_id = %request.program_template_id,
                client_id = %request.client_user_id,
                code = %e.code,
                "Program assignment failed: {}",
                e.message
            );
        }
        AssignmentOutcome::from(result)
    }

    async fn load_published_exercises(
        &self,
        template: &ProgramTemplate,
    ) -> AppResult<HashMap<Uuid, Vec<TemplateExercise>>> {
        let mut exercises = HashMap::new();
        let published = template
            .days
            .iter()
            .flat_map(|day| &day.modules)
            .filter(|module| module.status.is_published());

        for module in published {
            let module_exercises = self.templates.list_module_exercises(module.id).await?;
            exercises.insert(module.id, module_exercises);
        }
        Ok(exercises)
    }
}
