// ABOUTME: Repository trait definitions for the instantiation engine's collaborators
// ABOUTME: Template store, care-team registry and client program store behind async traits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{CareTeamAssignment, ClientProgramView, ProgramTemplate, TemplateExercise};
use crate::programs::plan::MaterializationPlan;

// Repository implementations
/// Care-team registry repository implementation
pub mod care_team_repository;
/// Client program repository implementation
pub mod client_program_repository;
/// Program template repository implementation
pub mod template_repository;

// Re-export implementations
pub use care_team_repository::CareTeamRepositoryImpl;
pub use client_program_repository::ClientProgramRepositoryImpl;
pub use template_repository::TemplateRepositoryImpl;

// ================================
// Repository Trait Definitions
// ================================

/// Read access to coach-authored program templates
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Load a template with days and modules (no exercises)
    async fn load_hierarchy(&self, template_id: Uuid) -> AppResult<Option<ProgramTemplate>>;

    /// List one module's exercises with prescriptions
    async fn list_module_exercises(&self, module_id: Uuid) -> AppResult<Vec<TemplateExercise>>;
}

/// Read access to a subscription's care team
#[async_trait]
pub trait CareTeamRepository: Send + Sync {
    /// Assignments with status `active` or `scheduled_end`
    async fn list_participating(&self, subscription_id: Uuid)
        -> AppResult<Vec<CareTeamAssignment>>;
}

/// Write access to client-owned program rows
#[async_trait]
pub trait ClientProgramRepository: Send + Sync {
    /// Persist every row of the plan atomically and return the program id
    async fn persist_plan(&self, plan: &MaterializationPlan) -> AppResult<Uuid>;

    /// Load a fully materialized program
    async fn load_program(&self, program_id: Uuid) -> AppResult<Option<ClientProgramView>>;
}
