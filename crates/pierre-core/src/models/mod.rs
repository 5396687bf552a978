// ABOUTME: Domain model re-exports for program templates, care teams and client programs
// ABOUTME: Canonical DTO definitions shared by storage, the engine and the CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Care-team assignment models
pub mod care_team;
/// Materialized client program models
pub mod client_program;
/// Training discipline enum
pub mod discipline;
/// Program template models
pub mod template;

pub use care_team::{CareTeamAssignment, CareTeamStatus};
pub use client_program::{
    ClientDayModule, ClientDayView, ClientModuleExercise, ClientModuleStatus, ClientModuleView,
    ClientProgram, ClientProgramDay, ClientProgramStatus, ClientProgramView, ModuleProvenance,
    ModuleThread,
};
pub use discipline::Discipline;
pub use template::{
    Exercise, ModuleStatus, Prescription, ProgramTemplate, TemplateDay, TemplateExercise,
    TemplateModule,
};
