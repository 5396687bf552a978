// ABOUTME: Materialized client program DTOs: program root, dated days, modules, exercises, threads
// ABOUTME: Rows are owned by one ClientProgram and created once per assignment action
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Discipline;

/// Status of a client program
///
/// Instantiation only ever creates `Active`; the other states are set by
/// program-execution code and are kept here so rows round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientProgramStatus {
    /// Program is running
    #[default]
    Active,
    /// Temporarily paused by the coach
    Paused,
    /// Program finished
    Completed,
}

impl ClientProgramStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "paused" => Self::Paused,
            "completed" => Self::Completed,
            _ => Self::Active,
        }
    }
}

/// Where a client module came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleProvenance {
    /// Copied from a published template module
    Template,
    /// Synthesized for an active care-team specialist
    CareTeam,
}

impl ModuleProvenance {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::CareTeam => "care_team",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "care_team" => Self::CareTeam,
            _ => Self::Template,
        }
    }
}

/// Execution status of a client module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientModuleStatus {
    /// Planned, not yet performed
    #[default]
    Scheduled,
    /// Performed by the client
    Completed,
    /// Skipped by the client
    Skipped,
}

impl ClientModuleStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "skipped" => Self::Skipped,
            _ => Self::Scheduled,
        }
    }
}

/// Root of a materialized program for one client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProgram {
    /// Unique identifier
    pub id: Uuid,
    /// Client who executes the program
    pub client_id: Uuid,
    /// Subscription the program belongs to
    pub subscription_id: Uuid,
    /// Primary coach
    pub coach_id: Uuid,
    /// Template the program was copied from
    pub source_template_id: Uuid,
    /// Calendar date of day 1
    pub start_date: NaiveDate,
    /// Program status
    pub status: ClientProgramStatus,
    /// Team cohort, for team-plan fan-out
    pub team_id: Option<Uuid>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// One dated day of a client program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProgramDay {
    /// Unique identifier
    pub id: Uuid,
    /// Owning program
    pub program_id: Uuid,
    /// Day index copied from the template
    pub day_index: i32,
    /// Display title
    pub title: String,
    /// `start_date + (day_index - 1)` days
    pub date: NaiveDate,
}

/// One session on a client program day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDayModule {
    /// Unique identifier
    pub id: Uuid,
    /// Owning day
    pub day_id: Uuid,
    /// Template copy or care-team synthesis
    pub provenance: ModuleProvenance,
    /// Source template module for template-derived modules
    pub source_module_id: Option<Uuid>,
    /// Coach or specialist who owns the session
    pub owner_id: Uuid,
    /// Training discipline
    pub module_type: Discipline,
    /// Display title
    pub title: String,
    /// Position within the day
    pub sort_order: i32,
    /// Execution status
    pub status: ClientModuleStatus,
}

/// Exercise copied into a client module with a frozen prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientModuleExercise {
    /// Unique identifier
    pub id: Uuid,
    /// Owning client module
    pub module_id: Uuid,
    /// Library exercise reference
    pub exercise_id: Uuid,
    /// Section tag
    pub section: Option<String>,
    /// Position within the module
    pub sort_order: i32,
    /// Coaching instructions
    pub instructions: Option<String>,
    /// Point-in-time copy of the template prescription (`{}` if none)
    pub prescription_snapshot: Value,
}

/// Communication thread attached to a client module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleThread {
    /// Unique identifier
    pub id: Uuid,
    /// Module the thread discusses
    pub module_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Module with its exercises and optional thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientModuleView {
    /// Module row
    pub module: ClientDayModule,
    /// Exercises ordered by `sort_order`
    pub exercises: Vec<ClientModuleExercise>,
    /// Thread, present for template-derived modules
    pub thread: Option<ModuleThread>,
}

/// Day with its modules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDayView {
    /// Day row
    pub day: ClientProgramDay,
    /// Modules ordered by `sort_order`
    pub modules: Vec<ClientModuleView>,
}

/// Fully loaded client program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProgramView {
    /// Program row
    pub program: ClientProgram,
    /// Days ordered by `day_index`
    pub days: Vec<ClientDayView>,
}

impl ClientProgramView {
    /// Find a day by its index
    #[must_use]
    pub fn day(&self, day_index: i32) -> Option<&ClientDayView> {
        self.days.iter().find(|d| d.day.day_index == day_index)
    }
}
