// ABOUTME: Program template DTOs: template, days, modules, exercises and prescriptions
// ABOUTME: Templates are coach-authored and read-only from the instantiation engine's view
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Discipline;

/// Publication status of a template module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Authoring scratch space, never copied to a client
    #[default]
    Draft,
    /// Eligible for client programs
    Published,
}

impl ModuleStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Parse from database string representation
    ///
    /// Unknown values map to `Draft` so they can never leak into a client program.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "published" => Self::Published,
            _ => Self::Draft,
        }
    }

    /// Check if the module may be copied into a client program
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

/// Exercise from the shared exercise library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Primary discipline, if classified
    pub discipline: Option<Discipline>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Quantitative plan for one exercise
///
/// Copied by value into client programs; never referenced live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Prescription {
    /// Number of working sets
    pub sets: Option<u32>,
    /// Lower bound of the rep range
    pub reps_min: Option<u32>,
    /// Upper bound of the rep range
    pub reps_max: Option<u32>,
    /// Tempo string such as "3-1-1-0"
    pub tempo: Option<String>,
    /// Rest between sets in seconds
    pub rest_seconds: Option<u32>,
    /// Intensity scheme such as "rpe", "percent_1rm" or "rir"
    pub intensity_type: Option<String>,
    /// Intensity value in the unit of `intensity_type`
    pub intensity_value: Option<f64>,
    /// Warm-up set plan
    pub warmup_sets: Option<Value>,
    /// Coach-defined custom fields
    pub custom_fields: Option<Value>,
    /// Free-text progression notes
    pub progression_notes: Option<String>,
    /// Structured per-set plan
    pub set_plan: Option<Value>,
    /// Whether linear progression is enabled
    #[serde(default)]
    pub linear_progression_enabled: bool,
    /// Linear progression configuration
    pub linear_progression_config: Option<Value>,
}

/// Exercise slot inside a template module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExercise {
    /// Unique identifier
    pub id: Uuid,
    /// Owning template module
    pub module_id: Uuid,
    /// Library exercise reference
    pub exercise_id: Uuid,
    /// Section tag such as "warmup" or "main"
    pub section: Option<String>,
    /// Position within the module
    pub sort_order: i32,
    /// Coaching instructions
    pub instructions: Option<String>,
    /// Zero-or-one prescription
    pub prescription: Option<Prescription>,
}

/// One training session of a given discipline within a template day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateModule {
    /// Unique identifier
    pub id: Uuid,
    /// Owning template day
    pub day_id: Uuid,
    /// Coach who authored the module
    pub coach_id: Uuid,
    /// Training discipline
    pub module_type: Discipline,
    /// Display title
    pub title: String,
    /// Position within the day
    pub sort_order: i32,
    /// Publication status
    pub status: ModuleStatus,
}

/// One day of a template cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDay {
    /// Unique identifier
    pub id: Uuid,
    /// Owning template
    pub template_id: Uuid,
    /// 1-based position within the cycle
    pub day_index: i32,
    /// Display title
    pub title: String,
    /// Modules ordered by `sort_order`
    pub modules: Vec<TemplateModule>,
}

/// Reusable coach-authored program definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramTemplate {
    /// Unique identifier
    pub id: Uuid,
    /// Authoring coach
    pub coach_id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Days ordered by `day_index`
    pub days: Vec<TemplateDay>,
}

impl ProgramTemplate {
    /// Number of published modules across all days
    #[must_use]
    pub fn published_module_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|day| &day.modules)
            .filter(|module| module.status.is_published())
            .count()
    }
}
