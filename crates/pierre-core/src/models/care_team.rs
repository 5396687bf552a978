// ABOUTME: Care-team assignment DTOs linking specialists to a client subscription
// ABOUTME: Lifecycle status and inclusive active date window used during program instantiation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Discipline;

/// Lifecycle status of a care-team assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CareTeamStatus {
    /// Currently on the care team
    #[default]
    Active,
    /// On the care team until `active_until`
    ScheduledEnd,
    /// Removed before the window ended
    Revoked,
    /// Window has passed
    Expired,
}

impl CareTeamStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::ScheduledEnd => "scheduled_end",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }

    /// Parse from database string representation
    ///
    /// Unknown values are treated as `Expired` so they never participate.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "scheduled_end" => Self::ScheduledEnd,
            "revoked" => Self::Revoked,
            _ => Self::Expired,
        }
    }

    /// Whether assignments in this status take part in program instantiation
    #[must_use]
    pub const fn participates(&self) -> bool {
        matches!(self, Self::Active | Self::ScheduledEnd)
    }
}

/// A specialist assigned to a client subscription for a date window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareTeamAssignment {
    /// Unique identifier
    pub id: Uuid,
    /// Client subscription the specialist serves
    pub subscription_id: Uuid,
    /// Specialist user
    pub specialist_id: Uuid,
    /// Specialty, matched against module types
    pub specialty: Discipline,
    /// Lifecycle status
    pub status: CareTeamStatus,
    /// First day the specialist is active
    pub active_from: NaiveDate,
    /// Last day the specialist is active; open-ended when absent
    pub active_until: Option<NaiveDate>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl CareTeamAssignment {
    /// Check whether `date` falls inside `[active_from, active_until]` (inclusive)
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.active_from && self.active_until.is_none_or(|until| date <= until)
    }
}
