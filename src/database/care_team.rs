// ABOUTME: Database operations for the care-team registry of a client subscription
// ABOUTME: Creates assignments, moves them through their lifecycle and lists the participating roster
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use super::rows::{
    date_column, datetime_column, discipline_column, format_date, optional_date_column,
    uuid_column,
};
use crate::errors::{AppError, AppResult};
use crate::models::{CareTeamAssignment, CareTeamStatus, Discipline};

/// Request to put a specialist on a subscription's care team
#[derive(Debug, Clone)]
pub struct CreateCareTeamAssignmentRequest {
    /// Client subscription
    pub subscription_id: Uuid,
    /// Specialist user
    pub specialist_id: Uuid,
    /// Specialty
    pub specialty: Discipline,
    /// Initial lifecycle status
    pub status: CareTeamStatus,
    /// First active day
    pub active_from: NaiveDate,
    /// Last active day, open-ended when absent
    pub active_until: Option<NaiveDate>,
}

/// Care-team database operations manager
pub struct CareTeamManager {
    pool: SqlitePool,
}

impl CareTeamManager {
    /// Create a new care-team manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a care-team assignment
    ///
    /// # Errors
    ///
    /// Returns an error if `active_until` is before `active_from` or database operation fails
    pub async fn create_assignment(
        &self,
        request: &CreateCareTeamAssignmentRequest,
    ) -> AppResult<CareTeamAssignment> {
        if let Some(until) = request.active_until {
            if until < request.active_from {
                return Err(AppError::invalid_input(format!(
                    "Care-team window ends ({until}) before it starts ({})",
                    request.active_from
                )));
            }
        }

        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO care_team_assignments (
                id, subscription_id, specialist_id, specialty, status,
                active_from, active_until, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ",
        )
        .bind(id.to_string())
        .bind(request.subscription_id.to_string())
        .bind(request.specialist_id.to_string())
        .bind(request.specialty.as_str())
        .bind(request.status.as_str())
        .bind(format_date(request.active_from))
        .bind(request.active_until.map(format_date))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::storage_write(format!("Failed to create care-team assignment: {e}"))
        })?;

        Ok(CareTeamAssignment {
            id,
            subscription_id: request.subscription_id,
            specialist_id: request.specialist_id,
            specialty: request.specialty,
            status: request.status,
            active_from: request.active_from,
            active_until: request.active_until,
            created_at: now,
        })
    }

    /// Move an assignment to a new lifecycle status
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment does not exist or database operation fails
    pub async fn update_status(&self, assignment_id: Uuid, status: CareTeamStatus) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE care_team_assignments SET status = $1, updated_at = $2 WHERE id = $3",
        )
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(assignment_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::storage_write(format!("Failed to update care-team assignment: {e}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Care-team assignment {assignment_id}"
            )));
        }
        Ok(())
    }

    /// List the assignments that take part in program instantiation
    ///
    /// Only `active` and `scheduled_end` rows are returned, ordered by
    /// specialist, specialty, start date and id so synthesized sort orders are
    /// reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a row is corrupt
    pub async fn list_participating(
        &self,
        subscription_id: Uuid,
    ) -> AppResult<Vec<CareTeamAssignment>> {
        let rows = sqlx::query(
            r"
            SELECT id, subscription_id, specialist_id, specialty, status,
                   active_from, active_until, created_at
            FROM care_team_assignments
            WHERE subscription_id = $1 AND status IN ($2, $3)
            ORDER BY specialist_id ASC, specialty ASC, active_from ASC, id ASC
            ",
        )
        .bind(subscription_id.to_string())
        .bind(CareTeamStatus::Active.as_str())
        .bind(CareTeamStatus::ScheduledEnd.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to load care-team roster: {e}")))?;

        rows.iter().map(row_to_assignment).collect()
    }

    /// List every assignment of a subscription regardless of status
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a row is corrupt
    pub async fn list_for_subscription(
        &self,
        subscription_id: Uuid,
    ) -> AppResult<Vec<CareTeamAssignment>> {
        let rows = sqlx::query(
            r"
            SELECT id, subscription_id, specialist_id, specialty, status,
                   active_from, active_until, created_at
            FROM care_team_assignments
            WHERE subscription_id = $1
            ORDER BY active_from ASC, id ASC
            ",
        )
        .bind(subscription_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::storage_read(format!("Failed to list care-team assignments: {e}"))
        })?;

        rows.iter().map(row_to_assignment).collect()
    }
}

/// Convert a database row to a `CareTeamAssignment`
fn row_to_assignment(row: &SqliteRow) -> AppResult<CareTeamAssignment> {
    let status: String = row.get("status");
    Ok(CareTeamAssignment {
        id: uuid_column(row, "id")?,
        subscription_id: uuid_column(row, "subscription_id")?,
        specialist_id: uuid_column(row, "specialist_id")?,
        specialty: discipline_column(row, "specialty")?,
        status: CareTeamStatus::parse(&status),
        active_from: date_column(row, "active_from")?,
        active_until: optional_date_column(row, "active_until")?,
        created_at: datetime_column(row, "created_at")?,
    })
}
