// ABOUTME: Database operations for materialized client programs
// ABOUTME: Atomic plan persistence plus read access to days, modules, exercises and threads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::rows::{
    date_column, datetime_column, discipline_column, format_date, optional_uuid_column,
    uuid_column,
};
use super::transactions::SqliteTransactionGuard;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ClientDayModule, ClientDayView, ClientModuleExercise, ClientModuleStatus, ClientModuleView,
    ClientProgram, ClientProgramDay, ClientProgramStatus, ClientProgramView, ModuleProvenance,
    ModuleThread,
};
use crate::programs::plan::{MaterializationPlan, PlannedModule};

/// Client program database operations manager
pub struct ClientProgramsManager {
    pool: SqlitePool,
}

impl ClientProgramsManager {
    /// Create a new client programs manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write every row of a materialization plan in one transaction
    ///
    /// Rows are inserted parent-before-child: program, then for each day the
    /// day row, its modules, each module's exercises and thread. If any insert
    /// fails the transaction is rolled back explicitly, so no partial
    /// program is ever visible.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert or the commit fails
    pub async fn persist_plan(&self, plan: &MaterializationPlan) -> AppResult<Uuid> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::storage_write(format!("Failed to begin transaction: {e}")))?;
        let mut guard = SqliteTransactionGuard::new(tx);

        if let Err(e) = write_plan(&mut guard, plan).await {
            if let Err(rollback_err) = guard.rollback().await {
                warn!(
                    program_id = %plan.program.id,
                    error = %rollback_err,
                    "Rollback after failed program write did not complete"
                );
            }
            return Err(e);
        }

        guard.commit().await?;

        info!(
            program_id = %plan.program.id,
            client_id = %plan.program.client_id,
            days = plan.day_count(),
            "Client program persisted"
        );
        Ok(plan.program.id)
    }

    /// Get a program root row
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or the row is corrupt
    pub async fn get_program(&self, program_id: Uuid) -> AppResult<Option<ClientProgram>> {
        let row = sqlx::query(
            r"
            SELECT id, client_id, subscription_id, coach_id, source_template_id,
                   start_date, status, team_id, created_at
            FROM client_programs
            WHERE id = $1
            ",
        )
        .bind(program_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to get client program: {e}")))?;

        row.map(|r| row_to_program(&r)).transpose()
    }

    /// List a client's programs, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a row is corrupt
    pub async fn list_programs_for_client(&self, client_id: Uuid) -> AppResult<Vec<ClientProgram>> {
        let rows = sqlx::query(
            r"
            SELECT id, client_id, subscription_id, coach_id, source_template_id,
                   start_date, status, team_id, created_at
            FROM client_programs
            WHERE client_id = $1
            ORDER BY created_at DESC, id ASC
            ",
        )
        .bind(client_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to list client programs: {e}")))?;

        rows.iter().map(row_to_program).collect()
    }

    /// List a program's days ordered by `day_index`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a row is corrupt
    pub async fn list_days(&self, program_id: Uuid) -> AppResult<Vec<ClientProgramDay>> {
        let rows = sqlx::query(
            r"
            SELECT id, program_id, day_index, title, date
            FROM client_program_days
            WHERE program_id = $1
            ORDER BY day_index ASC
            ",
        )
        .bind(program_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to list program days: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(ClientProgramDay {
                    id: uuid_column(row, "id")?,
                    program_id: uuid_column(row, "program_id")?,
                    day_index: row.get("day_index"),
                    title: row.get("title"),
                    date: date_column(row, "date")?,
                })
            })
            .collect()
    }

    /// List a day's modules ordered by `sort_order`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a row is corrupt
    pub async fn list_modules(&self, day_id: Uuid) -> AppResult<Vec<ClientDayModule>> {
        let rows = sqlx::query(
            r"
            SELECT id, day_id, provenance, source_module_id, owner_id, module_type,
                   title, sort_order, status
            FROM client_day_modules
            WHERE day_id = $1
            ORDER BY sort_order ASC
            ",
        )
        .bind(day_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to list day modules: {e}")))?;

        rows.iter().map(row_to_module).collect()
    }

    /// List a module's exercises ordered by `sort_order`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a row is corrupt
    pub async fn list_exercises(&self, module_id: Uuid) -> AppResult<Vec<ClientModuleExercise>> {
        let rows = sqlx::query(
            r"
            SELECT id, module_id, exercise_id, section, sort_order, instructions,
                   prescription_snapshot
            FROM client_module_exercises
            WHERE module_id = $1
            ORDER BY sort_order ASC
            ",
        )
        .bind(module_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to list module exercises: {e}")))?;

        rows.iter()
            .map(|row| {
                let snapshot: String = row.get("prescription_snapshot");
                Ok(ClientModuleExercise {
                    id: uuid_column(row, "id")?,
                    module_id: uuid_column(row, "module_id")?,
                    exercise_id: uuid_column(row, "exercise_id")?,
                    section: row.get("section"),
                    sort_order: row.get("sort_order"),
                    instructions: row.get("instructions"),
                    prescription_snapshot: serde_json::from_str(&snapshot).map_err(|e| {
                        AppError::internal(format!("Invalid prescription snapshot: {e}"))
                    })?,
                })
            })
            .collect()
    }

    /// Get the thread attached to a module, if any
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or the row is corrupt
    pub async fn get_thread(&self, module_id: Uuid) -> AppResult<Option<ModuleThread>> {
        let row = sqlx::query("SELECT id, module_id, created_at FROM module_threads WHERE module_id = $1")
            .bind(module_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::storage_read(format!("Failed to get module thread: {e}")))?;

        row.map(|r| {
            Ok(ModuleThread {
                id: uuid_column(&r, "id")?,
                module_id: uuid_column(&r, "module_id")?,
                created_at: datetime_column(&r, "created_at")?,
            })
        })
        .transpose()
    }

    /// Load a program with all of its days, modules, exercises and threads
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a row is corrupt
    pub async fn load_program(&self, program_id: Uuid) -> AppResult<Option<ClientProgramView>> {
        let Some(program) = self.get_program(program_id).await? else {
            return Ok(None);
        };

        let mut days = Vec::new();
        for day in self.list_days(program_id).await? {
            let mut modules = Vec::new();
            for module in self.list_modules(day.id).await? {
                let exercises = self.list_exercises(module.id).await?;
                let thread = self.get_thread(module.id).await?;
                modules.push(ClientModuleView {
                    module,
                    exercises,
                    thread,
                });
            }
            days.push(ClientDayView { day, modules });
        }

        Ok(Some(ClientProgramView { program, days }))
    }

    /// Delete a program and, by cascade, all of its rows
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete_program(&self, program_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM client_programs WHERE id = $1")
            .bind(program_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage_write(format!("Failed to delete client program: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

async fn write_plan(
    guard: &mut SqliteTransactionGuard<'_>,
    plan: &MaterializationPlan,
) -> AppResult<()> {
    insert_program(guard.executor()?, &plan.program).await?;

    for planned_day in &plan.days {
        insert_day(guard.executor()?, &planned_day.day).await?;
        for planned in &planned_day.modules {
            insert_planned_module(guard.executor()?, planned).await?;
        }
        debug!(
            program_id = %plan.program.id,
            day_index = planned_day.day.day_index,
            date = %planned_day.day.date,
            modules = planned_day.modules.len(),
            "Client program day written"
        );
    }
    Ok(())
}

async fn insert_program(conn: &mut SqliteConnection, program: &ClientProgram) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO client_programs (
            id, client_id, subscription_id, coach_id, source_template_id,
            start_date, status, team_id, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ",
    )
    .bind(program.id.to_string())
    .bind(program.client_id.to_string())
    .bind(program.subscription_id.to_string())
    .bind(program.coach_id.to_string())
    .bind(program.source_template_id.to_string())
    .bind(format_date(program.start_date))
    .bind(program.status.as_str())
    .bind(program.team_id.map(|id| id.to_string()))
    .bind(program.created_at.to_rfc3339())
    .execute(conn)
    .await
    .map_err(|e| AppError::storage_write(format!("Failed to create client program: {e}")))?;
    Ok(())
}

async fn insert_day(conn: &mut SqliteConnection, day: &ClientProgramDay) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO client_program_days (id, program_id, day_index, title, date)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(day.id.to_string())
    .bind(day.program_id.to_string())
    .bind(day.day_index)
    .bind(&day.title)
    .bind(format_date(day.date))
    .execute(conn)
    .await
    .map_err(|e| AppError::storage_write(format!("Failed to create program day: {e}")))?;
    Ok(())
}

async fn insert_planned_module(
    conn: &mut SqliteConnection,
    planned: &PlannedModule,
) -> AppResult<()> {
    let module = &planned.module;
    sqlx::query(
        r"
        INSERT INTO client_day_modules (
            id, day_id, provenance, source_module_id, owner_id, module_type,
            title, sort_order, status
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ",
    )
    .bind(module.id.to_string())
    .bind(module.day_id.to_string())
    .bind(module.provenance.as_str())
    .bind(module.source_module_id.map(|id| id.to_string()))
    .bind(module.owner_id.to_string())
    .bind(module.module_type.as_str())
    .bind(&module.title)
    .bind(module.sort_order)
    .bind(module.status.as_str())
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::storage_write(format!("Failed to create day module: {e}")))?;

    for exercise in &planned.exercises {
        let snapshot = serde_json::to_string(&exercise.prescription_snapshot)?;
        sqlx::query(
            r"
            INSERT INTO client_module_exercises (
                id, module_id, exercise_id, section, sort_order, instructions,
                prescription_snapshot
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(exercise.id.to_string())
        .bind(exercise.module_id.to_string())
        .bind(exercise.exercise_id.to_string())
        .bind(&exercise.section)
        .bind(exercise.sort_order)
        .bind(&exercise.instructions)
        .bind(snapshot)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::storage_write(format!("Failed to create module exercise: {e}")))?;
    }

    if let Some(thread) = &planned.thread {
        sqlx::query(
            r"
            INSERT INTO module_threads (id, module_id, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(thread.id.to_string())
        .bind(thread.module_id.to_string())
        .bind(thread.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::storage_write(format!("Failed to create module thread: {e}")))?;
    }

    Ok(())
}

/// Convert a database row to a `ClientProgram`
fn row_to_program(row: &SqliteRow) -> AppResult<ClientProgram> {
    let status: String = row.get("status");
    Ok(ClientProgram {
        id: uuid_column(row, "id")?,
        client_id: uuid_column(row, "client_id")?,
        subscription_id: uuid_column(row, "subscription_id")?,
        coach_id: uuid_column(row, "coach_id")?,
        source_template_id: uuid_column(row, "source_template_id")?,
        start_date: date_column(row, "start_date")?,
        status: ClientProgramStatus::parse(&status),
        team_id: optional_uuid_column(row, "team_id")?,
        created_at: datetime_column(row, "created_at")?,
    })
}

/// Convert a database row to a `ClientDayModule`
fn row_to_module(row: &SqliteRow) -> AppResult<ClientDayModule> {
    let provenance: String = row.get("provenance");
    let status: String = row.get("status");
    Ok(ClientDayModule {
        id: uuid_column(row, "id")?,
        day_id: uuid_column(row, "day_id")?,
        provenance: ModuleProvenance::parse(&provenance),
        source_module_id: optional_uuid_column(row, "source_module_id")?,
        owner_id: uuid_column(row, "owner_id")?,
        module_type: discipline_column(row, "module_type")?,
        title: row.get("title"),
        sort_order: row.get("sort_order"),
        status: ClientModuleStatus::parse(&status),
    })
}
