// ABOUTME: Database operations for program template authoring and hierarchy loading
// ABOUTME: Exercise library, template days/modules/exercises and prescription edits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::rows::{
    datetime_column, discipline_column, optional_json_column, optional_u32_column, uuid_column,
};
use super::transactions::SqliteTransactionGuard;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Discipline, Exercise, ModuleStatus, Prescription, ProgramTemplate, TemplateDay,
    TemplateExercise, TemplateModule,
};

/// Request to add an exercise slot to a template module
#[derive(Debug, Clone, Default)]
pub struct CreateTemplateExerciseRequest {
    /// Library exercise
    pub exercise_id: Uuid,
    /// Section tag
    pub section: Option<String>,
    /// Position within the module
    pub sort_order: i32,
    /// Coaching instructions
    pub instructions: Option<String>,
    /// Optional prescription
    pub prescription: Option<Prescription>,
}

/// Program template database operations manager
pub struct ProgramTemplatesManager {
    pool: SqlitePool,
}

impl ProgramTemplatesManager {
    /// Create a new template manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add an exercise to the shared library
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create_exercise(
        &self,
        name: &str,
        discipline: Option<Discipline>,
    ) -> AppResult<Exercise> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO exercises (id, name, discipline, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(id.to_string())
        .bind(name)
        .bind(discipline.map(|d| d.as_str()))
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage_write(format!("Failed to create exercise: {e}")))?;

        Ok(Exercise {
            id,
            name: name.to_owned(),
            discipline,
            created_at: now,
        })
    }

    /// Get a library exercise by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_exercise(&self, exercise_id: Uuid) -> AppResult<Option<Exercise>> {
        let row = sqlx::query("SELECT id, name, discipline, created_at FROM exercises WHERE id = $1")
            .bind(exercise_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::storage_read(format!("Failed to get exercise: {e}")))?;

        row.map(|r| {
            let discipline: Option<String> = r.get("discipline");
            Ok(Exercise {
                id: uuid_column(&r, "id")?,
                name: r.get("name"),
                discipline: discipline.map(|d| d.parse::<Discipline>()).transpose()?,
                created_at: datetime_column(&r, "created_at")?,
            })
        })
        .transpose()
    }

    /// Create an empty template owned by a coach
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create_template(
        &self,
        coach_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<ProgramTemplate> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO program_templates (id, coach_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ",
        )
        .bind(id.to_string())
        .bind(coach_id.to_string())
        .bind(name)
        .bind(description)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage_write(format!("Failed to create program template: {e}")))?;

        Ok(ProgramTemplate {
            id,
            coach_id,
            name: name.to_owned(),
            description: description.map(ToOwned::to_owned),
            created_at: now,
            days: Vec::new(),
        })
    }

    /// Add a day to a template
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `day_index` is below 1
    /// - The template already has a day with this index
    /// - Database operation fails
    pub async fn add_day(
        &self,
        template_id: Uuid,
        day_index: i32,
        title: &str,
    ) -> AppResult<TemplateDay> {
        if day_index < 1 {
            return Err(AppError::invalid_input(format!(
                "Template day index must be 1 or greater, got {day_index}"
            )));
        }

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT id FROM template_days WHERE template_id = $1 AND day_index = $2",
        )
        .bind(template_id.to_string())
        .bind(day_index)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to check template day: {e}")))?;

        if existing.is_some() {
            return Err(AppError::invalid_input(format!(
                "Template {template_id} already has day {day_index}"
            )));
        }

        let id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO template_days (id, template_id, day_index, title)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(id.to_string())
        .bind(template_id.to_string())
        .bind(day_index)
        .bind(title)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage_write(format!("Failed to create template day: {e}")))?;

        Ok(TemplateDay {
            id,
            template_id,
            day_index,
            title: title.to_owned(),
            modules: Vec::new(),
        })
    }

    /// Add a module to a template day
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn add_module(
        &self,
        day_id: Uuid,
        coach_id: Uuid,
        module_type: Discipline,
        title: &str,
        sort_order: i32,
        status: ModuleStatus,
    ) -> AppResult<TemplateModule> {
        let now = Utc::now().to_rfc3339();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO template_modules (
                id, day_id, coach_id, module_type, title, sort_order, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ",
        )
        .bind(id.to_string())
        .bind(day_id.to_string())
        .bind(coach_id.to_string())
        .bind(module_type.as_str())
        .bind(title)
        .bind(sort_order)
        .bind(status.as_str())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage_write(format!("Failed to create template module: {e}")))?;

        Ok(TemplateModule {
            id,
            day_id,
            coach_id,
            module_type,
            title: title.to_owned(),
            sort_order,
            status,
        })
    }

    /// Publish or unpublish a module
    ///
    /// # Errors
    ///
    /// Returns an error if the module does not exist or database operation fails
    pub async fn set_module_status(&self, module_id: Uuid, status: ModuleStatus) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE template_modules SET status = $1, updated_at = $2 WHERE id = $3",
        )
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(module_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage_write(format!("Failed to update module status: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Template module {module_id}")));
        }
        Ok(())
    }

    /// Add an exercise slot (and its prescription) to a module
    ///
    /// Uses a transaction so an exercise never exists with a half-written
    /// prescription.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or data serialization fails
    pub async fn add_exercise(
        &self,
        module_id: Uuid,
        request: &CreateTemplateExerciseRequest,
    ) -> AppResult<TemplateExercise> {
        let id = Uuid::new_v4();

        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::storage_write(format!("Failed to begin transaction: {e}")))?;
        let mut guard = SqliteTransactionGuard::new(tx);

        sqlx::query(
            r"
            INSERT INTO template_exercises (
                id, module_id, exercise_id, section, sort_order, instructions
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id.to_string())
        .bind(module_id.to_string())
        .bind(request.exercise_id.to_string())
        .bind(&request.section)
        .bind(request.sort_order)
        .bind(&request.instructions)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::storage_write(format!("Failed to create template exercise: {e}")))?;

        if let Some(prescription) = &request.prescription {
            upsert_prescription(guard.executor()?, id, prescription).await?;
        }

        guard.commit().await?;

        Ok(TemplateExercise {
            id,
            module_id,
            exercise_id: request.exercise_id,
            section: request.section.clone(),
            sort_order: request.sort_order,
            instructions: request.instructions.clone(),
            prescription: request.prescription.clone(),
        })
    }

    /// Replace the prescription of a template exercise
    ///
    /// Already-assigned client programs keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the exercise does not exist or database operation fails
    pub async fn update_prescription(
        &self,
        template_exercise_id: Uuid,
        prescription: &Prescription,
    ) -> AppResult<()> {
        let exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM template_exercises WHERE id = $1")
                .bind(template_exercise_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::storage_read(format!("Failed to get template exercise: {e}"))
                })?;

        if exists.is_none() {
            return Err(AppError::not_found(format!(
                "Template exercise {template_exercise_id}"
            )));
        }

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::storage_write(format!("Failed to acquire connection: {e}")))?;
        upsert_prescription(&mut *conn, template_exercise_id, prescription).await
    }

    /// Load a template with its days and modules, without exercises
    ///
    /// Days are ordered by `day_index`, modules by `sort_order`.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a row is corrupt
    pub async fn load_hierarchy(&self, template_id: Uuid) -> AppResult<Option<ProgramTemplate>> {
        let Some(row) = sqlx::query(
            r"
            SELECT id, coach_id, name, description, created_at
            FROM program_templates
            WHERE id = $1
            ",
        )
        .bind(template_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to get program template: {e}")))?
        else {
            return Ok(None);
        };

        let mut template = ProgramTemplate {
            id: uuid_column(&row, "id")?,
            coach_id: uuid_column(&row, "coach_id")?,
            name: row.get("name"),
            description: row.get("description"),
            created_at: datetime_column(&row, "created_at")?,
            days: Vec::new(),
        };

        let day_rows = sqlx::query(
            r"
            SELECT id, template_id, day_index, title
            FROM template_days
            WHERE template_id = $1
            ORDER BY day_index ASC
            ",
        )
        .bind(template_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to list template days: {e}")))?;

        let module_rows = sqlx::query(
            r"
            SELECT m.id, m.day_id, m.coach_id, m.module_type, m.title, m.sort_order, m.status
            FROM template_modules m
            JOIN template_days d ON d.id = m.day_id
            WHERE d.template_id = $1
            ORDER BY m.sort_order ASC, m.created_at ASC
            ",
        )
        .bind(template_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to list template modules: {e}")))?;

        let mut modules_by_day: BTreeMap<Uuid, Vec<TemplateModule>> = BTreeMap::new();
        for module_row in &module_rows {
            let module = row_to_template_module(module_row)?;
            modules_by_day.entry(module.day_id).or_default().push(module);
        }

        for day_row in &day_rows {
            let id = uuid_column(day_row, "id")?;
            template.days.push(TemplateDay {
                id,
                template_id: uuid_column(day_row, "template_id")?,
                day_index: day_row.get("day_index"),
                title: day_row.get("title"),
                modules: modules_by_day.remove(&id).unwrap_or_default(),
            });
        }

        Ok(Some(template))
    }

    /// List a module's exercises with their prescriptions, ordered by `sort_order`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails or a row is corrupt
    pub async fn list_module_exercises(&self, module_id: Uuid) -> AppResult<Vec<TemplateExercise>> {
        let rows = sqlx::query(
            r"
            SELECT e.id, e.module_id, e.exercise_id, e.section, e.sort_order, e.instructions,
                   p.id AS prescription_id, p.sets, p.reps_min, p.reps_max, p.tempo,
                   p.rest_seconds, p.intensity_type, p.intensity_value, p.warmup_sets,
                   p.custom_fields, p.progression_notes, p.set_plan,
                   p.linear_progression_enabled, p.linear_progression_config
            FROM template_exercises e
            LEFT JOIN exercise_prescriptions p ON p.template_exercise_id = e.id
            WHERE e.module_id = $1
            ORDER BY e.sort_order ASC
            ",
        )
        .bind(module_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage_read(format!("Failed to list module exercises: {e}")))?;

        rows.iter().map(row_to_template_exercise).collect()
    }
}

/// Insert or replace the prescription of one template exercise
async fn upsert_prescription(
    conn: &mut SqliteConnection,
    template_exercise_id: Uuid,
    prescription: &Prescription,
) -> AppResult<()> {
    let warmup_sets = prescription
        .warmup_sets
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let custom_fields = prescription
        .custom_fields
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let set_plan = prescription
        .set_plan
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let linear_progression_config = prescription
        .linear_progression_config
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    sqlx::query(
        r"
        INSERT INTO exercise_prescriptions (
            id, template_exercise_id, sets, reps_min, reps_max, tempo, rest_seconds,
            intensity_type, intensity_value, warmup_sets, custom_fields, progression_notes,
            set_plan, linear_progression_enabled, linear_progression_config, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        ON CONFLICT (template_exercise_id) DO UPDATE SET
            sets = excluded.sets,
            reps_min = excluded.reps_min,
            reps_max = excluded.reps_max,
            tempo = excluded.tempo,
            rest_seconds = excluded.rest_seconds,
            intensity_type = excluded.intensity_type,
            intensity_value = excluded.intensity_value,
            warmup_sets = excluded.warmup_sets,
            custom_fields = excluded.custom_fields,
            progression_notes = excluded.progression_notes,
            set_plan = excluded.set_plan,
            linear_progression_enabled = excluded.linear_progression_enabled,
            linear_progression_config = excluded.linear_progression_config,
            updated_at = excluded.updated_at
        ",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(template_exercise_id.to_string())
    .bind(prescription.sets.map(i64::from))
    .bind(prescription.reps_min.map(i64::from))
    .bind(prescription.reps_max.map(i64::from))
    .bind(&prescription.tempo)
    .bind(prescription.rest_seconds.map(i64::from))
    .bind(&prescription.intensity_type)
    .bind(prescription.intensity_value)
    .bind(warmup_sets)
    .bind(custom_fields)
    .bind(&prescription.progression_notes)
    .bind(set_plan)
    .bind(prescription.linear_progression_enabled)
    .bind(linear_progression_config)
    .bind(Utc::now().to_rfc3339())
    .execute(conn)
    .await
    .map_err(|e| AppError::storage_write(format!("Failed to save prescription: {e}")))?;

    Ok(())
}

/// Convert a database row to a `TemplateModule`
fn row_to_template_module(row: &SqliteRow) -> AppResult<TemplateModule> {
    let status: String = row.get("status");
    Ok(TemplateModule {
        id: uuid_column(row, "id")?,
        day_id: uuid_column(row, "day_id")?,
        coach_id: uuid_column(row, "coach_id")?,
        module_type: discipline_column(row, "module_type")?,
        title: row.get("title"),
        sort_order: row.get("sort_order"),
        status: ModuleStatus::parse(&status),
    })
}

/// Convert a joined exercise/prescription row to a `TemplateExercise`
fn row_to_template_exercise(row: &SqliteRow) -> AppResult<TemplateExercise> {
    let prescription_id: Option<String> = row.get("prescription_id");
    let prescription = match prescription_id {
        Some(_) => {
            let linear_progression_enabled: Option<i64> = row.get("linear_progression_enabled");
            Some(Prescription {
                sets: optional_u32_column(row, "sets")?,
                reps_min: optional_u32_column(row, "reps_min")?,
                reps_max: optional_u32_column(row, "reps_max")?,
                tempo: row.get("tempo"),
                rest_seconds: optional_u32_column(row, "rest_seconds")?,
                intensity_type: row.get("intensity_type"),
                intensity_value: row.get("intensity_value"),
                warmup_sets: optional_json_column(row, "warmup_sets")?,
                custom_fields: optional_json_column(row, "custom_fields")?,
                progression_notes: row.get("progression_notes"),
                set_plan: optional_json_column(row, "set_plan")?,
                linear_progression_enabled: linear_progression_enabled == Some(1),
                linear_progression_config: optional_json_column(row, "linear_progression_config")?,
            })
        }
        None => None,
    };

    Ok(TemplateExercise {
        id: uuid_column(row, "id")?,
        module_id: uuid_column(row, "module_id")?,
        exercise_id: uuid_column(row, "exercise_id")?,
        section: row.get("section"),
        sort_order: row.get("sort_order"),
        instructions: row.get("instructions"),
        prescription,
    })
}
