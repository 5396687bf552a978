// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, template and care-team fixtures, assignment requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::too_many_arguments
)]
//! Shared test utilities for `pierre_programs`

use anyhow::Result;
use chrono::NaiveDate;
use pierre_programs::{
    database::{CreateCareTeamAssignmentRequest, CreateTemplateExerciseRequest, Database},
    models::{
        CareTeamAssignment, CareTeamStatus, Discipline, ModuleStatus, Prescription,
        ProgramTemplate, TemplateExercise, TemplateModule,
    },
    programs::AssignmentRequest,
};
use serde_json::json;
use uuid::Uuid;

/// Fresh migrated in-memory database
pub async fn create_test_database() -> Result<Database> {
    Ok(Database::new("sqlite::memory:", 1).await?)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Prescription used for the squat slot of the sample template
pub fn squat_prescription() -> Prescription {
    Prescription {
        sets: Some(4),
        reps_min: Some(6),
        reps_max: Some(8),
        tempo: Some("3-1-1-0".to_owned()),
        rest_seconds: Some(120),
        intensity_type: Some("rpe".to_owned()),
        intensity_value: Some(8.0),
        warmup_sets: Some(json!([{ "reps": 10, "percent": 40 }])),
        progression_notes: Some("Add 2.5kg when all sets hit 8".to_owned()),
        linear_progression_enabled: true,
        linear_progression_config: Some(json!({ "increment_kg": 2.5 })),
        ..Prescription::default()
    }
}

/// Ids of the two-day sample template
pub struct SampleTemplate {
    pub template_id: Uuid,
    pub coach_id: Uuid,
    /// Day 1 published strength module
    pub upper_body: TemplateModule,
    /// Day 1 draft module that must never be copied
    pub experimental: TemplateModule,
    /// Day 2 published strength module
    pub lower_body: TemplateModule,
    /// Exercise slot in "Lower Body" carrying `squat_prescription`
    pub squat_slot: TemplateExercise,
}

/// Two-day template:
/// - day 1: "Upper Body" (published, 2 exercises) and "Experimental" (draft)
/// - day 2: "Lower Body" (published, 1 exercise with a prescription)
pub async fn seed_sample_template(db: &Database, coach_id: Uuid) -> Result<SampleTemplate> {
    let templates = db.templates();

    let bench = templates
        .create_exercise("Bench Press", Some(Discipline::Strength))
        .await?;
    let row = templates
        .create_exercise("Seated Row", Some(Discipline::Strength))
        .await?;
    let squat = templates
        .create_exercise("Back Squat", Some(Discipline::Strength))
        .await?;

    let template = templates
        .create_template(coach_id, "Hypertrophy Block", Some("Four week base"))
        .await?;
    let day1 = templates.add_day(template.id, 1, "Push / Pull").await?;
    let day2 = templates.add_day(template.id, 2, "Legs").await?;

    let upper_body = templates
        .add_module(
            day1.id,
            coach_id,
            Discipline::Strength,
            "Upper Body",
            1,
            ModuleStatus::Published,
        )
        .await?;
    let experimental = templates
        .add_module(
            day1.id,
            coach_id,
            Discipline::Conditioning,
            "Experimental",
            2,
            ModuleStatus::Draft,
        )
        .await?;
    let lower_body = templates
        .add_module(
            day2.id,
            coach_id,
            Discipline::Strength,
            "Lower Body",
            1,
            ModuleStatus::Published,
        )
        .await?;

    templates
        .add_exercise(
            upper_body.id,
            &CreateTemplateExerciseRequest {
                exercise_id: bench.id,
                section: Some("main".to_owned()),
                sort_order: 1,
                instructions: Some("Pause on the chest".to_owned()),
                prescription: Some(Prescription {
                    sets: Some(3),
                    reps_min: Some(8),
                    reps_max: Some(10),
                    ..Prescription::default()
                }),
            },
        )
        .await?;
    templates
        .add_exercise(
            upper_body.id,
            &CreateTemplateExerciseRequest {
                exercise_id: row.id,
                section: Some("main".to_owned()),
                sort_order: 2,
                ..CreateTemplateExerciseRequest::default()
            },
        )
        .await?;
    templates
        .add_exercise(
            experimental.id,
            &CreateTemplateExerciseRequest {
                exercise_id: squat.id,
                sort_order: 1,
                ..CreateTemplateExerciseRequest::default()
            },
        )
        .await?;
    let squat_slot = templates
        .add_exercise(
            lower_body.id,
            &CreateTemplateExerciseRequest {
                exercise_id: squat.id,
                section: Some("main".to_owned()),
                sort_order: 1,
                instructions: None,
                prescription: Some(squat_prescription()),
            },
        )
        .await?;

    Ok(SampleTemplate {
        template_id: template.id,
        coach_id,
        upper_body,
        experimental,
        lower_body,
        squat_slot,
    })
}

/// Template with a single published module per listed day index
pub async fn seed_template_with_days(
    db: &Database,
    coach_id: Uuid,
    day_indices: &[i32],
    module_type: Discipline,
) -> Result<ProgramTemplate> {
    let templates = db.templates();
    let template = templates
        .create_template(coach_id, "Generated", None)
        .await?;
    for index in day_indices {
        let day = templates
            .add_day(template.id, *index, &format!("Day {index}"))
            .await?;
        templates
            .add_module(
                day.id,
                coach_id,
                module_type,
                &format!("Session {index}"),
                1,
                ModuleStatus::Published,
            )
            .await?;
    }
    Ok(templates.load_hierarchy(template.id).await?.unwrap())
}

pub async fn add_specialist(
    db: &Database,
    subscription_id: Uuid,
    specialist_id: Uuid,
    specialty: Discipline,
    status: CareTeamStatus,
    active_from: NaiveDate,
    active_until: Option<NaiveDate>,
) -> Result<CareTeamAssignment> {
    Ok(db
        .care_team()
        .create_assignment(&CreateCareTeamAssignmentRequest {
            subscription_id,
            specialist_id,
            specialty,
            status,
            active_from,
            active_until,
        })
        .await?)
}

pub fn assignment_request(
    template_id: Uuid,
    coach_id: Uuid,
    subscription_id: Uuid,
    start_date: NaiveDate,
) -> AssignmentRequest {
    AssignmentRequest {
        coach_user_id: coach_id,
        client_user_id: Uuid::new_v4(),
        subscription_id,
        program_template_id: template_id,
        start_date,
        team_id: None,
    }
}

pub async fn count_rows(db: &Database, table: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await?;
    Ok(count)
}
