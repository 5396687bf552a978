// ABOUTME: Integration tests for assigning program templates to clients
// ABOUTME: Covers completeness, draft exclusion, dates, snapshots, care-team fusion and rollback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use pierre_programs::{
    database::{
        repositories::{CareTeamRepository, ClientProgramRepository, TemplateRepositoryImpl},
        Database,
    },
    errors::{AppError, AppResult, ErrorCode},
    models::{
        CareTeamAssignment, CareTeamStatus, ClientProgramStatus, ClientProgramView, Discipline,
        ModuleProvenance, Prescription,
    },
    programs::{AssignmentRequest, MaterializationPlan, ProgramAssignmentEngine},
};
use serde_json::json;
use uuid::Uuid;

use common::{
    add_specialist, assignment_request, count_rows, create_test_database, date,
    seed_sample_template, seed_template_with_days, squat_prescription,
};

async fn assign_and_load(
    db: &Database,
    request: &AssignmentRequest,
) -> Result<ClientProgramView> {
    let engine = ProgramAssignmentEngine::from_database(db);
    let program_id = engine.assign_program_to_client(request).await?;
    Ok(db.client_programs().load_program(program_id).await?.unwrap())
}

#[tokio::test]
async fn test_two_day_template_is_materialized() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let request = assignment_request(sample.template_id, coach_id, Uuid::new_v4(), date(2024, 3, 1));

    let outcome = ProgramAssignmentEngine::from_database(&db)
        .assign(&request)
        .await;
    assert!(outcome.success);
    assert!(outcome.error.is_none());
    let program_id = outcome.client_program_id.unwrap();

    let view = db.client_programs().load_program(program_id).await?.unwrap();
    assert_eq!(view.program.client_id, request.client_user_id);
    assert_eq!(view.program.coach_id, coach_id);
    assert_eq!(view.program.subscription_id, request.subscription_id);
    assert_eq!(view.program.source_template_id, sample.template_id);
    assert_eq!(view.program.start_date, date(2024, 3, 1));
    assert_eq!(view.program.status, ClientProgramStatus::Active);
    assert_eq!(view.days.len(), 2);

    let day1 = view.day(1).unwrap();
    assert_eq!(day1.day.date, date(2024, 3, 1));
    assert_eq!(day1.day.title, "Push / Pull");
    assert_eq!(day1.modules.len(), 1);
    assert_eq!(day1.modules[0].module.title, "Upper Body");
    assert_eq!(day1.modules[0].module.provenance, ModuleProvenance::Template);
    assert_eq!(
        day1.modules[0].module.source_module_id,
        Some(sample.upper_body.id)
    );
    assert_eq!(day1.modules[0].module.owner_id, coach_id);
    assert_eq!(day1.modules[0].exercises.len(), 2);
    assert!(day1.modules[0].thread.is_some());

    let day2 = view.day(2).unwrap();
    assert_eq!(day2.day.date, date(2024, 3, 2));
    assert_eq!(day2.modules.len(), 1);
    assert_eq!(day2.modules[0].module.title, "Lower Body");
    assert_eq!(day2.modules[0].exercises.len(), 1);
    assert!(day2.modules[0].thread.is_some());

    Ok(())
}

#[tokio::test]
async fn test_every_published_row_is_copied_once() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let request = assignment_request(sample.template_id, coach_id, Uuid::new_v4(), date(2024, 3, 1));

    let view = assign_and_load(&db, &request).await?;

    assert_eq!(count_rows(&db, "client_programs").await?, 1);
    assert_eq!(count_rows(&db, "client_program_days").await?, 2);
    assert_eq!(count_rows(&db, "client_day_modules").await?, 2);
    assert_eq!(count_rows(&db, "client_module_exercises").await?, 3);
    assert_eq!(count_rows(&db, "module_threads").await?, 2);

    let upper = &view.day(1).unwrap().modules[0];
    let sort_orders: Vec<i32> = upper.exercises.iter().map(|e| e.sort_order).collect();
    assert_eq!(sort_orders, vec![1, 2]);
    assert_eq!(upper.exercises[0].section.as_deref(), Some("main"));
    assert_eq!(
        upper.exercises[0].instructions.as_deref(),
        Some("Pause on the chest")
    );

    Ok(())
}

#[tokio::test]
async fn test_draft_modules_are_never_copied() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let request = assignment_request(sample.template_id, coach_id, Uuid::new_v4(), date(2024, 3, 1));

    let view = assign_and_load(&db, &request).await?;

    let copied_from_draft = view
        .days
        .iter()
        .flat_map(|day| &day.modules)
        .any(|m| m.module.source_module_id == Some(sample.experimental.id));
    assert!(!copied_from_draft);
    assert!(view
        .days
        .iter()
        .flat_map(|day| &day.modules)
        .all(|m| m.module.title != "Experimental"));

    Ok(())
}

#[tokio::test]
async fn test_day_dates_follow_day_index_with_gaps() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let template = seed_template_with_days(&db, coach_id, &[10, 1, 3], Discipline::Running).await?;
    let request = assignment_request(template.id, coach_id, Uuid::new_v4(), date(2024, 2, 28));

    let view = assign_and_load(&db, &request).await?;

    let dates: Vec<_> = view.days.iter().map(|d| (d.day.day_index, d.day.date)).collect();
    assert_eq!(
        dates,
        vec![
            (1, date(2024, 2, 28)),
            (3, date(2024, 3, 1)),
            (10, date(2024, 3, 8)),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_prescription_snapshot_is_isolated_from_later_edits() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let subscription_id = Uuid::new_v4();
    let request = assignment_request(sample.template_id, coach_id, subscription_id, date(2024, 3, 1));

    let first = assign_and_load(&db, &request).await?;

    db.templates()
        .update_prescription(
            sample.squat_slot.id,
            &Prescription {
                sets: Some(10),
                reps_min: Some(1),
                reps_max: Some(1),
                ..Prescription::default()
            },
        )
        .await?;

    let reloaded = db
        .client_programs()
        .load_program(first.program.id)
        .await?
        .unwrap();
    let snapshot = &reloaded.day(2).unwrap().modules[0].exercises[0].prescription_snapshot;
    assert_eq!(*snapshot, serde_json::to_value(squat_prescription())?);
    assert_eq!(snapshot["sets"], json!(4));
    assert_eq!(snapshot["tempo"], json!("3-1-1-0"));

    // A later assignment sees the edited prescription
    let second = assign_and_load(&db, &request).await?;
    let snapshot = &second.day(2).unwrap().modules[0].exercises[0].prescription_snapshot;
    assert_eq!(snapshot["sets"], json!(10));

    Ok(())
}

#[tokio::test]
async fn test_exercise_without_prescription_gets_empty_snapshot() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let request = assignment_request(sample.template_id, coach_id, Uuid::new_v4(), date(2024, 3, 1));

    let view = assign_and_load(&db, &request).await?;

    let row_exercise = &view.day(1).unwrap().modules[0].exercises[1];
    assert_eq!(row_exercise.prescription_snapshot, json!({}));

    Ok(())
}

#[tokio::test]
async fn test_active_specialist_gets_a_session_every_day() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let subscription_id = Uuid::new_v4();
    let nutritionist = Uuid::new_v4();
    add_specialist(
        &db,
        subscription_id,
        nutritionist,
        Discipline::Nutrition,
        CareTeamStatus::Active,
        date(2024, 1, 1),
        None,
    )
    .await?;
    let request = assignment_request(sample.template_id, coach_id, subscription_id, date(2024, 3, 1));

    let view = assign_and_load(&db, &request).await?;

    for day in &view.days {
        assert_eq!(day.modules.len(), 2);
        let template_max = day
            .modules
            .iter()
            .filter(|m| m.module.provenance == ModuleProvenance::Template)
            .map(|m| m.module.sort_order)
            .max()
            .unwrap();
        let session = day
            .modules
            .iter()
            .find(|m| m.module.provenance == ModuleProvenance::CareTeam)
            .unwrap();
        assert_eq!(session.module.owner_id, nutritionist);
        assert_eq!(session.module.module_type, Discipline::Nutrition);
        assert_eq!(session.module.title, "Nutrition Session");
        assert_eq!(session.module.source_module_id, None);
        assert!(session.module.sort_order > template_max);
        assert!(session.exercises.is_empty());
        assert!(session.thread.is_none());
    }

    Ok(())
}

#[tokio::test]
async fn test_specialist_already_covered_by_template_is_not_duplicated() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let subscription_id = Uuid::new_v4();
    // The coach is also on the care team for the discipline the template covers
    add_specialist(
        &db,
        subscription_id,
        coach_id,
        Discipline::Strength,
        CareTeamStatus::Active,
        date(2024, 1, 1),
        None,
    )
    .await?;
    // Same specialist listed twice for the same specialty
    let physio = Uuid::new_v4();
    for from in [date(2024, 1, 1), date(2024, 2, 1)] {
        add_specialist(
            &db,
            subscription_id,
            physio,
            Discipline::Physiotherapy,
            CareTeamStatus::Active,
            from,
            None,
        )
        .await?;
    }
    let request = assignment_request(sample.template_id, coach_id, subscription_id, date(2024, 3, 1));

    let view = assign_and_load(&db, &request).await?;

    for day in &view.days {
        let care_team: Vec<_> = day
            .modules
            .iter()
            .filter(|m| m.module.provenance == ModuleProvenance::CareTeam)
            .collect();
        assert_eq!(care_team.len(), 1);
        assert_eq!(care_team[0].module.owner_id, physio);
        assert_eq!(care_team[0].module.module_type, Discipline::Physiotherapy);
    }

    Ok(())
}

#[tokio::test]
async fn test_other_specialist_with_template_discipline_still_gets_a_session() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let subscription_id = Uuid::new_v4();
    let strength_specialist = Uuid::new_v4();
    add_specialist(
        &db,
        subscription_id,
        strength_specialist,
        Discipline::Strength,
        CareTeamStatus::Active,
        date(2024, 1, 1),
        None,
    )
    .await?;
    let request = assignment_request(sample.template_id, coach_id, subscription_id, date(2024, 3, 1));

    let view = assign_and_load(&db, &request).await?;

    let day1 = view.day(1).unwrap();
    assert_eq!(day1.modules.len(), 2);
    assert_eq!(day1.modules[1].module.owner_id, strength_specialist);
    assert_eq!(day1.modules[1].module.title, "Strength Session");

    Ok(())
}

#[tokio::test]
async fn test_care_team_window_is_inclusive() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let template = seed_template_with_days(&db, coach_id, &[1, 2, 3], Discipline::Strength).await?;
    let subscription_id = Uuid::new_v4();
    let yoga = Uuid::new_v4();
    let mindset = Uuid::new_v4();
    // Single-day window on day 2
    add_specialist(
        &db,
        subscription_id,
        yoga,
        Discipline::Yoga,
        CareTeamStatus::ScheduledEnd,
        date(2024, 3, 2),
        Some(date(2024, 3, 2)),
    )
    .await?;
    // Starts on day 3
    add_specialist(
        &db,
        subscription_id,
        mindset,
        Discipline::Mindset,
        CareTeamStatus::Active,
        date(2024, 3, 3),
        None,
    )
    .await?;
    let request = assignment_request(template.id, coach_id, subscription_id, date(2024, 3, 1));

    let view = assign_and_load(&db, &request).await?;

    let owners = |index: i32| -> Vec<Uuid> {
        view.day(index)
            .unwrap()
            .modules
            .iter()
            .filter(|m| m.module.provenance == ModuleProvenance::CareTeam)
            .map(|m| m.module.owner_id)
            .collect()
    };
    assert!(owners(1).is_empty());
    assert_eq!(owners(2), vec![yoga]);
    assert_eq!(owners(3), vec![mindset]);

    Ok(())
}

#[tokio::test]
async fn test_revoked_and_expired_specialists_are_ignored() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let subscription_id = Uuid::new_v4();
    add_specialist(
        &db,
        subscription_id,
        Uuid::new_v4(),
        Discipline::Nutrition,
        CareTeamStatus::Revoked,
        date(2024, 1, 1),
        None,
    )
    .await?;
    let expiring = add_specialist(
        &db,
        subscription_id,
        Uuid::new_v4(),
        Discipline::Recovery,
        CareTeamStatus::Active,
        date(2024, 1, 1),
        None,
    )
    .await?;
    db.care_team()
        .update_status(expiring.id, CareTeamStatus::Expired)
        .await?;
    let request = assignment_request(sample.template_id, coach_id, subscription_id, date(2024, 3, 1));

    let view = assign_and_load(&db, &request).await?;

    assert!(view
        .days
        .iter()
        .flat_map(|day| &day.modules)
        .all(|m| m.module.provenance == ModuleProvenance::Template));

    Ok(())
}

#[tokio::test]
async fn test_synthesized_sort_order_is_deterministic() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let template = seed_template_with_days(&db, coach_id, &[1], Discipline::Strength).await?;
    let subscription_id = Uuid::new_v4();
    let first = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001);
    let second = Uuid::from_u128(0xffff_ffff_ffff_4fff_bfff_ffff_ffff_fffe);
    // Inserted in reverse order of the expected roster order
    add_specialist(
        &db,
        subscription_id,
        second,
        Discipline::Nutrition,
        CareTeamStatus::Active,
        date(2024, 1, 1),
        None,
    )
    .await?;
    add_specialist(
        &db,
        subscription_id,
        first,
        Discipline::Physiotherapy,
        CareTeamStatus::Active,
        date(2024, 1, 1),
        None,
    )
    .await?;
    let request = assignment_request(template.id, coach_id, subscription_id, date(2024, 3, 1));

    for _ in 0..2 {
        let view = assign_and_load(&db, &request).await?;
        let modules: Vec<(Uuid, i32)> = view.days[0]
            .modules
            .iter()
            .map(|m| (m.module.owner_id, m.module.sort_order))
            .collect();
        assert_eq!(modules, vec![(coach_id, 1), (first, 2), (second, 3)]);
    }

    Ok(())
}

#[tokio::test]
async fn test_team_id_is_recorded() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let team_id = Uuid::new_v4();
    let mut request =
        assignment_request(sample.template_id, coach_id, Uuid::new_v4(), date(2024, 3, 1));
    request.team_id = Some(team_id);

    let view = assign_and_load(&db, &request).await?;
    assert_eq!(view.program.team_id, Some(team_id));

    let listed = db
        .client_programs()
        .list_programs_for_client(request.client_user_id)
        .await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].team_id, Some(team_id));

    Ok(())
}

#[tokio::test]
async fn test_template_without_days_creates_empty_program() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let template = db
        .templates()
        .create_template(coach_id, "Empty", None)
        .await?;
    let request = assignment_request(template.id, coach_id, Uuid::new_v4(), date(2024, 3, 1));

    let view = assign_and_load(&db, &request).await?;
    assert!(view.days.is_empty());
    assert_eq!(count_rows(&db, "client_programs").await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_missing_template_fails_without_writing() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let missing = Uuid::new_v4();
    let request = assignment_request(missing, coach_id, Uuid::new_v4(), date(2024, 3, 1));
    let engine = ProgramAssignmentEngine::from_database(&db);

    let err = engine.assign_program_to_client(&request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let outcome = engine.assign(&request).await;
    assert!(!outcome.success);
    assert!(outcome.client_program_id.is_none());
    assert_eq!(
        outcome.error.as_deref(),
        Some(format!("Program template {missing} not found").as_str())
    );
    assert_eq!(count_rows(&db, "client_programs").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_outcome_serializes_in_camel_case() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let request = assignment_request(sample.template_id, coach_id, Uuid::new_v4(), date(2024, 3, 1));
    let engine = ProgramAssignmentEngine::from_database(&db);

    let outcome = engine.assign(&request).await;
    let value = serde_json::to_value(&outcome)?;
    assert_eq!(value["success"], json!(true));
    assert_eq!(
        value["clientProgramId"],
        json!(outcome.client_program_id.unwrap().to_string())
    );
    assert!(value.get("error").is_none());

    request_missing_template_shape(&engine).await
}

async fn request_missing_template_shape(engine: &ProgramAssignmentEngine) -> Result<()> {
    let request = assignment_request(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), date(2024, 3, 1));
    let value = serde_json::to_value(engine.assign(&request).await)?;
    assert_eq!(value["success"], json!(false));
    assert!(value.get("clientProgramId").is_none());
    assert!(value["error"].as_str().unwrap().contains("not found"));
    Ok(())
}

#[tokio::test]
async fn test_write_failure_rolls_back_whole_program() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let request = assignment_request(sample.template_id, coach_id, Uuid::new_v4(), date(2024, 3, 1));

    // Thread inserts happen after program, day, module and exercise inserts
    sqlx::query("DROP TABLE module_threads")
        .execute(db.pool())
        .await?;

    let engine = ProgramAssignmentEngine::from_database(&db);
    let err = engine.assign_program_to_client(&request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageWrite);

    assert_eq!(count_rows(&db, "client_programs").await?, 0);
    assert_eq!(count_rows(&db, "client_program_days").await?, 0);
    assert_eq!(count_rows(&db, "client_day_modules").await?, 0);
    assert_eq!(count_rows(&db, "client_module_exercises").await?, 0);

    // Once storage recovers the same request succeeds with a complete program
    sqlx::query(
        r"
        CREATE TABLE module_threads (
            id TEXT PRIMARY KEY,
            module_id TEXT NOT NULL UNIQUE REFERENCES client_day_modules(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        )
        ",
    )
    .execute(db.pool())
    .await?;

    let outcome = engine.assign(&request).await;
    assert!(outcome.success);
    assert_eq!(count_rows(&db, "client_programs").await?, 1);
    assert_eq!(count_rows(&db, "client_day_modules").await?, 2);
    assert_eq!(count_rows(&db, "module_threads").await?, 2);

    Ok(())
}

struct FailingCareTeam;

#[async_trait]
impl CareTeamRepository for FailingCareTeam {
    async fn list_participating(&self, _subscription_id: Uuid) -> AppResult<Vec<CareTeamAssignment>> {
        Err(AppError::storage_read("Failed to load care-team roster: connection reset"))
    }
}

#[derive(Default)]
struct RecordingPrograms {
    persisted: AtomicUsize,
}

#[async_trait]
impl ClientProgramRepository for RecordingPrograms {
    async fn persist_plan(&self, plan: &MaterializationPlan) -> AppResult<Uuid> {
        self.persisted.fetch_add(1, Ordering::SeqCst);
        Ok(plan.program.id)
    }

    async fn load_program(&self, _program_id: Uuid) -> AppResult<Option<ClientProgramView>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_roster_read_failure_stops_before_any_write() -> Result<()> {
    let db = create_test_database().await?;
    let coach_id = Uuid::new_v4();
    let sample = seed_sample_template(&db, coach_id).await?;
    let programs = Arc::new(RecordingPrograms::default());
    let engine = ProgramAssignmentEngine::new(
        Arc::new(TemplateRepositoryImpl::new(&db)),
        Arc::new(FailingCareTeam),
        programs.clone(),
    );
    let request = assignment_request(sample.template_id, coach_id, Uuid::new_v4(), date(2024, 3, 1));

    let err = engine.assign_program_to_client(&request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageRead);
    assert_eq!(programs.persisted.load(Ordering::SeqCst), 0);

    let outcome = engine.assign(&request).await;
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("care-team roster"));

    Ok(())
}
