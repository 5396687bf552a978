// ABOUTME: Pure materialization planner turning a template plus care-team roster into client rows
// ABOUTME: Computes day dates, filters drafts, snapshots prescriptions and fuses specialist sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Program Materialization Planner
//!
//! Everything the instantiation engine decides happens here, without I/O:
//!
//! 1. Days are walked in ascending `day_index` and dated
//!    `start_date + (day_index - 1)`.
//! 2. Published modules are copied in their stored sort order; drafts are
//!    dropped. Each copy gets its exercises (with a by-value prescription
//!    snapshot) and a communication thread.
//! 3. Every roster assignment whose inclusive window covers the day's date
//!    gets a synthesized module, unless that (owner, discipline) pair already
//!    has a module on the day. Synthesized modules are ordered after all
//!    template modules.
//!
//! The resulting [`MaterializationPlan`] is persisted atomically by the
//! client program store.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{
    CareTeamAssignment, ClientDayModule, ClientModuleExercise, ClientModuleStatus, ClientProgram,
    ClientProgramDay, ClientProgramStatus, Discipline, ModuleProvenance, ModuleThread,
    Prescription, ProgramTemplate, TemplateDay, TemplateExercise, TemplateModule,
};

/// Parameters of one "assign this template to this client" action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRequest {
    /// Primary coach performing the assignment
    pub coach_user_id: Uuid,
    /// Client receiving the program
    pub client_user_id: Uuid,
    /// Client subscription (also keys the care-team roster)
    pub subscription_id: Uuid,
    /// Template to copy
    pub program_template_id: Uuid,
    /// Calendar date of day 1
    pub start_date: NaiveDate,
    /// Team cohort tag
    pub team_id: Option<Uuid>,
}

/// A module to be written, with its children
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedModule {
    /// Module row
    pub module: ClientDayModule,
    /// Exercise rows (template-derived modules only)
    pub exercises: Vec<ClientModuleExercise>,
    /// Thread row (template-derived modules only)
    pub thread: Option<ModuleThread>,
}

/// A day to be written, with its modules
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDay {
    /// Day row
    pub day: ClientProgramDay,
    /// Modules in sort order
    pub modules: Vec<PlannedModule>,
}

/// Every row one assignment creates, in parent-before-child order
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializationPlan {
    /// Program root row
    pub program: ClientProgram,
    /// Days in ascending `day_index`
    pub days: Vec<PlannedDay>,
}

impl MaterializationPlan {
    /// Number of day rows
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Number of modules with the given provenance
    #[must_use]
    pub fn module_count(&self, provenance: ModuleProvenance) -> usize {
        self.modules()
            .filter(|planned| planned.module.provenance == provenance)
            .count()
    }

    /// Number of exercise rows
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.modules().map(|planned| planned.exercises.len()).sum()
    }

    /// Number of thread rows
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.modules().filter(|planned| planned.thread.is_some()).count()
    }

    fn modules(&self) -> impl Iterator<Item = &PlannedModule> {
        self.days.iter().flat_map(|day| &day.modules)
    }
}

/// Calendar date of a template day: `start_date + (day_index - 1)` days
///
/// # Errors
///
/// Returns an error if `day_index` is below 1 or the date overflows the calendar
pub fn day_date(start_date: NaiveDate, day_index: i32) -> AppResult<NaiveDate> {
    let offset = u64::try_from(i64::from(day_index) - 1).map_err(|_| {
        AppError::invalid_input(format!(
            "Template day index must be 1 or greater, got {day_index}"
        ))
    })?;
    start_date.checked_add_days(Days::new(offset)).ok_or_else(|| {
        AppError::invalid_input(format!(
            "Day {day_index} starting {start_date} is outside the supported calendar"
        ))
    })
}

/// Point-in-time copy of a prescription, `{}` when the exercise has none
///
/// # Errors
///
/// Returns an error if the prescription cannot be serialized
pub fn prescription_snapshot(prescription: Option<&Prescription>) -> AppResult<Value> {
    prescription.map_or_else(
        || Ok(Value::Object(Map::new())),
        |p| serde_json::to_value(p).map_err(AppError::from),
    )
}

/// Title given to a module synthesized for a care-team specialist
#[must_use]
pub fn care_team_module_title(specialty: Discipline) -> String {
    format!("{} Session", specialty.display_name())
}

/// Participating assignments in deterministic roster order
///
/// Statuses other than `active`/`scheduled_end` are dropped even if the
/// caller passed them in.
#[must_use]
pub fn ordered_roster(roster: &[CareTeamAssignment]) -> Vec<&CareTeamAssignment> {
    let mut participating: Vec<&CareTeamAssignment> = roster
        .iter()
        .filter(|assignment| assignment.status.participates())
        .collect();
    participating.sort_by_key(|a| (a.specialist_id, a.specialty, a.active_from, a.id));
    participating
}

/// Build the full materialization plan for one assignment
///
/// `exercises` maps template module id to that module's exercises; modules
/// missing from the map are copied without exercises.
///
/// # Errors
///
/// Returns an error if a day index is invalid or a prescription cannot be
/// serialized
pub fn build_plan(
    request: &AssignmentRequest,
    template: &ProgramTemplate,
    exercises: &HashMap<Uuid, Vec<TemplateExercise>>,
    roster: &[CareTeamAssignment],
    now: DateTime<Utc>,
) -> AppResult<MaterializationPlan> {
    let program = ClientProgram {
        id: Uuid::new_v4(),
        client_id: request.client_user_id,
        subscription_id: request.subscription_id,
        coach_id: request.coach_user_id,
        source_template_id: template.id,
        start_date: request.start_date,
        status: ClientProgramStatus::Active,
        team_id: request.team_id,
        created_at: now,
    };

    let roster = ordered_roster(roster);

    let mut template_days: Vec<&TemplateDay> = template.days.iter().collect();
    template_days.sort_by_key(|day| day.day_index);

    let days = template_days
        .into_iter()
        .map(|day| plan_day(&program, day, exercises, &roster, now))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(MaterializationPlan { program, days })
}

fn plan_day(
    program: &ClientProgram,
    template_day: &TemplateDay,
    exercises: &HashMap<Uuid, Vec<TemplateExercise>>,
    roster: &[&CareTeamAssignment],
    now: DateTime<Utc>,
) -> AppResult<PlannedDay> {
    let day = ClientProgramDay {
        id: Uuid::new_v4(),
        program_id: program.id,
        day_index: template_day.day_index,
        title: template_day.title.clone(),
        date: day_date(program.start_date, template_day.day_index)?,
    };

    let mut published: Vec<&TemplateModule> = template_day
        .modules
        .iter()
        .filter(|module| module.status.is_published())
        .collect();
    published.sort_by_key(|module| module.sort_order);

    let mut modules = Vec::with_capacity(published.len());
    let mut max_sort_order: i32 = 0;
    let mut occupied: HashSet<(Uuid, Discipline)> = HashSet::new();

    for source in published {
        let source_exercises = exercises.get(&source.id).map_or(&[][..], Vec::as_slice);
        let planned = plan_template_module(&day, source, source_exercises, now)?;
        max_sort_order = max_sort_order.max(source.sort_order);
        occupied.insert((source.coach_id, source.module_type));
        modules.push(planned);
    }

    for assignment in roster {
        if !assignment.is_active_on(day.date) {
            continue;
        }
        // Template modules (and earlier roster entries) already cover this pair
        if !occupied.insert((assignment.specialist_id, assignment.specialty)) {
            debug!(
                day_index = day.day_index,
                specialist_id = %assignment.specialist_id,
                specialty = assignment.specialty.as_str(),
                assignment_id = %assignment.id,
                "Care-team session already covered on this day, skipping"
            );
            continue;
        }
        max_sort_order = max_sort_order.checked_add(1).ok_or_else(|| {
            AppError::invalid_input(format!(
                "Module sort order on day {} leaves no room for care-team sessions",
                day.day_index
            ))
        })?;
        modules.push(plan_care_team_module(&day, assignment, max_sort_order));
    }

    Ok(PlannedDay { day, modules })
}

fn plan_template_module(
    day: &ClientProgramDay,
    source: &TemplateModule,
    source_exercises: &[TemplateExercise],
    now: DateTime<Utc>,
) -> AppResult<PlannedModule> {
    let module = ClientDayModule {
        id: Uuid::new_v4(),
        day_id: day.id,
        provenance: ModuleProvenance::Template,
        source_module_id: Some(source.id),
        owner_id: source.coach_id,
        module_type: source.module_type,
        title: source.title.clone(),
        sort_order: source.sort_order,
        status: ClientModuleStatus::Scheduled,
    };

    let mut ordered: Vec<&TemplateExercise> = source_exercises.iter().collect();
    ordered.sort_by_key(|exercise| exercise.sort_order);

    let exercises = ordered
        .into_iter()
        .map(|exercise| {
            Ok(ClientModuleExercise {
                id: Uuid::new_v4(),
                module_id: module.id,
                exercise_id: exercise.exercise_id,
                section: exercise.section.clone(),
                sort_order: exercise.sort_order,
                instructions: exercise.instructions.clone(),
                prescription_snapshot: prescription_snapshot(exercise.prescription.as_ref())?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let thread = ModuleThread {
        id: Uuid::new_v4(),
        module_id: module.id,
        created_at: now,
    };

    Ok(PlannedModule {
        module,
        exercises,
        thread: Some(thread),
    })
}

fn plan_care_team_module(
    day: &ClientProgramDay,
    assignment: &CareTeamAssignment,
    sort_order: i32,
) -> PlannedModule {
    PlannedModule {
        module: ClientDayModule {
            id: Uuid::new_v4(),
            day_id: day.id,
            provenance: ModuleProvenance::CareTeam,
            source_module_id: None,
            owner_id: assignment.specialist_id,
            module_type: assignment.specialty,
            title: care_team_module_title(assignment.specialty),
            sort_order,
            status: ClientModuleStatus::Scheduled,
        },
        exercises: Vec::new(),
        // Specialist sessions have no thread yet; messaging for them is undecided
        thread: None,
    }
}
