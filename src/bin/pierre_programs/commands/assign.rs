// ABOUTME: Assign command for pierre-programs
// ABOUTME: Checks the caller's role, runs the instantiation engine and prints the outcome as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use pierre_programs::{
    database::Database,
    errors::AppResult,
    permissions::{Permissions, UserRole},
    programs::{AssignmentOutcome, AssignmentRequest, ProgramAssignmentEngine},
};
use tracing::{info, warn};
use uuid::Uuid;

/// Arguments of the `assign` subcommand
pub struct AssignArgs {
    pub coach: Uuid,
    pub client: Uuid,
    pub subscription: Uuid,
    pub template: Uuid,
    pub start_date: NaiveDate,
    pub team: Option<Uuid>,
    pub role: UserRole,
}

/// Assign a template and print the outcome; returns whether it succeeded
pub async fn run(database: &Database, args: &AssignArgs) -> AppResult<bool> {
    let outcome = match args.role.require_permission(Permissions::ASSIGN_PROGRAMS) {
        Ok(()) => {
            let request = AssignmentRequest {
                coach_user_id: args.coach,
                client_user_id: args.client,
                subscription_id: args.subscription,
                program_template_id: args.template,
                start_date: args.start_date,
                team_id: args.team,
            };
            ProgramAssignmentEngine::from_database(database)
                .assign(&request)
                .await
        }
        Err(e) => {
            warn!(role = %args.role, "Assignment refused: {}", e.message);
            AssignmentOutcome::failed(e.message)
        }
    };

    if let Some(program_id) = outcome.client_program_id {
        info!(program_id = %program_id, client_id = %args.client, "Program created");
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(outcome.success)
}
