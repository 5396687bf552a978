// ABOUTME: Show command for pierre-programs
// ABOUTME: Loads a materialized client program and prints it as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_programs::{
    database::{
        repositories::{ClientProgramRepository, ClientProgramRepositoryImpl},
        Database,
    },
    errors::{AppError, AppResult},
};
use uuid::Uuid;

/// Print the full program tree
pub async fn run(database: &Database, program_id: Uuid) -> AppResult<()> {
    let programs = ClientProgramRepositoryImpl::new(database);
    let program = programs
        .load_program(program_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client program {program_id}")))?;

    println!("{}", serde_json::to_string_pretty(&program)?);
    Ok(())
}
