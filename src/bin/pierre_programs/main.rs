// ABOUTME: Operator CLI for Pierre Programs
// ABOUTME: Runs migrations, assigns program templates to clients and prints materialized programs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # pierre-programs
//!
//! ```bash
//! # Apply embedded migrations
//! pierre-programs migrate
//!
//! # Assign a template to a client starting on a date
//! pierre-programs assign --coach <uuid> --client <uuid> --subscription <uuid> \
//!     --template <uuid> --start-date 2024-03-01
//!
//! # Print a materialized program as JSON
//! pierre-programs show --program <uuid>
//!
//! # Override database URL, verbose output
//! pierre-programs --database-url sqlite:./data/dev.db -v show --program <uuid>
//! ```

mod commands;

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use uuid::Uuid;

use pierre_programs::config::ServerConfig;
use pierre_programs::database::Database;
use pierre_programs::errors::AppResult;
use pierre_programs::logging::init_logging;
use pierre_programs::permissions::UserRole;

#[derive(Parser)]
#[command(
    name = "pierre-programs",
    about = "Pierre Programs operator CLI",
    long_about = "Assign coaching program templates to clients and inspect the resulting programs"
)]
struct Cli {
    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run embedded database migrations
    Migrate,

    /// Materialize a program template for a client
    Assign {
        /// Coach performing the assignment
        #[arg(long)]
        coach: Uuid,

        /// Client receiving the program
        #[arg(long)]
        client: Uuid,

        /// Client subscription (keys the care-team roster)
        #[arg(long)]
        subscription: Uuid,

        /// Program template to copy
        #[arg(long)]
        template: Uuid,

        /// Date of day 1 (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// Team cohort tag
        #[arg(long)]
        team: Option<Uuid>,

        /// Role of the caller
        #[arg(long, default_value = "coach")]
        role: UserRole,
    },

    /// Print a client program with its days, modules and exercises
    Show {
        /// Client program id
        #[arg(long)]
        program: Uuid,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<bool> {
    let mut config = ServerConfig::from_env()?;
    if cli.verbose {
        "debug".clone_into(&mut config.logging.level);
    }
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    init_logging(&config.logging)?;
    debug!(database_url = %config.database.url, "Opening database");

    let result = execute(cli.command, &config).await;
    if let Err(e) = &result {
        error!(code = %e.code, "{}", e.message);
    }
    result
}

async fn execute(command: Command, config: &ServerConfig) -> AppResult<bool> {
    match command {
        Command::Migrate => {
            let database =
                Database::connect(&config.database.url, config.database.max_connections).await?;
            commands::migrate::run(&database).await?;
            Ok(true)
        }
        Command::Assign {
            coach,
            client,
            subscription,
            template,
            start_date,
            team,
            role,
        } => {
            let database = Database::from_config(&config.database).await?;
            let args = commands::assign::AssignArgs {
                coach,
                client,
                subscription,
                template,
                start_date,
                team,
                role,
            };
            commands::assign::run(&database, &args).await
        }
        Command::Show { program } => {
            let database = Database::from_config(&config.database).await?;
            commands::show::run(&database, program).await?;
            Ok(true)
        }
    }
}
