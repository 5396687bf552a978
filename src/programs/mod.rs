// ABOUTME: Program instantiation: planning and assigning coaching templates to clients
// ABOUTME: Pure planner plus the engine that wires it to the repositories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Assignment engine and caller-facing outcome
pub mod assignment;
/// Pure materialization planner
pub mod plan;

pub use assignment::{AssignmentOutcome, ProgramAssignmentEngine};
pub use plan::{build_plan, AssignmentRequest, MaterializationPlan, PlannedDay, PlannedModule};
