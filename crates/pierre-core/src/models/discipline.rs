// ABOUTME: Training discipline enum shared by template module types and care-team specialties
// ABOUTME: Provides database string conversion and display names for synthesized module titles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Training discipline of a module, or specialty of a care-team member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    /// Resistance training
    Strength,
    /// Metabolic conditioning and intervals
    Conditioning,
    /// Mobility and flexibility work
    Mobility,
    /// Running sessions
    Running,
    /// Cycling sessions
    Cycling,
    /// Swimming sessions
    Swimming,
    /// Yoga practice
    Yoga,
    /// Nutrition coaching
    Nutrition,
    /// Physiotherapy and rehab
    Physiotherapy,
    /// Recovery protocols
    Recovery,
    /// Mindset and mental performance coaching
    Mindset,
}

impl Discipline {
    /// Every discipline, in declaration order
    pub const ALL: [Self; 11] = [
        Self::Strength,
        Self::Conditioning,
        Self::Mobility,
        Self::Running,
        Self::Cycling,
        Self::Swimming,
        Self::Yoga,
        Self::Nutrition,
        Self::Physiotherapy,
        Self::Recovery,
        Self::Mindset,
    ];

    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Conditioning => "conditioning",
            Self::Mobility => "mobility",
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::Swimming => "swimming",
            Self::Yoga => "yoga",
            Self::Nutrition => "nutrition",
            Self::Physiotherapy => "physiotherapy",
            Self::Recovery => "recovery",
            Self::Mindset => "mindset",
        }
    }

    /// Human-readable display name for UI
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Conditioning => "Conditioning",
            Self::Mobility => "Mobility",
            Self::Running => "Running",
            Self::Cycling => "Cycling",
            Self::Swimming => "Swimming",
            Self::Yoga => "Yoga",
            Self::Nutrition => "Nutrition",
            Self::Physiotherapy => "Physiotherapy",
            Self::Recovery => "Recovery",
            Self::Mindset => "Mindset",
        }
    }
}

impl FromStr for Discipline {
    type Err = AppError;

    /// Parse from database string representation (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|discipline| discipline.as_str() == normalized)
            .ok_or_else(|| AppError::invalid_input(format!("Unknown discipline: {s}")))
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
