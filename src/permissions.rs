// ABOUTME: Role-based permission table for clients, specialists, coaches and admins
// ABOUTME: Static role -> permission map built once per process
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

bitflags! {
    /// Actions a role may perform
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        /// Read one's own program
        const VIEW_OWN_PROGRAM = 1;
        /// Log workouts and complete modules
        const LOG_WORKOUTS = 1 << 1;
        /// Message on module threads
        const USE_MODULE_THREADS = 1 << 2;
        /// See clients one is assigned to
        const VIEW_ASSIGNED_CLIENTS = 1 << 3;
        /// Author and publish program templates
        const MANAGE_TEMPLATES = 1 << 4;
        /// Assign templates to clients
        const ASSIGN_PROGRAMS = 1 << 5;
        /// Add or end care-team assignments
        const MANAGE_CARE_TEAM = 1 << 6;
        /// See every client on the platform
        const VIEW_ALL_CLIENTS = 1 << 7;
        /// Manage subscriptions and billing
        const MANAGE_BILLING = 1 << 8;
        /// Approve, suspend and change roles of users
        const MANAGE_USERS = 1 << 9;
        /// Access admin oversight dashboards
        const VIEW_ADMIN_DASHBOARD = 1 << 10;
        /// Promote admins and change platform settings
        const MANAGE_PLATFORM = 1 << 11;
    }
}

/// Platform role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Coaching client
    Client,
    /// Care-team specialist (nutritionist, physiotherapist, ...)
    Specialist,
    /// Primary coach
    Coach,
    /// Operations admin
    Admin,
    /// Platform owner
    SuperAdmin,
}

static ROLE_PERMISSIONS: LazyLock<HashMap<UserRole, Permissions>> = LazyLock::new(|| {
    let client = Permissions::VIEW_OWN_PROGRAM
        | Permissions::LOG_WORKOUTS
        | Permissions::USE_MODULE_THREADS;
    let specialist = Permissions::USE_MODULE_THREADS | Permissions::VIEW_ASSIGNED_CLIENTS;
    let coach = specialist
        | Permissions::MANAGE_TEMPLATES
        | Permissions::ASSIGN_PROGRAMS
        | Permissions::MANAGE_CARE_TEAM;
    let admin = coach
        | Permissions::VIEW_ALL_CLIENTS
        | Permissions::MANAGE_BILLING
        | Permissions::MANAGE_USERS
        | Permissions::VIEW_ADMIN_DASHBOARD;

    HashMap::from([
        (UserRole::Client, client),
        (UserRole::Specialist, specialist),
        (UserRole::Coach, coach),
        (UserRole::Admin, admin),
        (UserRole::SuperAdmin, Permissions::all()),
    ])
});

impl UserRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Specialist => "specialist",
            Self::Coach => "coach",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Permissions granted to this role
    #[must_use]
    pub fn permissions(self) -> Permissions {
        ROLE_PERMISSIONS
            .get(&self)
            .copied()
            .unwrap_or_else(Permissions::empty)
    }

    /// Check whether the role holds every flag in `required`
    #[must_use]
    pub fn has_permission(self, required: Permissions) -> bool {
        self.permissions().contains(required)
    }

    /// Fail unless the role holds every flag in `required`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if any required flag is missing
    pub fn require_permission(self, required: Permissions) -> AppResult<()> {
        if self.has_permission(required) {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Role '{}' is not allowed to perform this action",
                self.as_str()
            )))
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "specialist" => Ok(Self::Specialist),
            "coach" => Ok(Self::Coach),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(AppError::invalid_input(format!("Unknown role: {other}"))),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
