// ABOUTME: Unified error type for Pierre Programs with stable error codes
// ABOUTME: AppError carries a code plus a human-readable message surfaced to callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes shared by every layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Referenced record does not exist
    ResourceNotFound,
    /// Caller supplied data that violates a domain rule
    InvalidInput,
    /// Caller's role lacks the required permission
    PermissionDenied,
    /// A storage read (lookup, list, hierarchy fetch) failed
    StorageRead,
    /// A storage write (insert, update, commit) failed
    StorageWrite,
    /// Configuration is missing or malformed
    ConfigError,
    /// Unexpected internal failure (corrupt row, serialization)
    InternalError,
}

impl ErrorCode {
    /// Short description used in logs
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ResourceNotFound => "resource not found",
            Self::InvalidInput => "invalid input",
            Self::PermissionDenied => "permission denied",
            Self::StorageRead => "storage read failed",
            Self::StorageWrite => "storage write failed",
            Self::ConfigError => "configuration error",
            Self::InternalError => "internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Application error with a stable code and a message safe to show a coach
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AppError {
    /// Error category
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

impl AppError {
    /// Create an error with an explicit code
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Resource lookup came back empty
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::new(ErrorCode::ResourceNotFound, format!("{resource} not found"))
    }

    /// Domain rule violated by caller input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Role is not allowed to perform the action
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Storage read failure
    #[must_use]
    pub fn storage_read(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageRead, message)
    }

    /// Storage write failure
    #[must_use]
    pub fn storage_write(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageWrite, message)
    }

    /// Configuration failure
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal failure
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Error category
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {error}"))
    }
}

/// Result alias used across the workspace
pub type AppResult<T> = Result<T, AppError>;
