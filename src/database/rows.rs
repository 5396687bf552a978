// ABOUTME: Column decoding helpers shared by the SQLite managers
// ABOUTME: UUIDs, dates and timestamps are stored as TEXT and parsed back here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::Discipline;

/// Storage format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn uuid_column(row: &SqliteRow, column: &str) -> AppResult<Uuid> {
    let raw: String = row.get(column);
    Uuid::parse_str(&raw).map_err(|e| AppError::internal(format!("Invalid UUID in {column}: {e}")))
}

pub fn optional_uuid_column(row: &SqliteRow, column: &str) -> AppResult<Option<Uuid>> {
    let raw: Option<String> = row.get(column);
    raw.map(|s| Uuid::parse_str(&s))
        .transpose()
        .map_err(|e| AppError::internal(format!("Invalid UUID in {column}: {e}")))
}

pub fn date_column(row: &SqliteRow, column: &str) -> AppResult<NaiveDate> {
    let raw: String = row.get(column);
    parse_date(&raw, column)
}

pub fn optional_date_column(row: &SqliteRow, column: &str) -> AppResult<Option<NaiveDate>> {
    let raw: Option<String> = row.get(column);
    raw.map(|s| parse_date(&s, column)).transpose()
}

pub fn datetime_column(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let raw: String = row.get(column);
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime in {column}: {e}")))
}

pub fn discipline_column(row: &SqliteRow, column: &str) -> AppResult<Discipline> {
    let raw: String = row.get(column);
    raw.parse::<Discipline>()
        .map_err(|e| AppError::internal(format!("Invalid {column}: {}", e.message)))
}

pub fn optional_json_column(row: &SqliteRow, column: &str) -> AppResult<Option<Value>> {
    let raw: Option<String> = row.get(column);
    raw.map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| AppError::internal(format!("Invalid JSON in {column}: {e}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(raw: &str, column: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| AppError::internal(format!("Invalid date in {column}: {e}")))
}

pub fn optional_u32_column(row: &SqliteRow, column: &str) -> AppResult<Option<u32>> {
    let raw: Option<i64> = row.get(column);
    raw.map(u32::try_from)
        .transpose()
        .map_err(|e| AppError::internal(format!("Out of range value in {column}: {e}")))
}
