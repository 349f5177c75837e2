use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::FingerLogError;
use crate::utils::time_parse::parse_date;

/// One person's punches for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "nik": "3201",
    "full_name": "Budi Santoso",
    "timestamps": ["2025-11-27T01:00:00Z", "2025-11-27T10:02:11.438Z"]
}))]
pub struct FingerLogResult {
    pub nik: String,
    pub full_name: String,
    pub timestamps: Vec<DateTime<Utc>>,
}

/// A single joined `fingerlog` x `users` row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RawFingerLog {
    pub nik: String,
    pub full_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FingerLogRequest {
    /// Calendar day, `YYYY-MM-DD`
    #[serde(default)]
    #[param(example = "2025-11-27")]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteRequest {
    #[serde(default)]
    #[schema(example = "2025-12-14")]
    pub date: String,
    #[serde(default)]
    #[schema(example = "3201")]
    pub nik: String,
    #[serde(default)]
    #[schema(example = "Sick leave, letter attached")]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct NoteResponse {
    #[schema(example = "3201")]
    pub nik: String,
    #[schema(example = "Sick leave, letter attached")]
    pub note: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddFingerLogRequest {
    #[serde(default)]
    #[schema(example = "3201")]
    pub nik: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddManualFingerLogRequest {
    #[serde(default)]
    #[schema(example = "3201")]
    pub nik: String,
    /// `YYYY-MM-DD HH:mm:ss`, service time zone
    #[serde(default)]
    #[schema(example = "2025-11-27 08:00:00")]
    pub timestamp: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteFingerLogRequest {
    #[serde(default)]
    #[schema(example = "3201")]
    pub nik: String,
    /// Any accepted timestamp layout; must match the stored value exactly
    #[serde(default)]
    #[schema(example = "2025-11-27 17:18:23.838 +0700")]
    pub timestamp: String,
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, FingerLogError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FingerLogError::validation(message))
    } else {
        Ok(value)
    }
}

impl NoteRequest {
    /// Returns the trimmed nik and the parsed date.
    pub fn validate(&self) -> Result<(&str, NaiveDate), FingerLogError> {
        let nik = required(&self.nik, "NIK and date are required")?;
        let date = required(&self.date, "NIK and date are required")?;
        Ok((nik, parse_date(date)?))
    }
}

impl AddFingerLogRequest {
    pub fn validate(&self) -> Result<&str, FingerLogError> {
        required(&self.nik, "NIK is required")
    }
}

impl AddManualFingerLogRequest {
    /// Returns the trimmed `(nik, timestamp)` pair.
    pub fn validate(&self) -> Result<(&str, &str), FingerLogError> {
        let nik = required(&self.nik, "NIK and timestamp are required")?;
        let timestamp = required(&self.timestamp, "NIK and timestamp are required")?;
        Ok((nik, timestamp))
    }
}

impl DeleteFingerLogRequest {
    /// Returns the trimmed `(nik, timestamp)` pair.
    pub fn validate(&self) -> Result<(&str, &str), FingerLogError> {
        let nik = required(&self.nik, "NIK and timestamp are required")?;
        let timestamp = required(&self.timestamp, "NIK and timestamp are required")?;
        Ok((nik, timestamp))
    }
}
