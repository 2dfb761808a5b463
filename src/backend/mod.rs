pub mod cache;
pub mod client;

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;
use serde::Serialize;

use crate::model::attendance::{AttendanceRecord, DayAttendance, MarkAttendance};

#[derive(Debug, Display)]
pub enum BackendError {
    #[display(fmt = "backend refused the bearer token")]
    Unauthorized,
    #[display(fmt = "backend rejected the request ({}): {}", status, message)]
    Rejected { status: u16, message: String },
    #[display(fmt = "backend unavailable: {}", _0)]
    Unavailable(String),
    #[display(fmt = "unexpected backend response: {}", _0)]
    Decode(String),
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Unavailable(e.to_string())
        }
    }
}

/// Date bounds forwarded to the history endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// The external service that owns attendance records. Every call is made on
/// behalf of the caller whose bearer token is passed through.
#[async_trait]
pub trait AttendanceBackend: Send + Sync {
    async fn day_attendance(
        &self,
        token: &str,
        date: NaiveDate,
    ) -> Result<DayAttendance, BackendError>;

    async fn record_attendance(
        &self,
        token: &str,
        mark: &MarkAttendance,
    ) -> Result<AttendanceRecord, BackendError>;

    async fn attendance_history(
        &self,
        token: &str,
        range: &HistoryRange,
    ) -> Result<Vec<AttendanceRecord>, BackendError>;
}
