use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Attended,
    Leave,
    Late,
}

/// A day's attendance entry as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "date": "2026-03-02",
    "time": "08:12:00",
    "status": "attended"
}))]
pub struct AttendanceRecord {
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "08:12:00", value_type = String)]
    pub time: NaiveTime,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayAttendance {
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = false)]
    pub marked: bool,
    pub record: Option<AttendanceRecord>,
}

/// Body of the backend's "record attendance" call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendance {
    pub date: NaiveDate,
    pub time: NaiveTime,
}
