use derive_more::Display;
use tracing::info;

use super::monitor::{WindowMonitor, WindowSnapshot};
use super::window::{WindowStatus, can_mark};
use crate::backend::AttendanceBackend;
use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, MarkAttendance};

/// Why a mark-attendance request was stopped before reaching the backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
pub enum GateRejection {
    #[display(fmt = "Attendance can only be marked after 8:00 AM")]
    BeforeHours,
    #[display(fmt = "Attendance cannot be marked after 5:30 PM")]
    AfterHours,
    #[display(fmt = "Attendance already marked for today")]
    AlreadyMarked,
}

impl std::error::Error for GateRejection {}

/// Only the window itself, checked before the backend is consulted.
pub fn check_window(status: WindowStatus) -> Result<(), GateRejection> {
    match status {
        WindowStatus::BeforeHours => Err(GateRejection::BeforeHours),
        WindowStatus::AfterHours => Err(GateRejection::AfterHours),
        WindowStatus::Early | WindowStatus::OnTime => Ok(()),
    }
}

pub fn check(status: WindowStatus, already_marked_today: bool) -> Result<(), GateRejection> {
    check_window(status)?;
    if can_mark(status, already_marked_today) {
        Ok(())
    } else {
        Err(GateRejection::AlreadyMarked)
    }
}

#[derive(Debug)]
pub struct Accepted {
    pub window: WindowSnapshot,
    pub record: AttendanceRecord,
}

/// Re-evaluates the window from the clock, re-reads today's status from the
/// backend (never from cache) and only then records attendance.
pub async fn submit(
    monitor: &WindowMonitor,
    backend: &dyn AttendanceBackend,
    token: &str,
) -> Result<Accepted, ApiError> {
    let window = monitor.refresh();

    if let Err(rejection) = check_window(window.status) {
        info!(status = %window.status, minutes = window.minutes, %rejection, "Attendance submission rejected");
        return Err(rejection.into());
    }

    let today = window.evaluated_at.date();
    let day = backend.day_attendance(token, today).await?;

    if let Err(rejection) = check(window.status, day.marked) {
        info!(status = %window.status, %today, %rejection, "Attendance submission rejected");
        return Err(rejection.into());
    }

    let mark = MarkAttendance {
        date: today,
        time: window.evaluated_at.time(),
    };
    let record = backend.record_attendance(token, &mark).await?;

    info!(%today, status = %window.status, "Attendance recorded");
    Ok(Accepted { window, record })
}
