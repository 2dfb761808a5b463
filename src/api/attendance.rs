use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::attendance::gate;
use crate::attendance::history::{self, HistoryFilter};
use crate::attendance::monitor::WindowSnapshot;
use crate::attendance::window::{WindowStatus, can_mark};
use crate::auth::bearer::BearerToken;
use crate::backend::BackendError;
use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, DayAttendance};
use crate::state::AppState;

const ALREADY_MARKED: &str = "Attendance already marked for today";

/// What the employee dashboard needs to render the mark button.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "early",
    "minutes": 495,
    "can_mark": true,
    "already_marked": false,
    "message": "You are early! Mark your attendance now",
    "evaluated_at": "2026-03-02T08:15:00"
}))]
pub struct WindowView {
    pub status: WindowStatus,
    pub minutes: u16,
    pub can_mark: bool,
    /// `null` when the backend could not be asked; marking stays disabled
    pub already_marked: Option<bool>,
    pub message: String,
    #[schema(value_type = String)]
    pub evaluated_at: NaiveDateTime,
}

impl WindowView {
    fn new(snapshot: WindowSnapshot, already_marked: Option<bool>) -> Self {
        let message = match already_marked {
            Some(true) => ALREADY_MARKED,
            _ => snapshot.status.message(),
        };

        WindowView {
            status: snapshot.status,
            minutes: snapshot.minutes,
            can_mark: already_marked.is_some_and(|marked| can_mark(snapshot.status, marked)),
            already_marked,
            message: message.to_string(),
            evaluated_at: snapshot.evaluated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkResponse {
    #[schema(example = "Attendance marked")]
    pub message: String,
    pub record: AttendanceRecord,
}

#[derive(Deserialize, IntoParams)]
pub struct DayQuery {
    /// Day to look up, today when omitted
    #[param(value_type = Option<String>, example = "2026-03-02")]
    pub date: Option<NaiveDate>,
}

/// Current attendance window for the calling employee
#[utoipa::path(
    get,
    path = "/api/attendance/window",
    responses(
        (status = 200, description = "Current window, with `already_marked` null if the backend is down", body = WindowView),
        (status = 401, description = "Missing or expired token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn window(
    token: BearerToken,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let snapshot = state.monitor.snapshot();
    let lookup = state
        .status_cache
        .get_or_fetch(
            state.backend.as_ref(),
            token.as_str(),
            snapshot.evaluated_at.date(),
        )
        .await;

    // the window itself never depends on the backend, only the marked flag does
    let view = match lookup {
        Ok(day) => WindowView::new(snapshot, Some(day.marked)),
        Err(BackendError::Unauthorized) => return Err(BackendError::Unauthorized.into()),
        Err(e) => {
            let err = ApiError::from(e);
            tracing::warn!(error = %err, "Showing window without today's attendance");
            let mut view = WindowView::new(snapshot, None);
            view.message = format!("{} ({})", view.message, err.user_message());
            view
        }
    };

    Ok(HttpResponse::Ok().json(view))
}

/// Mark attendance for today
#[utoipa::path(
    post,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Attendance marked", body = MarkResponse),
        (status = 400, description = "Outside the attendance window or already marked", body = Object, example = json!({
            "message": "Attendance can only be marked after 8:00 AM"
        })),
        (status = 401, description = "Missing or expired token"),
        (status = 429, description = "Too many requests"),
        (status = 502, description = "Backend rejected the request"),
        (status = 503, description = "Attendance backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    token: BearerToken,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let accepted = gate::submit(&state.monitor, state.backend.as_ref(), token.as_str()).await?;

    state
        .status_cache
        .store(
            token.as_str(),
            DayAttendance {
                date: accepted.window.evaluated_at.date(),
                marked: true,
                record: Some(accepted.record.clone()),
            },
        )
        .await;

    Ok(HttpResponse::Ok().json(MarkResponse {
        message: "Attendance marked".to_string(),
        record: accepted.record,
    }))
}

/// Attendance status for a single day
#[utoipa::path(
    get,
    path = "/api/attendance/status",
    params(DayQuery),
    responses(
        (status = 200, description = "Day status", body = DayAttendance),
        (status = 401, description = "Missing or expired token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn day_status(
    token: BearerToken,
    state: web::Data<AppState>,
    query: web::Query<DayQuery>,
) -> Result<HttpResponse, ApiError> {
    let date = query.date.unwrap_or_else(|| state.monitor.today());
    let day = state
        .status_cache
        .get_or_fetch(state.backend.as_ref(), token.as_str(), date)
        .await?;

    Ok(HttpResponse::Ok().json(day))
}

/// Attendance history, filtered and paginated
#[utoipa::path(
    get,
    path = "/api/attendance/history",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Paginated attendance history", body = crate::attendance::history::HistoryPage),
        (status = 401, description = "Missing or expired token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_history(
    token: BearerToken,
    state: web::Data<AppState>,
    query: web::Query<HistoryFilter>,
) -> Result<HttpResponse, ApiError> {
    let records = state
        .backend
        .attendance_history(token.as_str(), &query.range())
        .await?;

    Ok(HttpResponse::Ok().json(history::arrange(records, &query)))
}
