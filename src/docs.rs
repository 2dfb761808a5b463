use crate::api::attendance::{MarkResponse, WindowView};
use crate::attendance::history::{HistoryPage, SortOrder};
use crate::attendance::monitor::WindowSnapshot;
use crate::attendance::window::WindowStatus;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, DayAttendance};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Portal Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance window service

Backs the employee dashboard of the HRM portal.

### 🔹 Key Features
- **Attendance window**
  - 8:00 to 8:30 is *early*, 8:30 to 17:30 is *on time*
  - Re-evaluated every minute and on every submission
- **Mark attendance**
  - Checked against the window and today's status before it reaches the backend
- **History**
  - Filter by status, sort by date, paginate

### 🔐 Security
Every endpoint expects a **Bearer** token issued by the HR backend.
The token is forwarded as-is; the backend validates it and has the final say
on every attendance record.
"#,
    ),
    paths(
        crate::api::attendance::window,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::day_status,
        crate::api::attendance::attendance_history
    ),
    components(
        schemas(
            WindowStatus,
            WindowSnapshot,
            WindowView,
            MarkResponse,
            AttendanceRecord,
            AttendanceStatus,
            DayAttendance,
            HistoryPage,
            SortOrder
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance window and records"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
