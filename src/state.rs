use std::sync::Arc;

use crate::attendance::monitor::WindowMonitor;
use crate::backend::AttendanceBackend;
use crate::backend::cache::StatusCache;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub monitor: WindowMonitor,
    pub backend: Arc<dyn AttendanceBackend>,
    pub status_cache: StatusCache,
}
