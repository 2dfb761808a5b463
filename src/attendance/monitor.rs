use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use actix_web::rt::task::JoinHandle;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::clock::TimeSource;
use super::window::{TimeOfDay, WindowStatus, classify};

/// One evaluation of the attendance window.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, ToSchema)]
pub struct WindowSnapshot {
    pub status: WindowStatus,
    #[schema(example = 495)]
    pub minutes: u16,
    #[schema(example = "2026-03-02T08:15:00", value_type = String)]
    pub evaluated_at: NaiveDateTime,
}

impl WindowSnapshot {
    pub fn evaluate(clock: &dyn TimeSource) -> Self {
        let now = clock.now();
        let time = TimeOfDay::of(&now);
        WindowSnapshot {
            status: classify(time),
            minutes: time.minutes(),
            evaluated_at: now,
        }
    }
}

/// Holds the latest window evaluation for the dashboard. Cloning shares the
/// same snapshot.
#[derive(Clone)]
pub struct WindowMonitor {
    clock: Arc<dyn TimeSource>,
    latest: Arc<RwLock<WindowSnapshot>>,
}

impl WindowMonitor {
    /// Evaluates once straight away, so a snapshot exists before the first tick.
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        let first = WindowSnapshot::evaluate(clock.as_ref());
        info!(status = %first.status, minutes = first.minutes, "Attendance window initialised");
        WindowMonitor {
            clock,
            latest: Arc::new(RwLock::new(first)),
        }
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        *self.latest.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }

    /// Re-reads the clock and publishes the result.
    pub fn refresh(&self) -> WindowSnapshot {
        let fresh = WindowSnapshot::evaluate(self.clock.as_ref());
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);

        if latest.status != fresh.status {
            info!(from = %latest.status, to = %fresh.status, minutes = fresh.minutes, "Attendance window changed");
        }

        *latest = fresh;
        fresh
    }

    /// Spawns the periodic re-evaluation. The task runs until the returned
    /// handle is dropped.
    pub fn start(&self, every: Duration) -> MonitorHandle {
        let monitor = self.clone();
        let task = actix_web::rt::spawn(async move {
            let mut ticker = actix_web::rt::time::interval(every);
            // first tick completes immediately; `new` already evaluated
            ticker.tick().await;
            loop {
                ticker.tick().await;
                monitor.refresh();
            }
        });

        MonitorHandle { task }
    }
}

pub struct MonitorHandle {
    task: JoinHandle<()>,
}

impl MonitorHandle {
    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
