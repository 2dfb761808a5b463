use chrono::{FixedOffset, Local, NaiveDateTime, Utc};

/// Where "now" comes from. Handlers and the monitor never read the system clock
/// directly, so tests can pin the time.
pub trait TimeSource: Send + Sync {
    /// Wall-clock time in the office's timezone.
    fn now(&self) -> NaiveDateTime;
}

/// Host local time.
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// UTC shifted by a fixed offset, for hosts that don't run in office time.
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    pub fn from_minutes(offset_minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(offset_minutes * 60).map(|offset| OffsetClock { offset })
    }
}

impl TimeSource for OffsetClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}
