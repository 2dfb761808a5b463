use chrono::Timelike;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/// 8:00, attendance opens
pub const START: u16 = 8 * 60;
/// 8:30, end of the early window
pub const EARLY_END: u16 = 8 * 60 + 30;
/// 17:30, last minute still counted as on time
pub const END: u16 = 17 * 60 + 30;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Minutes since midnight. Always in `0..1440`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Builds a time of day, wrapping anything past midnight back into the day.
    pub fn from_minutes(minutes: u16) -> Self {
        TimeOfDay(minutes % MINUTES_PER_DAY)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Self {
        Self::from_minutes((hour * 60 + minute) as u16)
    }

    pub fn of<T: Timelike>(t: &T) -> Self {
        Self::from_hm(t.hour(), t.minute())
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WindowStatus {
    BeforeHours,
    Early,
    OnTime,
    AfterHours,
}

impl WindowStatus {
    /// Message shown on the dashboard next to the mark button.
    pub fn message(self) -> &'static str {
        match self {
            WindowStatus::BeforeHours => "Attendance opens at 8:00 AM",
            WindowStatus::Early => "You are early! Mark your attendance now",
            WindowStatus::OnTime => "Attendance window is open",
            WindowStatus::AfterHours => "Attendance window has closed for today",
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, WindowStatus::Early | WindowStatus::OnTime)
    }
}

/// Classify a moment of the day. The `OnTime` upper bound is inclusive, so
/// 17:30 itself is still on time and `AfterHours` starts at 17:31.
pub fn classify(now: TimeOfDay) -> WindowStatus {
    let m = now.minutes();
    if m < START {
        WindowStatus::BeforeHours
    } else if m < EARLY_END {
        WindowStatus::Early
    } else if m <= END {
        WindowStatus::OnTime
    } else {
        WindowStatus::AfterHours
    }
}

pub fn can_mark(status: WindowStatus, already_marked_today: bool) -> bool {
    !already_marked_today && status.is_open()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn at(m: u16) -> WindowStatus {
        classify(TimeOfDay::from_minutes(m))
    }

    #[test]
    fn boundaries_are_exact() {
        assert_eq!(at(0), WindowStatus::BeforeHours);
        assert_eq!(at(479), WindowStatus::BeforeHours);
        assert_eq!(at(480), WindowStatus::Early);
        assert_eq!(at(509), WindowStatus::Early);
        assert_eq!(at(510), WindowStatus::OnTime);
        assert_eq!(at(1050), WindowStatus::OnTime);
        assert_eq!(at(1051), WindowStatus::AfterHours);
        assert_eq!(at(1439), WindowStatus::AfterHours);
    }

    #[test]
    fn windows_are_contiguous_and_ordered() {
        // walking the day must only ever move forward through the statuses
        let mut seen = vec![at(0)];
        for m in 1..MINUTES_PER_DAY {
            let status = at(m);
            let last = *seen.last().unwrap();
            assert!(status >= last, "status went backwards at minute {m}");
            if status != last {
                seen.push(status);
            }
        }
        assert_eq!(seen, WindowStatus::iter().collect::<Vec<_>>());
    }

    #[test]
    fn classify_is_idempotent() {
        for m in 0..MINUTES_PER_DAY {
            assert_eq!(at(m), at(m));
        }
    }

    #[test]
    fn time_of_day_wraps_past_midnight() {
        assert_eq!(TimeOfDay::from_minutes(1440).minutes(), 0);
        assert_eq!(TimeOfDay::from_hm(17, 30).minutes(), END);
        assert_eq!(TimeOfDay::from_hm(8, 0).minutes(), START);
    }

    #[test]
    fn can_mark_truth_table() {
        for status in WindowStatus::iter() {
            assert!(!can_mark(status, true), "{status} allowed twice");
        }
        assert!(can_mark(WindowStatus::Early, false));
        assert!(can_mark(WindowStatus::OnTime, false));
        assert!(!can_mark(WindowStatus::BeforeHours, false));
        assert!(!can_mark(WindowStatus::AfterHours, false));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&WindowStatus::BeforeHours).unwrap(),
            "\"before_hours\""
        );
        assert_eq!(WindowStatus::OnTime.to_string(), "on_time");
        assert_eq!(WindowStatus::AfterHours.to_string(), "after_hours");
    }
}
