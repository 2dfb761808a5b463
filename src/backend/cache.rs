use std::future::ready;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache;
use moka::ops::compute::Op;
use tracing::debug;

use super::{AttendanceBackend, BackendError};
use crate::model::attendance::DayAttendance;

/// Short lived cache of "is this day marked" answers, keyed by the caller's
/// token and the day. The dashboard polls it; submissions bypass it.
///
/// A day never goes from marked back to unmarked, so a marked entry wins over
/// any unmarked answer that arrives later.
#[derive(Clone)]
pub struct StatusCache {
    inner: Cache<(String, NaiveDate), DayAttendance>,
}

impl StatusCache {
    pub fn new(ttl: Duration) -> Self {
        StatusCache {
            inner: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get_or_fetch(
        &self,
        backend: &dyn AttendanceBackend,
        token: &str,
        date: NaiveDate,
    ) -> Result<DayAttendance, BackendError> {
        if let Some(hit) = self.inner.get(&(token.to_string(), date)).await {
            debug!(%date, "Day status cache hit");
            return Ok(hit);
        }

        debug!(%date, "Day status cache miss");
        let fresh = backend.day_attendance(token, date).await?;
        Ok(self.remember(token, fresh).await)
    }

    /// Overwrites the day with what a successful submission just created.
    pub async fn store(&self, token: &str, day: DayAttendance) {
        self.inner.insert((token.to_string(), day.date), day).await;
    }

    /// Caches `fresh` unless a marked answer for the same day got there first,
    /// and returns whichever one is kept.
    async fn remember(&self, token: &str, fresh: DayAttendance) -> DayAttendance {
        let fallback = fresh.clone();
        let outcome = self
            .inner
            .entry((token.to_string(), fresh.date))
            .and_compute_with(move |existing| {
                let op = match existing {
                    Some(cached) if cached.value().marked && !fresh.marked => Op::Nop,
                    _ => Op::Put(fresh),
                };
                ready(op)
            })
            .await;

        outcome
            .into_entry()
            .map(|entry| entry.into_value())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{FakeBackend, GOOD_TOKEN};
    use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
    use chrono::NaiveTime;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn marked_day() -> DayAttendance {
        DayAttendance {
            date: day(),
            marked: true,
            record: Some(AttendanceRecord {
                date: day(),
                time: NaiveTime::from_hms_opt(8, 5, 0).unwrap(),
                status: AttendanceStatus::Attended,
            }),
        }
    }

    #[actix_web::test]
    async fn second_read_is_served_from_cache() {
        let backend = FakeBackend::default();
        let cache = StatusCache::new(Duration::from_secs(60));

        let first = cache.get_or_fetch(&backend, GOOD_TOKEN, day()).await.unwrap();
        let second = cache.get_or_fetch(&backend, GOOD_TOKEN, day()).await.unwrap();

        assert_eq!(first, second);
        assert!(!first.marked);
        assert_eq!(backend.day_calls(), 1);
    }

    #[actix_web::test]
    async fn stored_mark_replaces_cached_unmarked_day() {
        let backend = FakeBackend::default();
        let cache = StatusCache::new(Duration::from_secs(60));

        let before = cache.get_or_fetch(&backend, GOOD_TOKEN, day()).await.unwrap();
        assert!(!before.marked);

        cache.store(GOOD_TOKEN, marked_day()).await;

        let after = cache.get_or_fetch(&backend, GOOD_TOKEN, day()).await.unwrap();
        assert!(after.marked);
        assert_eq!(backend.day_calls(), 1);
    }

    #[actix_web::test]
    async fn late_unmarked_answer_does_not_undo_a_mark() {
        let cache = StatusCache::new(Duration::from_secs(60));
        let stale = DayAttendance {
            date: day(),
            marked: false,
            record: None,
        };

        // a read that left the backend before the mark landed comes back last
        cache.store(GOOD_TOKEN, marked_day()).await;
        let kept = cache.remember(GOOD_TOKEN, stale).await;

        assert_eq!(kept, marked_day());
        let backend = FakeBackend::default();
        let cached = cache.get_or_fetch(&backend, GOOD_TOKEN, day()).await.unwrap();
        assert!(cached.marked);
        assert_eq!(backend.day_calls(), 0);
    }

    #[actix_web::test]
    async fn failures_are_not_cached() {
        let backend = FakeBackend::default();
        let cache = StatusCache::new(Duration::from_secs(60));

        let err = cache.get_or_fetch(&backend, "expired", day()).await;
        assert!(matches!(err, Err(BackendError::Unauthorized)));

        cache.get_or_fetch(&backend, GOOD_TOKEN, day()).await.unwrap();
        assert_eq!(backend.day_calls(), 1);
    }
}
