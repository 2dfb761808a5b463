use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::backend::HistoryRange;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct HistoryFilter {
    /// First day to include
    #[param(value_type = Option<String>, example = "2026-03-01")]
    pub from: Option<NaiveDate>,
    /// Last day to include
    #[param(value_type = Option<String>, example = "2026-03-31")]
    pub to: Option<NaiveDate>,
    /// Keep only records with this status
    #[param(value_type = Option<String>, example = "late")]
    pub status: Option<AttendanceStatus>,
    /// Sort by date and time, newest first unless `asc`
    #[param(value_type = Option<String>, example = "desc")]
    pub order: Option<SortOrder>,
    /// Pagination page number (start with 1)
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page, at most 100
    #[param(example = 10)]
    pub per_page: Option<u64>,
}

impl HistoryFilter {
    pub fn range(&self) -> HistoryRange {
        HistoryRange {
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryPage {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 22)]
    pub total: i64,
}

/// Filters, sorts and pages an already fetched history list.
pub fn arrange(mut records: Vec<AttendanceRecord>, filter: &HistoryFilter) -> HistoryPage {
    records.retain(|r| {
        filter.status.is_none_or(|s| r.status == s)
            && filter.from.is_none_or(|from| r.date >= from)
            && filter.to.is_none_or(|to| r.date <= to)
    });

    match filter.order.unwrap_or_default() {
        SortOrder::Asc => records.sort_by_key(|r| (r.date, r.time)),
        SortOrder::Desc => records.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time))),
    }

    let per_page = filter.per_page.unwrap_or(10).clamp(1, 100);
    let page = filter.page.unwrap_or(1).max(1);
    let offset = (page - 1).saturating_mul(per_page);
    let total = records.len() as i64;

    let data = records
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(per_page as usize)
        .collect();

    HistoryPage {
        data,
        page,
        per_page: per_page as u32,
        total,
    }
}
