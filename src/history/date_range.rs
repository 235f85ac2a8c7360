use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseFilterError;
use crate::model::ServiceRecord;

/// Named date window for the service history.
///
/// Month-based windows are fixed day counts (90 and 180 days), not
/// calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    Last7Days,
    Last30Days,
    Last3Months,
    Last6Months,
    ThisYear,
    Custom,
}

impl DateFilter {
    pub const TOKENS: &'static str = "all, 7d, 30d, 3m, 6m, year, custom";

    pub const fn token(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::Last3Months => "3m",
            Self::Last6Months => "6m",
            Self::ThisYear => "year",
            Self::Custom => "custom",
        }
    }

    /// Earliest instant that still qualifies, relative to `now`.
    ///
    /// `None` means no lower bound. `Custom` also returns `None`; its bounds
    /// come from a [`CustomDateRange`].
    pub fn lower_bound(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All | Self::Custom => None,
            Self::Last7Days => Some(now - Duration::days(7)),
            Self::Last30Days => Some(now - Duration::days(30)),
            Self::Last3Months => Some(now - Duration::days(90)),
            Self::Last6Months => Some(now - Duration::days(180)),
            Self::ThisYear => NaiveDate::from_ymd_opt(now.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc()),
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for DateFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "7d" => Ok(Self::Last7Days),
            "30d" => Ok(Self::Last30Days),
            "3m" => Ok(Self::Last3Months),
            "6m" => Ok(Self::Last6Months),
            "year" => Ok(Self::ThisYear),
            "custom" => Ok(Self::Custom),
            _ => Err(ParseFilterError {
                kind: "date",
                value: s.to_string(),
                expected: Self::TOKENS,
            }),
        }
    }
}

/// User-picked date range. Either side may be left empty, which relaxes
/// only that side of the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CustomDateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl CustomDateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `start` counts from midnight, `end` includes the whole day.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let after_start = self
            .start
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map_or(true, |start| instant >= start.and_utc());
        let before_end = self
            .end
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
            .map_or(true, |end| instant <= end.and_utc());
        after_start && before_end
    }
}

pub fn in_date_range(
    record: &ServiceRecord,
    filter: DateFilter,
    custom: &CustomDateRange,
    now: DateTime<Utc>,
) -> bool {
    match filter {
        DateFilter::All => true,
        DateFilter::Custom => custom.is_empty() || custom.contains(record.created_at),
        rolling => rolling
            .lower_bound(now)
            .map_or(true, |bound| record.created_at >= bound),
    }
}
