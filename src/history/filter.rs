use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use super::date_range::{in_date_range, CustomDateRange, DateFilter};
use crate::error::ParseFilterError;
use crate::model::{ServiceRecord, ServiceType, StatusBucket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ServiceType),
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(t) => t.fmt(f),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "repair" => Ok(Self::Only(ServiceType::Repair)),
            "unlock" => Ok(Self::Only(ServiceType::Unlock)),
            "sale" => Ok(Self::Only(ServiceType::Sale)),
            _ => Err(ParseFilterError {
                kind: "type",
                value: s.to_string(),
                expected: "all, repair, unlock, sale",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        })
    }
}

impl FromStr for StatusFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseFilterError {
                kind: "status",
                value: s.to_string(),
                expected: "all, pending, completed",
            }),
        }
    }
}

/// Filter controls of the customer detail view. `Default` is the state the
/// view starts from every time it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub date: DateFilter,
    /// Only consulted when `date` is [`DateFilter::Custom`].
    pub custom_range: CustomDateRange,
    pub service_type: TypeFilter,
    pub status: StatusFilter,
}

impl FilterState {
    pub fn matches(&self, record: &ServiceRecord, now: DateTime<Utc>) -> bool {
        in_date_range(record, self.date, &self.custom_range, now)
            && type_matches(record, self.service_type)
            && status_matches(record, self.status)
    }
}

pub fn type_matches(record: &ServiceRecord, filter: TypeFilter) -> bool {
    match filter {
        TypeFilter::All => true,
        TypeFilter::Only(t) => record.service_type == t,
    }
}

pub fn status_matches(record: &ServiceRecord, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Pending => record.bucket() == Some(StatusBucket::Pending),
        StatusFilter::Completed => record.bucket() == Some(StatusBucket::Completed),
    }
}

/// Records matching every filter, most recent first. Records sharing a
/// `created_at` keep their input order.
pub fn filter_services<'a>(
    records: &'a [ServiceRecord],
    state: &FilterState,
    now: DateTime<Utc>,
) -> Vec<&'a ServiceRecord> {
    let mut kept: Vec<&ServiceRecord> = records.iter().filter(|r| state.matches(r, now)).collect();
    kept.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    kept
}
