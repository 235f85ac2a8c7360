use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Opaque identifier of a service record. The backend hands out either
/// UUID strings or integer keys depending on the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => RecordId(s),
            RawId::Int(n) => RecordId(n.to_string()),
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Repair,
    Unlock,
    Sale,
}

impl ServiceType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repair => "repair",
            Self::Unlock => "unlock",
            Self::Sale => "sale",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-way classification of service statuses used by the status filter
/// and the summary counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    Pending,
    Completed,
}

/// Workflow status of a service. Repairs, unlocks and sales each use their
/// own vocabulary, so anything unrecognised is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceStatus {
    Pending,
    Received,
    Diagnosed,
    InProgress,
    Completed,
    Delivered,
    Other(String),
}

impl ServiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Received => "received",
            Self::Diagnosed => "diagnosed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Delivered => "delivered",
            Self::Other(s) => s,
        }
    }

    /// Absent or `null` status: outside both buckets.
    pub fn unknown() -> Self {
        Self::Other(String::new())
    }

    /// `None` for statuses outside both buckets (e.g. `cancelled`).
    pub fn bucket(&self) -> Option<StatusBucket> {
        match self {
            Self::Pending | Self::Received | Self::Diagnosed | Self::InProgress => {
                Some(StatusBucket::Pending)
            }
            Self::Completed | Self::Delivered => Some(StatusBucket::Completed),
            Self::Other(_) => None,
        }
    }
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self::unknown()
    }
}

impl From<String> for ServiceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "received" => Self::Received,
            "diagnosed" => Self::Diagnosed,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "delivered" => Self::Delivered,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ServiceStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ServiceStatus> for String {
    fn from(value: ServiceStatus) -> Self {
        match value {
            ServiceStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of billable work for a customer: a repair, an unlock or a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ServiceStatus,
    /// Absent, `null` or unparseable on some rows; read through
    /// [`ServiceRecord::cost`].
    #[serde(default, deserialize_with = "lenient_cost")]
    pub cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

fn lenient_status<'de, D>(deserializer: D) -> std::result::Result<ServiceStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(ServiceStatus::from).unwrap_or_default())
}

fn lenient_cost<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCost {
        Amount(Decimal),
        Unreadable(IgnoredAny),
    }

    Ok(match Option::<RawCost>::deserialize(deserializer)? {
        Some(RawCost::Amount(cost)) => Some(cost),
        Some(RawCost::Unreadable(_)) => {
            warn!("unreadable service cost treated as absent");
            None
        }
        None => None,
    })
}

impl ServiceRecord {
    pub fn cost(&self) -> Decimal {
        self.cost.unwrap_or(Decimal::ZERO)
    }

    pub fn bucket(&self) -> Option<StatusBucket> {
        self.status.bucket()
    }
}
