use serde::{Deserialize, Serialize};

use super::{RecordId, ServiceRecord};

/// Profile and service history shown in the customer detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetail {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
}
