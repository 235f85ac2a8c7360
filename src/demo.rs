//! Static data for demo mode.
//!
//! Fixtures are an ordinary value handed to whoever needs a
//! [`CustomerSource`], so tests can build their own.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::api::{CustomerSource, RawCustomerDetail};
use crate::error::{Result, TiendaError};
use crate::model::{
    CustomerDetail, RecordId, ServiceRecord, ServiceStatus, ServiceType, StatusBucket,
};

#[derive(Debug, Clone, Default)]
pub struct DemoFixtures {
    customers: Vec<CustomerDetail>,
}

impl DemoFixtures {
    pub fn new(customers: Vec<CustomerDetail>) -> Self {
        Self { customers }
    }

    /// Load a JSON array of customer details. Service rows go through the
    /// same per-row checks as API responses.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let raw: Vec<RawCustomerDetail> =
            serde_json::from_str(&content).map_err(|e| TiendaError::FixtureParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self {
            customers: raw.into_iter().map(RawCustomerDetail::into_detail).collect(),
        })
    }

    /// Built-in shop data with dates relative to `now`.
    pub fn sample(now: DateTime<Utc>) -> Self {
        let service = |id: &str,
                       service_type: ServiceType,
                       status: &str,
                       cost: Option<Decimal>,
                       days_ago: i64| {
            let created_at = now - Duration::days(days_ago);
            let status = ServiceStatus::from(status);
            let completed_at = (status.bucket() == Some(StatusBucket::Completed))
                .then(|| created_at + Duration::hours(3));
            ServiceRecord {
                id: RecordId::from(id),
                service_type,
                status,
                cost,
                created_at,
                completed_at,
            }
        };

        Self::new(vec![
            CustomerDetail {
                id: RecordId::from("c-001"),
                name: "María García".to_string(),
                phone: Some("+34 612 345 678".to_string()),
                email: Some("maria.garcia@example.com".to_string()),
                notes: Some("Prefers WhatsApp".to_string()),
                services: vec![
                    service("s-101", ServiceType::Repair, "delivered", Some(Decimal::new(8990, 2)), 2),
                    service("s-102", ServiceType::Unlock, "pending", Some(Decimal::new(2500, 2)), 5),
                    service("s-103", ServiceType::Sale, "completed", Some(Decimal::new(1250, 2)), 20),
                    service("s-104", ServiceType::Repair, "cancelled", Some(Decimal::new(6000, 2)), 45),
                    service("s-105", ServiceType::Repair, "in_progress", Some(Decimal::new(12000, 2)), 100),
                    service("s-106", ServiceType::Sale, "completed", Some(Decimal::new(34900, 2)), 400),
                ],
            },
            CustomerDetail {
                id: RecordId::from("c-002"),
                name: "Jordi Puig".to_string(),
                phone: Some("+34 699 111 222".to_string()),
                email: None,
                notes: None,
                services: vec![
                    service("s-201", ServiceType::Repair, "diagnosed", Some(Decimal::new(4500, 2)), 1),
                    service("s-202", ServiceType::Sale, "completed", None, 3),
                    service("s-203", ServiceType::Unlock, "completed", Some(Decimal::new(3000, 2)), 200),
                ],
            },
            CustomerDetail {
                id: RecordId::from("c-003"),
                name: "Carmen López".to_string(),
                phone: None,
                email: Some("carmen@example.com".to_string()),
                notes: None,
                services: Vec::new(),
            },
        ])
    }

    pub fn customers(&self) -> &[CustomerDetail] {
        &self.customers
    }
}

impl CustomerSource for DemoFixtures {
    fn fetch_detail(&self, customer_id: &str) -> Result<CustomerDetail> {
        self.customers
            .iter()
            .find(|c| c.id.0 == customer_id)
            .cloned()
            .ok_or_else(|| TiendaError::CustomerNotFound(customer_id.to_string()))
    }
}
