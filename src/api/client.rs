use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::config::ApiSettings;
use crate::error::{Result, TiendaError};
use crate::model::{CustomerDetail, RecordId, ServiceRecord};

/// Anything that can hand the detail view one customer's profile and
/// service history.
pub trait CustomerSource {
    fn fetch_detail(&self, customer_id: &str) -> Result<CustomerDetail>;
}

/// Client for the dashboard's REST routes.
pub struct ApiClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        }
    }

    pub fn detail_url(&self, customer_id: &str) -> String {
        format!(
            "{}/api/customers/{}/details",
            self.base_url,
            urlencoding::encode(customer_id)
        )
    }
}

impl CustomerSource for ApiClient {
    fn fetch_detail(&self, customer_id: &str) -> Result<CustomerDetail> {
        let url = self.detail_url(customer_id);
        info!(%url, "fetching customer details");

        let mut request = self.agent.get(url.as_str()).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let body = request
            .call()
            .and_then(|mut response| response.body_mut().read_to_string())
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => TiendaError::FetchStatus {
                    customer: customer_id.to_string(),
                    status,
                },
                other => TiendaError::FetchFailed {
                    customer: customer_id.to_string(),
                    reason: other.to_string(),
                },
            })?;

        parse_detail_response(&body)
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: RawCustomerDetail,
}

/// Customer payload with service rows still untyped. Shared by the API
/// response and fixture files.
#[derive(Deserialize)]
pub(crate) struct RawCustomerDetail {
    id: RecordId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    services: Option<Vec<serde_json::Value>>,
}

impl RawCustomerDetail {
    pub(crate) fn into_detail(self) -> CustomerDetail {
        let services = parse_services(&self.id, self.services.unwrap_or_default());
        CustomerDetail {
            id: self.id,
            name: self.name.unwrap_or_default(),
            phone: self.phone,
            email: self.email,
            notes: self.notes,
            services,
        }
    }
}

/// Type service rows one at a time. A row that cannot be typed at all
/// (no `id`, unknown `type`, unreadable `created_at`) is dropped with a
/// warning; missing status or cost only degrade the row.
pub(crate) fn parse_services(
    customer: &RecordId,
    rows: Vec<serde_json::Value>,
) -> Vec<ServiceRecord> {
    let total = rows.len();
    let services: Vec<ServiceRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value::<ServiceRecord>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(customer = %customer, row = idx, error = %e, "skipping malformed service record");
                None
            }
        })
        .collect();
    debug!(customer = %customer, kept = services.len(), total, "parsed service history");
    services
}

/// Parse a `{ "data": CustomerDetail }` body.
pub fn parse_detail_response(body: &str) -> Result<CustomerDetail> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| TiendaError::InvalidResponse(e.to_string()))?;
    Ok(envelope.data.into_detail())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ServiceStatus, ServiceType};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_envelope() {
        let body = r#"{
            "data": {
                "id": "c-1",
                "name": "Lucía Pérez",
                "phone": "+34 600 000 000",
                "services": [
                    {"id": "s1", "type": "repair", "status": "received", "cost": 89.9,
                     "created_at": "2026-04-02T09:00:00Z"},
                    {"id": 7, "type": "sale", "status": "completed", "cost": "15.00",
                     "created_at": "2026-04-03T12:00:00+02:00",
                     "completed_at": "2026-04-03T12:05:00+02:00"}
                ]
            }
        }"#;
        let detail = parse_detail_response(body).unwrap();
        assert_eq!(detail.name, "Lucía Pérez");
        assert_eq!(detail.email, None);
        assert_eq!(detail.services.len(), 2);
        assert_eq!(detail.services[0].status, ServiceStatus::Received);
        assert_eq!(detail.services[0].cost(), dec!(89.9));
        assert_eq!(detail.services[1].id, RecordId::from("7"));
        assert_eq!(detail.services[1].service_type, ServiceType::Sale);
        assert_eq!(detail.services[1].cost(), dec!(15));
        assert!(detail.services[1].completed_at.is_some());
    }

    #[test]
    fn test_rows_with_missing_status_or_bad_cost_are_kept() {
        let body = r#"{"data": {"id": "c-1", "name": "Ana", "services": [
            {"id": "a", "type": "repair", "status": "pending", "cost": 10, "created_at": "2026-04-01T09:00:00Z"},
            {"id": "b", "type": "repair", "cost": 20, "created_at": "2026-04-02T09:00:00Z"},
            {"id": "c", "type": "unlock", "status": null, "cost": 30, "created_at": "2026-04-03T09:00:00Z"},
            {"id": "d", "type": "sale", "status": "completed", "cost": "n/a", "created_at": "2026-04-04T09:00:00Z"}
        ]}}"#;
        let detail = parse_detail_response(body).unwrap();
        assert_eq!(detail.services.len(), 4);

        let summary = crate::history::ServiceSummary::from_services(&detail.services);
        assert_eq!(summary.total_services, 4);
        assert_eq!(summary.total_spent, dec!(60));
        assert_eq!(summary.pending_services, 1);
        assert_eq!(summary.completed_services, 1);
    }

    #[test]
    fn test_malformed_rows_are_dropped_not_fatal() {
        let body = r#"{"data": {"id": "c-1", "name": "Ana", "services": [
            {"id": "ok", "type": "unlock", "status": "pending", "created_at": "2026-04-02T09:00:00Z"},
            {"id": "bad-type", "type": "trade_in", "status": "pending", "created_at": "2026-04-02T09:00:00Z"},
            {"id": "bad-date", "type": "repair", "status": "pending", "created_at": "yesterday"},
            {"type": "repair", "status": "pending", "created_at": "2026-04-02T09:00:00Z"}
        ]}}"#;
        let detail = parse_detail_response(body).unwrap();
        assert_eq!(detail.services.len(), 1);
        assert_eq!(detail.services[0].id, RecordId::from("ok"));
        assert_eq!(detail.services[0].cost(), Decimal::ZERO);
    }

    #[test]
    fn test_missing_services_is_empty_history() {
        let detail = parse_detail_response(r#"{"data": {"id": 12, "name": "Ana", "services": null}}"#)
            .unwrap();
        assert!(detail.services.is_empty());
        assert_eq!(detail.id, RecordId::from("12"));
    }

    #[test]
    fn test_bad_envelope_is_invalid_response() {
        let err = parse_detail_response(r#"{"error": "nope"}"#).unwrap_err();
        assert!(matches!(err, TiendaError::InvalidResponse(_)));
        let err = parse_detail_response("<html>").unwrap_err();
        assert!(matches!(err, TiendaError::InvalidResponse(_)));
    }

    #[test]
    fn test_detail_url_trims_trailing_slash() {
        let client = ApiClient::new(&ApiSettings {
            base_url: "https://shop.example.com/".to_string(),
            timeout_secs: 2,
            token: None,
        });
        assert_eq!(
            client.detail_url("abc"),
            "https://shop.example.com/api/customers/abc/details"
        );
    }

    #[test]
    fn test_detail_url_encodes_customer_id() {
        let client = ApiClient::new(&ApiSettings::default());
        assert_eq!(
            client.detail_url("../../admin?x=1"),
            "http://localhost:3000/api/customers/..%2F..%2Fadmin%3Fx%3D1/details"
        );
        assert_eq!(
            client.detail_url("ana maria#2"),
            "http://localhost:3000/api/customers/ana%20maria%232/details"
        );
    }

    #[test]
    fn test_unreachable_server_is_fetch_failure() {
        let client = ApiClient::new(&ApiSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            token: None,
        });
        let err = client.fetch_detail("abc").unwrap_err();
        assert!(matches!(err, TiendaError::FetchFailed { .. }));
        assert!(err.to_string().contains("Could not load customer details"));
    }
}
