use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::api::CustomerSource;
use crate::error::Result;
use crate::history::{
    filter_services, CustomDateRange, DateFilter, FilterState, ServiceSummary, StatusFilter,
    TypeFilter,
};
use crate::model::{CustomerDetail, ServiceRecord};

/// Handle for one in-flight detail fetch. Only the ticket issued by the
/// latest [`DetailView::open`] may deliver a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    customer_id: String,
}

impl FetchTicket {
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewPhase {
    #[default]
    Closed,
    Opening {
        customer_id: String,
    },
    Open(CustomerDetail),
    Failed {
        customer_id: String,
        message: String,
    },
}

/// Customer detail panel: the loaded payload plus the user's filter
/// controls over its service history.
#[derive(Debug, Default)]
pub struct DetailView {
    phase: ViewPhase,
    filters: FilterState,
    generation: u64,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start showing `customer_id`. Filters go back to defaults and any
    /// previous payload is dropped before the fetch is issued.
    pub fn open(&mut self, customer_id: &str) -> FetchTicket {
        self.generation += 1;
        self.filters = FilterState::default();
        self.phase = ViewPhase::Opening {
            customer_id: customer_id.to_string(),
        };
        debug!(customer = customer_id, generation = self.generation, "opening detail view");
        FetchTicket {
            generation: self.generation,
            customer_id: customer_id.to_string(),
        }
    }

    /// Apply a fetch result. Returns `false` and leaves the view untouched
    /// when the ticket is stale (the view was closed or reopened since).
    pub fn deliver(&mut self, ticket: &FetchTicket, result: Result<CustomerDetail>) -> bool {
        let expected = matches!(
            &self.phase,
            ViewPhase::Opening { customer_id } if *customer_id == ticket.customer_id
        );
        if ticket.generation != self.generation || !expected {
            debug!(
                customer = %ticket.customer_id,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale detail response"
            );
            return false;
        }

        self.phase = match result {
            Ok(detail) => ViewPhase::Open(detail),
            Err(e) => {
                warn!(customer = %ticket.customer_id, error = %e, "detail fetch failed");
                ViewPhase::Failed {
                    customer_id: ticket.customer_id.clone(),
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// Open, fetch from `source` and deliver in one step.
    pub fn load<S>(&mut self, source: &S, customer_id: &str) -> bool
    where
        S: CustomerSource + ?Sized,
    {
        let ticket = self.open(customer_id);
        let result = source.fetch_detail(ticket.customer_id());
        self.deliver(&ticket, result)
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.phase = ViewPhase::Closed;
        self.filters = FilterState::default();
        debug!(generation = self.generation, "closed detail view");
    }

    pub fn dismiss_error(&mut self) {
        if matches!(self.phase, ViewPhase::Failed { .. }) {
            self.close();
        }
    }

    pub fn phase(&self) -> &ViewPhase {
        &self.phase
    }

    pub fn detail(&self) -> Option<&CustomerDetail> {
        match &self.phase {
            ViewPhase::Open(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ViewPhase::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn set_date_filter(&mut self, date: DateFilter) {
        self.filters.date = date;
    }

    pub fn set_custom_range(&mut self, range: CustomDateRange) {
        self.filters.custom_range = range;
    }

    pub fn set_type_filter(&mut self, service_type: TypeFilter) {
        self.filters.service_type = service_type;
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filters.status = status;
    }

    /// Filtered history under the current filters; empty unless a payload
    /// is loaded.
    pub fn services(&self, now: DateTime<Utc>) -> Vec<&ServiceRecord> {
        match self.detail() {
            Some(detail) => filter_services(&detail.services, &self.filters, now),
            None => Vec::new(),
        }
    }

    pub fn summary(&self, now: DateTime<Utc>) -> ServiceSummary {
        ServiceSummary::from_services(self.services(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoFixtures;
    use crate::error::TiendaError;
    use crate::model::{RecordId, ServiceType};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 20, 14, 30, 0).unwrap()
    }

    fn customer(id: &str) -> CustomerDetail {
        CustomerDetail {
            id: RecordId::from(id),
            name: format!("Customer {id}"),
            phone: None,
            email: None,
            notes: None,
            services: Vec::new(),
        }
    }

    #[test]
    fn test_open_resets_filters() {
        let mut view = DetailView::new();
        let ticket = view.open("a");
        assert!(view.deliver(&ticket, Ok(customer("a"))));
        view.set_date_filter(DateFilter::Last7Days);
        view.set_type_filter(TypeFilter::Only(ServiceType::Sale));
        view.set_status_filter(StatusFilter::Completed);
        view.set_custom_range(CustomDateRange::new(None, now().date_naive().pred_opt()));

        view.close();
        view.open("b");
        assert_eq!(*view.filters(), FilterState::default());
        assert!(view.detail().is_none());
    }

    #[test]
    fn test_reopen_without_close_resets_filters_and_payload() {
        let mut view = DetailView::new();
        let ticket = view.open("a");
        view.deliver(&ticket, Ok(customer("a")));
        view.set_status_filter(StatusFilter::Pending);

        view.open("b");
        assert_eq!(*view.filters(), FilterState::default());
        assert_eq!(
            *view.phase(),
            ViewPhase::Opening {
                customer_id: "b".to_string()
            }
        );
    }

    #[test]
    fn test_late_response_for_previous_customer_is_discarded() {
        let mut view = DetailView::new();
        let ticket_a = view.open("a");
        view.close();
        let ticket_b = view.open("b");

        assert!(!view.deliver(&ticket_a, Ok(customer("a"))));
        assert!(view.detail().is_none());

        assert!(view.deliver(&ticket_b, Ok(customer("b"))));
        assert_eq!(view.detail().map(|d| d.name.as_str()), Some("Customer b"));
    }

    #[test]
    fn test_response_after_close_is_discarded() {
        let mut view = DetailView::new();
        let ticket = view.open("a");
        view.close();
        assert!(!view.deliver(&ticket, Ok(customer("a"))));
        assert_eq!(*view.phase(), ViewPhase::Closed);
    }

    #[test]
    fn test_reopening_same_customer_invalidates_older_ticket() {
        let mut view = DetailView::new();
        let first = view.open("a");
        let second = view.open("a");
        assert!(!view.deliver(&first, Ok(customer("a"))));
        assert!(view.deliver(&second, Ok(customer("a"))));
    }

    #[test]
    fn test_fetch_failure_shows_error_and_empty_state() {
        let mut view = DetailView::new();
        let ticket = view.open("a");
        let applied = view.deliver(
            &ticket,
            Err(TiendaError::FetchStatus {
                customer: "a".to_string(),
                status: 500,
            }),
        );
        assert!(applied);
        assert!(view.error().unwrap().contains("500"));
        assert!(view.services(now()).is_empty());
        assert_eq!(view.summary(now()), ServiceSummary::default());

        view.dismiss_error();
        assert_eq!(*view.phase(), ViewPhase::Closed);
        assert!(view.error().is_none());
    }

    #[test]
    fn test_load_from_fixtures_and_filter() {
        let fixtures = DemoFixtures::sample(now());
        let mut view = DetailView::new();
        assert!(view.load(&fixtures, "c-001"));

        let all = view.summary(now());
        assert_eq!(all.total_services, view.detail().unwrap().services.len());

        view.set_status_filter(StatusFilter::Completed);
        let completed = view.summary(now());
        assert_eq!(completed.total_services, completed.completed_services);
        assert!(completed.total_services < all.total_services);
    }

    #[test]
    fn test_set_filters_replaces_all_controls_until_reopen() {
        let fixtures = DemoFixtures::sample(now());
        let mut view = DetailView::new();
        view.load(&fixtures, "c-001");
        view.set_date_filter(DateFilter::Last7Days);

        view.set_filters(FilterState {
            date: DateFilter::All,
            custom_range: CustomDateRange::default(),
            service_type: TypeFilter::Only(ServiceType::Repair),
            status: StatusFilter::Pending,
        });
        let ids: Vec<_> = view.services(now()).iter().map(|s| s.id.0.clone()).collect();
        assert_eq!(ids, vec!["s-105"]);
        assert_eq!(view.summary(now()).total_spent, dec!(120));

        view.load(&fixtures, "c-002");
        assert_eq!(*view.filters(), FilterState::default());
    }

    #[test]
    fn test_load_unknown_customer_fails() {
        let fixtures = DemoFixtures::sample(now());
        let mut view = DetailView::new();
        assert!(view.load(&fixtures, "nobody"));
        assert!(view.error().unwrap().contains("nobody"));
    }
}
