use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{ServiceRecord, StatusBucket};

/// Counters shown above the filtered service history.
///
/// `pending_services + completed_services` can be less than
/// `total_services` when some statuses fall outside both buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ServiceSummary {
    pub total_services: usize,
    pub total_spent: Decimal,
    pub pending_services: usize,
    pub completed_services: usize,
}

impl ServiceSummary {
    pub fn from_services<'a, I>(services: I) -> Self
    where
        I: IntoIterator<Item = &'a ServiceRecord>,
    {
        services
            .into_iter()
            .fold(Self::default(), |mut summary, record| {
                summary.total_services += 1;
                summary.total_spent += record.cost();
                match record.bucket() {
                    Some(StatusBucket::Pending) => summary.pending_services += 1,
                    Some(StatusBucket::Completed) => summary.completed_services += 1,
                    None => {}
                }
                summary
            })
    }
}
