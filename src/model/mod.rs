mod customer;
mod service;

pub use customer::CustomerDetail;
pub use service::{RecordId, ServiceRecord, ServiceStatus, ServiceType, StatusBucket};
