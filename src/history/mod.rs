mod date_range;
mod filter;
mod summary;

pub use date_range::{in_date_range, CustomDateRange, DateFilter};
pub use filter::{filter_services, status_matches, type_matches, FilterState, StatusFilter, TypeFilter};
pub use summary::ServiceSummary;
