pub mod api;
pub mod config;
pub mod demo;
pub mod detail;
pub mod error;
pub mod format;
pub mod history;
pub mod model;

pub use api::{ApiClient, CustomerSource};
pub use config::Config;
pub use demo::DemoFixtures;
pub use detail::{DetailView, FetchTicket, ViewPhase};
pub use error::{ParseFilterError, Result, TiendaError};
pub use history::{
    filter_services, CustomDateRange, DateFilter, FilterState, ServiceSummary, StatusFilter,
    TypeFilter,
};
pub use model::{CustomerDetail, RecordId, ServiceRecord, ServiceStatus, ServiceType, StatusBucket};
