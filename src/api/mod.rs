mod client;

pub(crate) use client::RawCustomerDetail;
pub use client::{parse_detail_response, ApiClient, CustomerSource};
