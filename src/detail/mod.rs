mod view;

pub use view::{DetailView, FetchTicket, ViewPhase};
