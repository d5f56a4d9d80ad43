pub mod config;
pub mod error;
pub mod filters;
pub mod types;

pub use config::AppConfig;
pub use error::{GridError, GridResult};
pub use filters::GridFilters;
pub use types::{Counters, FactRecord, Platform};
