pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod page;
pub mod types;

pub use error::{AppError, Result, RowError};
pub use fetcher::{load_daily_data, load_monthly_data, load_period, load_weekly_data};
pub use page::{extract_events, Extraction};
pub use types::{Event, EventState, Field, QueryPeriod};
