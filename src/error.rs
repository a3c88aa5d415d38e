use thiserror::Error;

use crate::types::Field;

/// Failures that abort a whole extraction. Propagated to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("No data available: earliest data is from {0}")]
    NoDataAvailable(chrono::NaiveDate),

    #[error("Unparseable timezone header: {0:?}")]
    TimezoneHeader(String),

    #[error("Calendar table not found in document")]
    TableNotFound,

    #[error("Invalid CSS selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures scoped to a single table row. The walker records them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("structure mismatch: no cell for field `{field}`")]
    StructureMismatch { field: Field },

    #[error("missing temporal anchor: `{field}` is empty and no earlier row supplied one")]
    MissingTemporalAnchor { field: Field },

    #[error("unparseable date text {raw:?}")]
    UnparseableDate { raw: String },

    #[error("unparseable time text {raw:?}")]
    UnparseableTime { raw: String },

    #[error("missing or non-integer event id {raw:?}")]
    InvalidEventId { raw: String },
}

impl RowError {
    /// Short stable label used in logs and skip counters.
    pub fn kind(&self) -> &'static str {
        match self {
            RowError::StructureMismatch { .. } => "structure_mismatch",
            RowError::MissingTemporalAnchor { .. } => "missing_temporal_anchor",
            RowError::UnparseableDate { .. } => "unparseable_date",
            RowError::UnparseableTime { .. } => "unparseable_time",
            RowError::InvalidEventId { .. } => "invalid_event_id",
        }
    }
}
