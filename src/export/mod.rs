pub mod csv;
pub mod json;

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::{OutputFormat, OUTPUT_FILE_PREFIX};
use crate::error::Result;
use crate::types::Event;

/// `forex_calendar_20240107_20240113.csv`, from the first and last event dates.
pub fn auto_file_name(events: &[Event], format: OutputFormat) -> Option<String> {
    let first = events.first()?;
    let last = events.last()?;
    Some(format!(
        "{OUTPUT_FILE_PREFIX}_{}_{}.{}",
        first.date.format("%Y%m%d"),
        last.date.format("%Y%m%d"),
        format.extension()
    ))
}

/// Write `events` in `format`. Returns the path written, or None for an empty set.
pub fn save(
    events: &[Event],
    format: OutputFormat,
    path: Option<&Path>,
    append: bool,
) -> Result<Option<PathBuf>> {
    let Some(path) = path
        .map(Path::to_path_buf)
        .or_else(|| auto_file_name(events, format).map(PathBuf::from))
        .filter(|_| !events.is_empty())
    else {
        warn!("[EXPORT] no events to write");
        return Ok(None);
    };

    match format {
        OutputFormat::Csv => csv::save_as_csv(events, &path, append)?,
        OutputFormat::Json => json::save_as_json(events, &path, append)?,
    }
    Ok(Some(path))
}
