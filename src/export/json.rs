use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::types::Event;

/// JSON view of an event: the stored fields plus the derived instant.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    #[serde(flatten)]
    pub event: &'a Event,
    /// RFC 3339 with the feed's offset, e.g. `2024-01-09T08:30:00-04:00`.
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl<'a> From<&'a Event> for EventRecord<'a> {
    fn from(event: &'a Event) -> Self {
        Self { event, timestamp: event.timestamp() }
    }
}

pub fn write_json<W: Write>(w: W, events: &[Event]) -> Result<()> {
    let records: Vec<EventRecord<'_>> = events.iter().map(EventRecord::from).collect();
    serde_json::to_writer(w, &records)?;
    Ok(())
}

/// Write one JSON array. With `append`, an existing array at `path` is kept
/// and the new records are added after it.
pub fn save_as_json(events: &[Event], path: &Path, append: bool) -> Result<()> {
    let mut existing: Vec<serde_json::Value> = if append && path.exists() {
        serde_json::from_reader(BufReader::new(File::open(path)?))?
    } else {
        Vec::new()
    };
    let kept = existing.len();

    for event in events {
        existing.push(serde_json::to_value(EventRecord::from(event))?);
    }

    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, &existing)?;
    out.flush()?;

    info!(
        events = events.len(),
        kept,
        "[EXPORT] wrote {} events to {}",
        events.len(),
        path.display()
    );
    Ok(())
}
