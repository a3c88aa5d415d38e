use std::collections::BTreeMap;

use scraper::ElementRef;
use tracing::{debug, info};

use crate::calendar::row::{event_id, RowOutcome, RowParser, WalkState};
use crate::error::{Result, RowError};
use crate::types::Event;

/// A row the walker dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Position among the data rows handed to the walker (0-based).
    pub index: usize,
    pub eventid: Option<u64>,
    pub error: RowError,
}

#[derive(Debug, Default, Clone)]
pub struct WalkStats {
    pub rows_seen: usize,
    pub events: usize,
    pub reached_end_marker: bool,
    pub year_rollovers: u32,
    pub skipped: Vec<SkippedRow>,
}

impl WalkStats {
    /// Skip counts keyed by [`RowError::kind`].
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for s in &self.skipped {
            *counts.entry(s.error.kind()).or_insert(0) += 1;
        }
        counts
    }
}

/// Walks the data rows of one fetched table in document order.
///
/// One walker per fetch: the carry-forward anchor and running year are
/// private to it and start fresh in [`TableWalker::new`].
pub struct TableWalker {
    parser: RowParser,
    state: WalkState,
    events: Vec<Event>,
    stats: WalkStats,
}

impl TableWalker {
    pub fn new(target_year: i32, tz_offset: i32) -> Result<Self> {
        Ok(Self {
            parser: RowParser::new(tz_offset)?,
            state: WalkState::new(target_year),
            events: Vec::new(),
            stats: WalkStats::default(),
        })
    }

    /// Consume the rows up to the end marker and return what was accepted.
    pub fn walk<'a, I>(mut self, rows: I) -> (Vec<Event>, WalkStats)
    where
        I: IntoIterator<Item = ElementRef<'a>>,
    {
        for (index, row) in rows.into_iter().enumerate() {
            self.stats.rows_seen += 1;
            match self.step(row) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(row = index, "[WALKER] end marker, ignoring remaining rows");
                    self.stats.reached_end_marker = true;
                    break;
                }
                Err(error) => {
                    let eventid = event_id(row).ok();
                    debug!(
                        row = index,
                        eventid,
                        reason = error.kind(),
                        "[WALKER] skipped row {index}: {error}"
                    );
                    self.stats.skipped.push(SkippedRow { index, eventid, error });
                }
            }
        }

        self.stats.events = self.events.len();
        self.stats.year_rollovers = self.state.rollover.rollovers();
        info!(
            rows = self.stats.rows_seen,
            events = self.stats.events,
            skipped = self.stats.skipped.len(),
            rollovers = self.stats.year_rollovers,
            "[WALKER] {} events from {} rows | skipped: {:?}",
            self.stats.events,
            self.stats.rows_seen,
            self.stats.skip_counts(),
        );
        (self.events, self.stats)
    }

    /// Ok(false) on the end marker.
    fn step(&mut self, row: ElementRef<'_>) -> std::result::Result<bool, RowError> {
        let mut event = match self.parser.parse(row, &self.state)? {
            RowOutcome::EndOfTable => return Ok(false),
            RowOutcome::Event(e) => e,
        };

        event.date = self
            .state
            .rollover
            .apply(event.date, self.state.carry.previous_date())?;
        self.state.carry.advance(event.date, event.time);
        self.events.push(event);
        Ok(true)
    }
}

/// Convenience wrapper: fresh walker, one pass.
pub fn walk_rows<'a, I>(rows: I, target_year: i32, tz_offset: i32) -> Result<(Vec<Event>, WalkStats)>
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    Ok(TableWalker::new(target_year, tz_offset)?.walk(rows))
}
