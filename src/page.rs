use scraper::Html;
use tracing::debug;

use crate::calendar::fields::{compile, visible_text};
use crate::calendar::{resolve_offset, walk_rows, WalkStats};
use crate::config::selectors;
use crate::error::{AppError, Result};
use crate::types::{Event, QueryPeriod};

/// Everything pulled out of one calendar page.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub period: QueryPeriod,
    pub tz_offset: i32,
    pub events: Vec<Event>,
    pub stats: WalkStats,
}

/// A fetched calendar page, parsed into a document tree.
pub struct CalendarPage {
    doc: Html,
}

impl CalendarPage {
    pub fn parse(html: &str) -> Self {
        Self { doc: Html::parse_document(html) }
    }

    /// Text of the `Calendar Time Zone: ...` header. Missing header is fatal.
    pub fn tz_header(&self) -> Result<String> {
        let sel = compile(selectors::TZ_HEADER)?;
        self.doc
            .select(&sel)
            .next()
            .map(visible_text)
            .ok_or_else(|| AppError::TimezoneHeader("<header not found>".to_string()))
    }

    /// Header → offset → walk of the data rows.
    pub fn extract(&self, period: QueryPeriod) -> Result<Extraction> {
        let tz_offset = resolve_offset(&self.tz_header()?)?;

        let table_sel = compile(selectors::TABLE)?;
        let row_sel = compile(selectors::DATA_ROW)?;
        let table = self.doc.select(&table_sel).next().ok_or(AppError::TableNotFound)?;
        let rows = table.select(&row_sel);

        debug!(tz_offset, period = %period, "[PAGE] walking calendar table");
        let (events, stats) = walk_rows(rows, period.target_year(), tz_offset)?;
        Ok(Extraction { period, tz_offset, events, stats })
    }
}

/// Run the whole pipeline on an already-fetched page.
pub fn extract_events(html: &str, period: QueryPeriod) -> Result<Extraction> {
    CalendarPage::parse(html).extract(period)
}
