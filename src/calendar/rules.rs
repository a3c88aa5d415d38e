//! Per-field interpretation of raw cells.
//!
//! Each field owns one rule in [`RULES`]. A rule reads only its own cell and
//! writes only its own slot of the [`RowDraft`], so rules can run in any order
//! and be tested one at a time.

use chrono::{NaiveDate, NaiveTime};

use crate::calendar::carry::CarryForward;
use crate::calendar::fields::RawCell;
use crate::error::RowError;
use crate::types::{Event, EventState, Field, ALL_DAY};

/// Read-only context a rule may consult.
pub struct RuleContext<'s> {
    /// Running year; the table never prints one.
    pub year: i32,
    pub carry: &'s CarryForward,
}

/// Partially-assembled event. Every slot is filled by exactly one rule.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RowDraft {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub currency: String,
    pub impact: Option<String>,
    pub event: String,
    pub actual: String,
    pub state: EventState,
    pub forecast: String,
    pub previous: String,
}

impl RowDraft {
    pub fn finish(self, eventid: u64, tz_offset: i32) -> Result<Event, RowError> {
        let date = self
            .date
            .ok_or(RowError::MissingTemporalAnchor { field: Field::Date })?;
        let time = self
            .time
            .ok_or(RowError::MissingTemporalAnchor { field: Field::Time })?;
        Ok(Event {
            date,
            time,
            tz_offset,
            currency: self.currency,
            impact: self.impact,
            event: self.event,
            eventid,
            actual: self.actual,
            forecast: self.forecast,
            previous: self.previous,
            state: self.state,
        })
    }
}

pub type Rule = fn(&RawCell, &RuleContext<'_>, &mut RowDraft) -> Result<(), RowError>;

pub const RULES: [(Field, Rule); 8] = [
    (Field::Date, date_rule),
    (Field::Time, time_rule),
    (Field::Currency, currency_rule),
    (Field::Impact, impact_rule),
    (Field::Event, event_rule),
    (Field::Actual, actual_rule),
    (Field::Forecast, forecast_rule),
    (Field::Previous, previous_rule),
];

fn date_rule(cell: &RawCell, ctx: &RuleContext<'_>, draft: &mut RowDraft) -> Result<(), RowError> {
    let raw = if cell.text.is_empty() {
        ""
    } else {
        // A dated cell without the nested span means the markup changed.
        cell.detail
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or(RowError::StructureMismatch { field: Field::Date })?
    };
    draft.date = Some(ctx.carry.resolve_date(raw, ctx.year)?);
    Ok(())
}

fn time_rule(cell: &RawCell, ctx: &RuleContext<'_>, draft: &mut RowDraft) -> Result<(), RowError> {
    draft.time = Some(ctx.carry.resolve_time(&cell.text)?);
    Ok(())
}

fn currency_rule(cell: &RawCell, _: &RuleContext<'_>, draft: &mut RowDraft) -> Result<(), RowError> {
    draft.currency = cell.text.clone();
    Ok(())
}

fn impact_rule(cell: &RawCell, _: &RuleContext<'_>, draft: &mut RowDraft) -> Result<(), RowError> {
    draft.impact = classify_impact(cell);
    Ok(())
}

fn event_rule(cell: &RawCell, _: &RuleContext<'_>, draft: &mut RowDraft) -> Result<(), RowError> {
    draft.event = cell.text.clone();
    Ok(())
}

fn actual_rule(cell: &RawCell, _: &RuleContext<'_>, draft: &mut RowDraft) -> Result<(), RowError> {
    draft.actual = cell.text.clone();
    draft.state = classify_state(&cell.markup);
    Ok(())
}

fn forecast_rule(cell: &RawCell, _: &RuleContext<'_>, draft: &mut RowDraft) -> Result<(), RowError> {
    draft.forecast = cell.text.clone();
    Ok(())
}

fn previous_rule(cell: &RawCell, _: &RuleContext<'_>, draft: &mut RowDraft) -> Result<(), RowError> {
    draft.previous = cell.text.clone();
    Ok(())
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Severity is encoded in the marker's class, not its text. The same channel
/// carries the "holiday" marker for non-economic rows.
pub fn classify_impact(cell: &RawCell) -> Option<String> {
    cell.detail.clone().filter(|c| !c.is_empty())
}

/// First marker found in the cell markup wins.
pub fn classify_state(markup: &str) -> EventState {
    if markup.contains("better") {
        EventState::Better
    } else if markup.contains("worse") {
        EventState::Worse
    } else {
        EventState::Neutral
    }
}

/// `Jan 7` read against the running year.
pub fn parse_date(raw: &str, year: i32) -> Result<NaiveDate, RowError> {
    NaiveDate::parse_from_str(&format!("{year} {raw}"), "%Y %b %d").map_err(|_| {
        RowError::UnparseableDate { raw: raw.to_string() }
    })
}

/// `8:30am`, or any text containing "Day" ("All Day", "Day 2") as [`ALL_DAY`].
pub fn parse_time(raw: &str) -> Result<NaiveTime, RowError> {
    if raw.contains("Day") {
        return Ok(ALL_DAY);
    }
    NaiveTime::parse_from_str(raw, "%I:%M%p").map_err(|_| RowError::UnparseableTime {
        raw: raw.to_string(),
    })
}
