use chrono::{NaiveDate, NaiveTime};

use crate::calendar::rules::{parse_date, parse_time};
use crate::error::RowError;
use crate::types::Field;

/// Last date/time resolved in the current table.
///
/// The calendar prints the date only on the first row of each day, and the
/// time only when it changes. Blank cells take the previous row's value.
/// Resolving never mutates; the walker calls [`CarryForward::advance`] once a
/// row has been accepted, so a skipped row never moves the anchor.
#[derive(Debug, Default, Clone)]
pub struct CarryForward {
    previous_date: Option<NaiveDate>,
    previous_time: Option<NaiveTime>,
}

impl CarryForward {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_date(&self) -> Option<NaiveDate> {
        self.previous_date
    }

    pub fn previous_time(&self) -> Option<NaiveTime> {
        self.previous_time
    }

    pub fn resolve_date(&self, raw: &str, year: i32) -> Result<NaiveDate, RowError> {
        resolve(raw, self.previous_date, Field::Date, |s| parse_date(s, year))
    }

    pub fn resolve_time(&self, raw: &str) -> Result<NaiveTime, RowError> {
        resolve(raw, self.previous_time, Field::Time, parse_time)
    }

    pub fn advance(&mut self, date: NaiveDate, time: NaiveTime) {
        self.previous_date = Some(date);
        self.previous_time = Some(time);
    }
}

fn resolve<T: Copy>(
    raw: &str,
    previous: Option<T>,
    field: Field,
    parse: impl FnOnce(&str) -> Result<T, RowError>,
) -> Result<T, RowError> {
    let raw = raw.trim();
    if raw.is_empty() {
        previous.ok_or(RowError::MissingTemporalAnchor { field })
    } else {
        parse(raw)
    }
}
