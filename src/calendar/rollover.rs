use chrono::{Datelike, NaiveDate};

use crate::error::RowError;

/// Running year for a table that never prints one.
///
/// A week or month window can cross December → January. When a freshly
/// resolved date sorts before the previous row's date, the year has rolled
/// over: bump it by one and re-stamp the date. At most one bump per row.
#[derive(Debug, Clone)]
pub struct YearRollover {
    year: i32,
    rollovers: u32,
}

impl YearRollover {
    pub fn new(target_year: i32) -> Self {
        Self { year: target_year, rollovers: 0 }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Number of bumps applied so far.
    pub fn rollovers(&self) -> u32 {
        self.rollovers
    }

    /// `previous` is the carry-forward date before this row is accepted.
    /// The year is only bumped if the re-stamped date exists (Feb 29).
    pub fn apply(
        &mut self,
        date: NaiveDate,
        previous: Option<NaiveDate>,
    ) -> Result<NaiveDate, RowError> {
        match previous {
            Some(prev) if date < prev => {
                let next_year = self.year + 1;
                let restamped = date.with_year(next_year).ok_or_else(|| RowError::UnparseableDate {
                    raw: date.format("%b %d").to_string(),
                })?;
                self.year = next_year;
                self.rollovers += 1;
                Ok(restamped)
            }
            _ => Ok(date),
        }
    }
}
