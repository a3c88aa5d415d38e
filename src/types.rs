use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Table fields
// ---------------------------------------------------------------------------

/// One of the cells read from every calendar row, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Date,
    Time,
    Currency,
    Impact,
    Event,
    Actual,
    Forecast,
    Previous,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Date,
        Field::Time,
        Field::Currency,
        Field::Impact,
        Field::Event,
        Field::Actual,
        Field::Forecast,
        Field::Previous,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Time => "time",
            Field::Currency => "currency",
            Field::Impact => "impact",
            Field::Event => "event",
            Field::Actual => "actual",
            Field::Forecast => "forecast",
            Field::Previous => "previous",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Actual-vs-forecast state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    Better,
    Worse,
    /// No marker on the actual cell (not yet released, or in line).
    #[default]
    Neutral,
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventState::Better => "better",
            EventState::Worse => "worse",
            EventState::Neutral => "neutral",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Time recorded for "All Day" and "Day N" rows.
pub const ALL_DAY: NaiveTime = NaiveTime::MIN;

/// One reconstructed calendar row. Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Calendar date in the feed's local timezone.
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Whole hours east of UTC, identical for every event of one fetch.
    pub tz_offset: i32,
    pub currency: String,
    /// Marker class copied verbatim from the impact cell (e.g. `high`, `holiday`).
    pub impact: Option<String>,
    pub event: String,
    pub eventid: u64,
    pub actual: String,
    pub forecast: String,
    pub previous: String,
    pub state: EventState,
}

impl Event {
    /// `date` + `time` at `tz_offset`. None only if the offset is outside ±24h.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.tz_offset * 3600)?;
        offset
            .from_local_datetime(&self.date.and_time(self.time))
            .single()
    }
}

// ---------------------------------------------------------------------------
// Query window
// ---------------------------------------------------------------------------

/// One page of the calendar: a day, a week (Sunday-based) or a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPeriod {
    Day(NaiveDate),
    /// Always holds the Sunday that starts the week; build with [`QueryPeriod::week_of`].
    Week(NaiveDate),
    Month { year: i32, month: u32 },
}

impl QueryPeriod {
    pub fn day(date: NaiveDate) -> Self {
        QueryPeriod::Day(date)
    }

    /// The week containing `date`. The site's weeks start on Sunday.
    pub fn week_of(date: NaiveDate) -> Self {
        let back = u64::from(date.weekday().num_days_from_sunday());
        QueryPeriod::Week(date.checked_sub_days(Days::new(back)).unwrap_or(date))
    }

    pub fn month(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(AppError::InvalidQuery(format!("no such month {year}-{month}")));
        }
        Ok(QueryPeriod::Month { year, month })
    }

    /// First calendar day the page covers.
    pub fn first_day(&self) -> NaiveDate {
        match *self {
            QueryPeriod::Day(d) | QueryPeriod::Week(d) => d,
            QueryPeriod::Month { year, month } => {
                NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
            }
        }
    }

    /// Year the table walker starts counting from; the page never prints one.
    pub fn target_year(&self) -> i32 {
        self.first_day().year()
    }

    /// Query-string part of the calendar URL, e.g. `week=jan07.2024`.
    pub fn query_string(&self) -> String {
        match *self {
            QueryPeriod::Day(d) => format!("day={}", day_token(d)),
            QueryPeriod::Week(d) => format!("week={}", day_token(d)),
            QueryPeriod::Month { year, .. } => {
                let abbr = self.first_day().format("%b").to_string().to_lowercase();
                format!("month={abbr}.{year}")
            }
        }
    }
}

fn day_token(d: NaiveDate) -> String {
    d.format("%b%d.%Y").to_string().to_lowercase()
}

impl std::fmt::Display for QueryPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_event() -> Event {
        Event {
            date: ymd(2024, 1, 7),
            time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            tz_offset: -4,
            currency: "USD".to_string(),
            impact: Some("high".to_string()),
            event: "Non-Farm Employment Change".to_string(),
            eventid: 123456,
            actual: "216K".to_string(),
            forecast: "170K".to_string(),
            previous: "173K".to_string(),
            state: EventState::Better,
        }
    }

    #[test]
    fn timestamp_combines_date_time_and_offset() {
        let ts = sample_event().timestamp().unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-07T08:30:00-04:00");
    }

    #[test]
    fn timestamp_out_of_range_offset_is_none() {
        let mut e = sample_event();
        e.tz_offset = 30;
        assert!(e.timestamp().is_none());
    }

    #[test]
    fn week_normalises_to_sunday() {
        // 2024-01-10 is a Wednesday
        assert_eq!(QueryPeriod::week_of(ymd(2024, 1, 10)), QueryPeriod::Week(ymd(2024, 1, 7)));
        // Sunday stays put
        assert_eq!(QueryPeriod::week_of(ymd(2024, 1, 7)), QueryPeriod::Week(ymd(2024, 1, 7)));
    }

    #[test]
    fn week_crossing_new_year_targets_start_year() {
        // 2025-01-02 is a Thursday; its week starts on 2024-12-29
        let q = QueryPeriod::week_of(ymd(2025, 1, 2));
        assert_eq!(q.first_day(), ymd(2024, 12, 29));
        assert_eq!(q.target_year(), 2024);
    }

    #[test]
    fn query_strings() {
        assert_eq!(QueryPeriod::day(ymd(2024, 3, 5)).query_string(), "day=mar05.2024");
        assert_eq!(QueryPeriod::week_of(ymd(2024, 1, 7)).query_string(), "week=jan07.2024");
        assert_eq!(QueryPeriod::month(2023, 12).unwrap().query_string(), "month=dec.2023");
    }

    #[test]
    fn invalid_month_rejected() {
        assert!(matches!(QueryPeriod::month(2024, 13), Err(AppError::InvalidQuery(_))));
    }

    #[test]
    fn field_order_matches_table() {
        let names: Vec<_> = Field::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            ["date", "time", "currency", "impact", "event", "actual", "forecast", "previous"]
        );
    }
}
