use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

use crate::error::{AppError, Result};
use crate::types::QueryPeriod;

pub const BASE_URL: &str = "https://www.forexfactory.com/";

/// The site serves no calendar history before this day.
pub const DATA_AVAILABLE_FROM: NaiveDate = match NaiveDate::from_ymd_opt(2007, 1, 1) {
    Some(d) => d,
    None => panic!("invalid DATA_AVAILABLE_FROM"),
};

/// HTTP timeout for the page fetch (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// The calendar sits behind a bot filter that rejects library user agents.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Prefix of auto-generated export file names.
pub const OUTPUT_FILE_PREFIX: &str = "forex_calendar";

/// CSS locators for the calendar page.
pub mod selectors {
    /// `<div>Calendar Time Zone: GMT -5 (DST On)</div>`
    pub const TZ_HEADER: &str = "div.calendar__print.calendar__print--header > div";
    pub const TABLE: &str = "table.calendar__table";
    /// Historical `calendar__row--grey` rows also match; they sit after the
    /// blank end-marker row, so the walker never reaches them.
    pub const DATA_ROW: &str = "tr.calendar__row.calendar_row";
    /// Text of the date cell lives two spans deep: `<span>Sun <span>Jan 7</span></span>`.
    pub const DATE_TEXT: &str = "span > span";
    pub const IMPACT_MARKER: &str = "span";
    pub const EVENT_ID_ATTR: &str = "data-eventid";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub log_level: String,
    pub user_agent: String,
    pub http_timeout_secs: u64,
    /// Window to fetch (CALENDAR_PERIOD + CALENDAR_DATE)
    pub period: QueryPeriod,
    /// csv | json (OUTPUT_FORMAT)
    pub output_format: OutputFormat,
    /// Explicit output file (OUTPUT_PATH); auto-named from the event dates when unset.
    pub output_path: Option<PathBuf>,
    /// Append to an existing file instead of truncating (OUTPUT_APPEND)
    pub output_append: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let date = match std::env::var("CALENDAR_DATE") {
            Ok(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::Config(format!("CALENDAR_DATE must be YYYY-MM-DD, got {s:?}"))
            })?,
            Err(_) => chrono::Local::now().date_naive(),
        };
        let period_kind = std::env::var("CALENDAR_PERIOD").unwrap_or_else(|_| "week".to_string());

        Ok(Self {
            base_url: std::env::var("CALENDAR_URL").unwrap_or_else(|_| BASE_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            user_agent: std::env::var("USER_AGENT").unwrap_or_else(|_| USER_AGENT.to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .map_err(|_| {
                    AppError::Config("HTTP_TIMEOUT_SECS must be a whole number of seconds".to_string())
                })?,
            period: parse_period(&period_kind, date)?,
            output_format: parse_format(
                &std::env::var("OUTPUT_FORMAT").unwrap_or_else(|_| "csv".to_string()),
            )?,
            output_path: std::env::var("OUTPUT_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            output_append: parse_bool(
                "OUTPUT_APPEND",
                &std::env::var("OUTPUT_APPEND").unwrap_or_default(),
            )?,
        })
    }
}

pub fn parse_period(kind: &str, date: NaiveDate) -> Result<QueryPeriod> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "day" => Ok(QueryPeriod::day(date)),
        "week" => Ok(QueryPeriod::week_of(date)),
        "month" => QueryPeriod::month(date.year(), date.month()),
        other => Err(AppError::Config(format!(
            "CALENDAR_PERIOD must be day, week or month, got {other:?}"
        ))),
    }
}

pub fn parse_format(s: &str) -> Result<OutputFormat> {
    match s.trim().to_ascii_lowercase().as_str() {
        "csv" => Ok(OutputFormat::Csv),
        "json" => Ok(OutputFormat::Json),
        other => Err(AppError::Config(format!("OUTPUT_FORMAT must be csv or json, got {other:?}"))),
    }
}

fn parse_bool(name: &str, s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        other => Err(AppError::Config(format!("{name} must be true or false, got {other:?}"))),
    }
}
