use scraper::ElementRef;

use crate::calendar::carry::CarryForward;
use crate::calendar::fields::FieldLocators;
use crate::calendar::rollover::YearRollover;
use crate::calendar::rules::{RowDraft, RuleContext, RULES};
use crate::config::selectors;
use crate::error::{Result, RowError};
use crate::types::{Event, Field};

/// Cross-row state of one table walk. Owned by a single walker; never shared.
#[derive(Debug, Clone)]
pub struct WalkState {
    pub carry: CarryForward,
    pub rollover: YearRollover,
}

impl WalkState {
    pub fn new(target_year: i32) -> Self {
        Self {
            carry: CarryForward::new(),
            rollover: YearRollover::new(target_year),
        }
    }
}

/// What one row turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Blank currency and event: the data region is over.
    EndOfTable,
    Event(Event),
}

/// Turns a single `<tr>` into an [`Event`]. Holds no per-row state.
pub struct RowParser {
    locators: FieldLocators,
    tz_offset: i32,
}

impl RowParser {
    pub fn new(tz_offset: i32) -> Result<Self> {
        Ok(Self { locators: FieldLocators::new()?, tz_offset })
    }

    pub fn tz_offset(&self) -> i32 {
        self.tz_offset
    }

    /// Parse `row` against the current walk state. The state is only read;
    /// rollover and carry-forward are committed by the caller on success.
    pub fn parse(&self, row: ElementRef<'_>, state: &WalkState) -> std::result::Result<RowOutcome, RowError> {
        let currency = self.locators.text(row, Field::Currency)?;
        let event = self.locators.text(row, Field::Event)?;
        if currency.is_empty() && event.is_empty() {
            return Ok(RowOutcome::EndOfTable);
        }

        let eventid = event_id(row)?;

        let ctx = RuleContext {
            year: state.rollover.year(),
            carry: &state.carry,
        };
        let mut draft = RowDraft::default();
        for (field, rule) in RULES {
            let cell = self.locators.extract(row, field)?;
            rule(&cell, &ctx, &mut draft)?;
        }

        draft.finish(eventid, self.tz_offset).map(RowOutcome::Event)
    }
}

/// `data-eventid` of the row.
pub fn event_id(row: ElementRef<'_>) -> std::result::Result<u64, RowError> {
    let raw = row.value().attr(selectors::EVENT_ID_ATTR).unwrap_or("");
    raw.trim()
        .parse::<u64>()
        .map_err(|_| RowError::InvalidEventId { raw: raw.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use scraper::{Html, Selector};

    use crate::types::EventState;

    fn doc(rows: &str) -> Html {
        Html::parse_document(&format!("<table class=\"calendar__table\"><tbody>{rows}</tbody></table>"))
    }

    fn first_row(html: &Html) -> ElementRef<'_> {
        let sel = Selector::parse("tr").unwrap();
        html.select(&sel).next().unwrap()
    }

    fn row_html(id: &str, date: &str, time: &str, currency: &str, event: &str, actual: &str) -> String {
        let date_cell = if date.is_empty() {
            String::new()
        } else {
            format!("<span class=\"date\">Mon <span>{date}</span></span>")
        };
        format!(
            r#"<tr class="calendar__row calendar_row" data-eventid="{id}">
                <td class="calendar__cell calendar__date date">{date_cell}</td>
                <td class="calendar__cell calendar__time time">{time}</td>
                <td class="calendar__cell calendar__currency currency">{currency}</td>
                <td class="calendar__cell calendar__impact impact"><span class="medium"></span></td>
                <td class="calendar__cell calendar__event event"><span>{event}</span></td>
                <td class="calendar__cell calendar__actual actual">{actual}</td>
                <td class="calendar__cell calendar__forecast forecast">0.2%</td>
                <td class="calendar__cell calendar__previous previous">0.1%</td>
            </tr>"#
        )
    }

    #[test]
    fn full_row_becomes_event() {
        let html = doc(&row_html("77", "Jan 8", "10:00am", "EUR", "German Factory Orders", r#"<span class="worse">-0.4%</span>"#));
        let parser = RowParser::new(1).unwrap();
        let e = match parser.parse(first_row(&html), &WalkState::new(2024)).unwrap() {
            RowOutcome::Event(e) => e,
            other => panic!("expected event, got {other:?}"),
        };
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(e.time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(e.tz_offset, 1);
        assert_eq!(e.currency, "EUR");
        assert_eq!(e.impact.as_deref(), Some("medium"));
        assert_eq!(e.event, "German Factory Orders");
        assert_eq!(e.eventid, 77);
        assert_eq!(e.actual, "-0.4%");
        assert_eq!(e.forecast, "0.2%");
        assert_eq!(e.previous, "0.1%");
        assert_eq!(e.state, EventState::Worse);
    }

    #[test]
    fn blank_currency_and_event_ends_table() {
        let html = doc(&row_html("", "", "", "", "", ""));
        let parser = RowParser::new(0).unwrap();
        assert_eq!(
            parser.parse(first_row(&html), &WalkState::new(2024)).unwrap(),
            RowOutcome::EndOfTable
        );
    }

    #[test]
    fn first_row_without_date_has_no_anchor() {
        let html = doc(&row_html("5", "", "9:00am", "USD", "ISM", ""));
        let parser = RowParser::new(0).unwrap();
        assert_eq!(
            parser.parse(first_row(&html), &WalkState::new(2024)),
            Err(RowError::MissingTemporalAnchor { field: Field::Date })
        );
    }

    #[test]
    fn bad_event_id_is_row_error() {
        let html = doc(&row_html("abc", "Jan 8", "9:00am", "USD", "ISM", ""));
        let parser = RowParser::new(0).unwrap();
        assert_eq!(
            parser.parse(first_row(&html), &WalkState::new(2024)),
            Err(RowError::InvalidEventId { raw: "abc".to_string() })
        );
    }

    #[test]
    fn missing_cell_is_structure_mismatch() {
        let html = doc(
            r#"<tr class="calendar__row calendar_row" data-eventid="1">
                <td class="calendar__cell calendar__currency currency">USD</td>
                <td class="calendar__cell calendar__event event">CPI</td>
            </tr>"#,
        );
        let parser = RowParser::new(0).unwrap();
        assert_eq!(
            parser.parse(first_row(&html), &WalkState::new(2024)),
            Err(RowError::StructureMismatch { field: Field::Date })
        );
    }
}
