use std::collections::HashMap;

use scraper::{ElementRef, Selector};

use crate::config::selectors;
use crate::error::{AppError, Result, RowError};
use crate::types::Field;

/// Compile a CSS selector, mapping failures into [`AppError::Selector`].
pub fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Raw content of one field cell, before any interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    /// Visible text, whitespace collapsed and trimmed.
    pub text: String,
    /// Field-specific nested value: the `span > span` text for `date`,
    /// the marker class for `impact`. None elsewhere or when absent.
    pub detail: Option<String>,
    /// Serialized markup of the cell. Only kept for `actual`, whose state
    /// marker has no visible text.
    pub markup: String,
}

/// Compiled structural locators for every field cell of a calendar row.
pub struct FieldLocators {
    cells: HashMap<Field, Selector>,
    date_text: Selector,
    impact_marker: Selector,
}

impl FieldLocators {
    pub fn new() -> Result<Self> {
        let mut cells = HashMap::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            cells.insert(field, compile(&cell_selector(field))?);
        }
        Ok(Self {
            cells,
            date_text: compile(selectors::DATE_TEXT)?,
            impact_marker: compile(selectors::IMPACT_MARKER)?,
        })
    }

    /// Locate the single cell for `field` within `row` and read its raw content.
    pub fn extract(&self, row: ElementRef<'_>, field: Field) -> std::result::Result<RawCell, RowError> {
        let cell = self.cell(row, field)?;
        let text = visible_text(cell);

        let detail = match field {
            Field::Date => cell.select(&self.date_text).next().map(visible_text),
            Field::Impact => cell
                .select(&self.impact_marker)
                .next()
                .and_then(|span| span.value().attr("class"))
                .and_then(|classes| classes.split_whitespace().next())
                .map(str::to_string),
            _ => None,
        };
        let markup = if field == Field::Actual { cell.html() } else { String::new() };

        Ok(RawCell { text, detail, markup })
    }

    /// Visible text of one cell; cheaper than [`FieldLocators::extract`].
    pub fn text(&self, row: ElementRef<'_>, field: Field) -> std::result::Result<String, RowError> {
        self.cell(row, field).map(visible_text)
    }

    fn cell<'a>(&self, row: ElementRef<'a>, field: Field) -> std::result::Result<ElementRef<'a>, RowError> {
        self.cells
            .get(&field)
            .and_then(|sel| row.select(sel).next())
            .ok_or(RowError::StructureMismatch { field })
    }
}

/// `td.calendar__cell.calendar__date.date`
fn cell_selector(field: Field) -> String {
    let name = field.as_str();
    format!("td.calendar__cell.calendar__{name}.{name}")
}

/// Concatenated text nodes with runs of whitespace (incl. `&nbsp;`) collapsed.
pub fn visible_text(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
