use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::types::Event;

/// One row per event, columns in `Event` field order. The header row is
/// written only when `with_header` is set.
pub fn write_csv<W: Write>(w: W, events: &[Event], with_header: bool) -> Result<()> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(w);
    for event in events {
        writer.serialize(event)?;
    }
    writer.flush()?;
    Ok(())
}

/// Truncate-and-write, or append without repeating the header.
pub fn save_as_csv(events: &[Event], path: &Path, append: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    write_csv(file, events, !append)?;
    info!(
        events = events.len(),
        append,
        "[EXPORT] wrote {} events to {}",
        events.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::{event, scratch};
    use crate::types::EventState;

    fn render(events: &[Event], with_header: bool) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, events, with_header).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_follows_event_field_order() {
        let out = render(&[event(7, 2024, 1, 9)], true);
        let header = out.lines().next().unwrap();
        assert_eq!(
            header,
            "date,time,tz_offset,currency,impact,event,eventid,actual,forecast,previous,state"
        );
    }

    #[test]
    fn row_renders_typed_fields() {
        let out = render(&[event(7, 2024, 1, 9)], false);
        assert_eq!(
            out.trim_end(),
            r#"2024-01-09,08:30:00,-4,USD,high,"CPI m/m, ""core""",7,0.3%,0.2%,0.1%,better"#
        );
    }

    #[test]
    fn absent_impact_and_neutral_state() {
        let mut e = event(8, 2024, 1, 9);
        e.impact = None;
        e.state = EventState::Neutral;
        let out = render(&[e], false);
        let cols: Vec<&str> = out.trim_end().split(',').collect();
        assert_eq!(cols[4], "");
        assert_eq!(*cols.last().unwrap(), "neutral");
    }

    #[test]
    fn append_does_not_repeat_header() {
        let path = scratch("append.csv");
        save_as_csv(&[event(1, 2024, 1, 7)], &path, false).unwrap();
        save_as_csv(&[event(2, 2024, 1, 8)], &path, true).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,time"));
        assert!(lines[2].starts_with("2024-01-08"));
    }
}
