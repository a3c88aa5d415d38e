use crate::error::{AppError, Result};

const HEADER_PREFIX: &str = "Calendar Time Zone: GMT";
const DST_PREFIX: &str = "(DST ";

/// Widest offset magnitude accepted, in digits. Real zones span GMT -12 to +14.
pub const MAX_OFFSET_DIGITS: usize = 2;
pub const MAX_OFFSET_HOURS: i32 = 14;

/// Parsed `Calendar Time Zone: GMT ±N (DST On|Off)` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TzHeader {
    pub base_offset: i32,
    pub dst: bool,
}

impl TzHeader {
    /// Whole hours east of UTC, DST included.
    pub fn offset(&self) -> i32 {
        self.base_offset + i32::from(self.dst)
    }
}

pub fn parse_tz_header(header: &str) -> Result<TzHeader> {
    let bad = || AppError::TimezoneHeader(header.to_string());

    let normalized = header.split_whitespace().collect::<Vec<_>>().join(" ");
    let rest = normalized.strip_prefix(HEADER_PREFIX).ok_or_else(bad)?;
    let (offset_str, dst_str) = rest.trim_start().split_once(' ').ok_or_else(bad)?;

    let base_offset = parse_offset(offset_str).ok_or_else(bad)?;
    let dst = match dst_str.strip_prefix(DST_PREFIX) {
        Some("On)") => true,
        Some("Off)") => false,
        _ => return Err(bad()),
    };

    Ok(TzHeader { base_offset, dst })
}

/// Resolve the header straight to the offset attached to every event.
pub fn resolve_offset(header: &str) -> Result<i32> {
    parse_tz_header(header).map(|h| h.offset())
}

/// `-5`, `+2`, `0`, `+10`. Sign optional, 1..=MAX_OFFSET_DIGITS digits.
fn parse_offset(s: &str) -> Option<i32> {
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => (1, s),
    };
    if digits.is_empty()
        || digits.len() > MAX_OFFSET_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let magnitude: i32 = digits.parse().ok()?;
    (magnitude <= MAX_OFFSET_HOURS).then_some(sign * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dst_on_adds_an_hour() {
        assert_eq!(resolve_offset("Calendar Time Zone: GMT -5 (DST On)").unwrap(), -4);
    }

    #[test]
    fn dst_off_keeps_base() {
        assert_eq!(resolve_offset("Calendar Time Zone: GMT +2 (DST Off)").unwrap(), 2);
    }

    #[test]
    fn unsigned_zero_and_two_digit_offsets() {
        assert_eq!(resolve_offset("Calendar Time Zone: GMT 0 (DST Off)").unwrap(), 0);
        assert_eq!(resolve_offset("Calendar Time Zone: GMT +10 (DST On)").unwrap(), 11);
        assert_eq!(resolve_offset("Calendar Time Zone: GMT -10 (DST Off)").unwrap(), -10);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let h = "\n   Calendar Time Zone:  GMT -5\n (DST Off)  ";
        assert_eq!(
            parse_tz_header(h).unwrap(),
            TzHeader { base_offset: -5, dst: false }
        );
    }

    #[test]
    fn malformed_headers_are_fatal() {
        for h in [
            "",
            "Time Zone: GMT -5 (DST On)",
            "Calendar Time Zone: GMT -5",
            "Calendar Time Zone: GMT -5 (DST Maybe)",
            "Calendar Time Zone: GMT -123 (DST Off)",
            "Calendar Time Zone: GMT +15 (DST Off)",
            "Calendar Time Zone: GMT -5:30 (DST Off)",
            "Calendar Time Zone: GMT - (DST Off)",
        ] {
            assert!(
                matches!(parse_tz_header(h), Err(AppError::TimezoneHeader(_))),
                "accepted {h:?}"
            );
        }
    }
}
