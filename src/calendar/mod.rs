pub mod carry;
pub mod fields;
pub mod rollover;
pub mod row;
pub mod rules;
pub mod timezone;
pub mod walker;

pub use carry::CarryForward;
pub use fields::{FieldLocators, RawCell};
pub use rollover::YearRollover;
pub use row::{RowOutcome, RowParser, WalkState};
pub use timezone::{parse_tz_header, resolve_offset, TzHeader};
pub use walker::{walk_rows, SkippedRow, TableWalker, WalkStats};
