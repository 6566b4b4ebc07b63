//! Time utilities: timestamp parsing and calendar-aware durations.

pub mod calendar;
pub mod parse;

pub use calendar::CalendarDuration;
pub use parse::{parse_permissive, parse_strict, parse_timestamp_column, ParsedTimestamps};
