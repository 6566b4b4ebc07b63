//! Timestamp parsing for historian exports.
//!
//! Exports are expected in one documented layout. A column is first parsed
//! strictly against it; if any non-blank value fails, the whole column is
//! re-parsed against a list of common layouts and flagged as non-conformant.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::core::domain::Cell;

/// Layouts tried, in order, once strict parsing has failed.
const PERMISSIVE_DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const PERMISSIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse `value` against exactly `format`.
pub fn parse_strict(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), format).ok()
}

/// Parse `value` against any supported layout, including RFC 3339 with offset.
pub fn parse_permissive(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    PERMISSIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            PERMISSIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parsed timestamp column.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTimestamps {
    /// One entry per input row; `None` for blank or unparseable cells.
    pub values: Vec<Option<NaiveDateTime>>,
    /// Every non-blank value matched the strict format.
    pub conformant: bool,
    /// Non-blank values that failed the strict format.
    pub nonconformant_rows: usize,
    pub first_nonconformant: Option<String>,
    /// Non-blank values no layout could parse.
    pub unparseable_rows: usize,
}

/// Parse a timestamp column, strictly first, permissively if that fails.
pub fn parse_timestamp_column(cells: &[Cell], format: &str) -> ParsedTimestamps {
    let strict: Vec<Option<NaiveDateTime>> = cells
        .iter()
        .map(|c| c.as_deref().and_then(|v| parse_strict(v, format)))
        .collect();

    let offending: Vec<&str> = cells
        .iter()
        .zip(&strict)
        .filter_map(|(c, parsed)| match (c.as_deref(), parsed) {
            (Some(raw), None) => Some(raw),
            _ => None,
        })
        .collect();

    if offending.is_empty() {
        return ParsedTimestamps {
            values: strict,
            conformant: true,
            nonconformant_rows: 0,
            first_nonconformant: None,
            unparseable_rows: 0,
        };
    }

    log::warn!(
        "{} timestamp(s) do not match '{}'; falling back to permissive parsing",
        offending.len(),
        format
    );

    let values: Vec<Option<NaiveDateTime>> = cells
        .iter()
        .map(|c| c.as_deref().and_then(parse_permissive))
        .collect();
    let unparseable_rows = cells
        .iter()
        .zip(&values)
        .filter(|(c, v)| c.is_some() && v.is_none())
        .count();

    ParsedTimestamps {
        values,
        conformant: false,
        nonconformant_rows: offending.len(),
        first_nonconformant: offending.first().map(|s| s.to_string()),
        unparseable_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::cell;

    const FORMAT: &str = "%m/%d/%Y %H:%M";

    #[test]
    fn test_strict_accepts_documented_layout() {
        let dt = parse_strict("03/01/2023 06:30", FORMAT).unwrap();
        assert_eq!(dt.to_string(), "2023-03-01 06:30:00");
    }

    #[test]
    fn test_strict_rejects_iso() {
        assert!(parse_strict("2023-03-01 06:30", FORMAT).is_none());
    }

    #[test]
    fn test_permissive_accepts_common_layouts() {
        assert!(parse_permissive("2023-03-01 06:30:00").is_some());
        assert!(parse_permissive("2023-03-01T06:30:00").is_some());
        assert!(parse_permissive("2023-03-01T06:30:00+07:00").is_some());
        assert!(parse_permissive("3/1/2023 6:30 AM").is_some());
        assert_eq!(
            parse_permissive("2023-03-01").unwrap().to_string(),
            "2023-03-01 00:00:00"
        );
        assert!(parse_permissive("not a date").is_none());
    }

    #[test]
    fn test_conformant_column_ignores_blanks() {
        let cells = vec![cell("01/01/2023 00:00"), None, cell("01/01/2023 00:20")];
        let parsed = parse_timestamp_column(&cells, FORMAT);
        assert!(parsed.conformant);
        assert_eq!(parsed.values[1], None);
        assert_eq!(parsed.unparseable_rows, 0);
    }

    #[test]
    fn test_nonconformant_column_falls_back() {
        let cells = vec![
            cell("01/01/2023 00:00"),
            cell("2023-01-01 00:10:00"),
            cell("garbage"),
        ];
        let parsed = parse_timestamp_column(&cells, FORMAT);
        assert!(!parsed.conformant);
        assert_eq!(parsed.nonconformant_rows, 2);
        assert_eq!(parsed.first_nonconformant.as_deref(), Some("2023-01-01 00:10:00"));
        assert_eq!(parsed.unparseable_rows, 1);
        assert!(parsed.values[0].is_some());
        assert!(parsed.values[1].is_some());
    }
}
