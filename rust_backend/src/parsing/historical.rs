//! Historian export normalization.
//!
//! A historian export carries a four-row header block under the CSV header
//! line, followed by one timestamped row per sample. This module only splits
//! the two parts and transposes the header block; timestamps and values stay
//! as text until the temporal and quality analyzers look at them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::HistoricalSettings;
use crate::core::domain::{Cell, DataBlock, HeaderRecord, HistoricalTable, PointLabel};
use crate::error::{CheckError, CheckResult};

/// Number of rows in the header block.
pub const HEADER_BLOCK_ROWS: usize = 4;

/// Expected first-column labels of the header block rows.
pub const HEADER_FIELDS: [&str; HEADER_BLOCK_ROWS] =
    ["Description", "Extended Name", "Extended Description", "Unit"];

static VERSION_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"V\..").expect("valid regex"));

/// Rewrite every `V.<char>` in a point name to `V`.
///
/// The rewrite is repeated until nothing changes, so applying this function
/// to its own output is a no-op.
pub fn normalize_point_name(name: &str) -> String {
    let mut current = name.to_string();
    loop {
        let next = VERSION_SUFFIX_RE.replace_all(&current, "V").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Presentation label with the verbose tag prefix removed.
pub fn display_label(name: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        name.replace(prefix, "")
    }
}

/// Header rows of the export, untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBlock {
    /// CSV header line (point names), including the placeholder in column 0.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// An export split into its header block and data block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedHistorical {
    pub header_block: HeaderBlock,
    pub data_block: DataBlock,
    /// Deviations from the expected export layout. Advisory only.
    pub layout_issues: Vec<String>,
}

fn layout_issues(table: &HistoricalTable, settings: &HistoricalSettings) -> Vec<String> {
    let mut issues = Vec::new();

    match table.columns.first() {
        Some(first) if first == &settings.point_name_label => {}
        Some(first) => issues.push(format!(
            "column 0 header is '{}', expected '{}'",
            first, settings.point_name_label
        )),
        None => issues.push("export has no columns".to_string()),
    }

    for (i, expected) in HEADER_FIELDS.iter().enumerate() {
        let found = table.get(i, 0);
        if found.map(|f| f.eq_ignore_ascii_case(expected)) != Some(true) {
            issues.push(format!(
                "header row {} is labelled '{}', expected '{}'",
                i + 1,
                found.unwrap_or(""),
                expected
            ));
        }
    }

    let width = table.columns.len();
    let ragged = table.rows.iter().filter(|r| r.len() != width).count();
    if ragged > 0 {
        issues.push(format!(
            "{} row(s) do not have {} columns",
            ragged, width
        ));
    }

    issues
}

/// Split an export into header block `[0, 4)` and data block `[4, end)`.
///
/// Column 0 of the data block is relabelled from the point-name placeholder
/// to the datetime label. Fails with `InsufficientRows` when the header block
/// is incomplete.
pub fn split_historical(
    table: &HistoricalTable,
    settings: &HistoricalSettings,
) -> CheckResult<NormalizedHistorical> {
    if table.height() < HEADER_BLOCK_ROWS {
        return Err(CheckError::InsufficientRows {
            rows: table.height(),
            required: HEADER_BLOCK_ROWS,
        });
    }

    let layout_issues = layout_issues(table, settings);
    for issue in &layout_issues {
        log::debug!("Historian layout: {}", issue);
    }

    let header_block = HeaderBlock {
        columns: table.columns.clone(),
        rows: table.rows[..HEADER_BLOCK_ROWS].to_vec(),
    };

    let data_rows = &table.rows[HEADER_BLOCK_ROWS..];
    let value_columns = table.columns.len().saturating_sub(1);

    let timestamps = data_rows
        .iter()
        .map(|r| r.first().cloned().flatten())
        .collect();

    let columns = table
        .columns
        .iter()
        .skip(1)
        .map(|name| PointLabel {
            canonical_id: name.clone(),
            display_label: display_label(name, &settings.display_prefix),
        })
        .collect();

    let values = (1..=value_columns)
        .map(|col| {
            data_rows
                .iter()
                .map(|r| r.get(col).cloned().flatten())
                .collect()
        })
        .collect();

    Ok(NormalizedHistorical {
        header_block,
        data_block: DataBlock {
            datetime_label: settings.datetime_label.clone(),
            timestamps,
            columns,
            values,
        },
        layout_issues,
    })
}

/// Transpose the header block into one record per point column.
pub fn header_records(block: &HeaderBlock, display_prefix: &str) -> Vec<HeaderRecord> {
    let field = |row: usize, col: usize| -> Cell {
        block
            .rows
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .flatten()
    };

    block
        .columns
        .iter()
        .enumerate()
        .skip(1)
        .map(|(col, name)| HeaderRecord {
            column_index: col,
            point_name: normalize_point_name(name),
            label: PointLabel {
                canonical_id: name.clone(),
                display_label: display_label(name, display_prefix),
            },
            description: field(0, col),
            extended_name: field(1, col),
            extended_description: field(2, col),
            unit: field(3, col),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_point_name_examples() {
        assert_eq!(normalize_point_name("TAG.V.1"), "TAG.V");
        assert_eq!(normalize_point_name("TAG.V"), "TAG.V");
        assert_eq!(normalize_point_name("FLOW.PV.X"), "FLOW.PV");
        assert_eq!(normalize_point_name("PT-101"), "PT-101");
    }

    #[test]
    fn test_normalize_point_name_nested_reaches_fixpoint() {
        let once = normalize_point_name("V.V.1");
        assert_eq!(once, "V");
        assert_eq!(normalize_point_name(&once), once);
    }

    #[test]
    fn test_display_label_strips_prefix() {
        assert_eq!(
            display_label("VIRTUAL_VIEW.LocalHistorian.U1.TI101", "VIRTUAL_VIEW.LocalHistorian."),
            "U1.TI101"
        );
        assert_eq!(display_label("U1.TI101", ""), "U1.TI101");
    }
}
