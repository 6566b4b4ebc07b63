//! Point Survey (TDT) parsing.
//!
//! The template is a wide sheet: column 0 holds metric names, column 1 metric
//! types, and every plant unit owns a fixed-width block of columns after them.
//! The first surviving row carries the real field names of each block. The
//! layout is declared once in [`UnitBlockSchema`] and every unit block is cut
//! out by [`extract_unit_block`], which validates the block against it.

use std::ops::Range;

use crate::config::TemplateSettings;
use crate::core::domain::{Cell, PointCatalogEntry, RawTemplateTable, TemplateCatalog, UnitCatalog};
use crate::error::{CheckError, CheckResult};

/// Column layout of a Point Survey sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitBlockSchema {
    /// Number of leading metric columns shared by every unit.
    pub metric_columns: usize,
    /// Field names of one unit block, in column order.
    pub block_fields: &'static [&'static str],
}

/// Layout used by the standard Point Survey sheet.
pub const POINT_SURVEY_SCHEMA: UnitBlockSchema = UnitBlockSchema {
    metric_columns: 2,
    block_fields: &[
        "Point Type",
        "Canary Point Name",
        "Canary Description",
        "Metric",
        "Unit",
    ],
};

impl UnitBlockSchema {
    pub fn block_width(&self) -> usize {
        self.block_fields.len()
    }

    /// Column span of the unit at `unit_index`.
    pub fn block_span(&self, unit_index: usize) -> Range<usize> {
        let start = self.metric_columns + self.block_width() * unit_index;
        start..start + self.block_width()
    }
}

/// One unit's slice of the template: the promoted header row plus data rows.
///
/// Each row holds the metric columns followed by the unit's block columns.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitBlock {
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

/// True when `label` is a real column label rather than a blank-column placeholder.
fn is_unit_label(label: &Cell, placeholder_marker: &str) -> bool {
    match label {
        Some(text) => !text.contains(placeholder_marker),
        None => false,
    }
}

fn is_scaffolding(row: &[Cell], markers: &[String]) -> bool {
    match row.first().and_then(|c| c.as_deref()) {
        Some(name) => markers.iter().any(|m| name.contains(m.as_str())),
        None => false,
    }
}

/// Plant unit labels, in column order, ignoring the metric-name column.
pub fn detect_plant_units(table: &RawTemplateTable, placeholder_marker: &str) -> Vec<String> {
    table
        .labels
        .iter()
        .skip(1)
        .filter(|label| is_unit_label(label, placeholder_marker))
        .filter_map(|label| label.clone())
        .collect()
}

/// Rows that remain after dropping scaffolding and fully blank rows.
pub fn metric_rows(table: &RawTemplateTable, settings: &TemplateSettings) -> Vec<Vec<Cell>> {
    table
        .rows
        .iter()
        .filter(|row| !is_scaffolding(row, &settings.exclusion_markers))
        .filter(|row| row.iter().any(|c| c.is_some()))
        .cloned()
        .collect()
}

/// Cut the block of `unit_index` out of `rows` and promote its first row to header.
///
/// Fails with `MalformedTemplate` when the block extends past `width`, when
/// there is no header row, or when the header does not name the schema fields.
pub fn extract_unit_block(
    rows: &[Vec<Cell>],
    width: usize,
    schema: &UnitBlockSchema,
    unit_index: usize,
) -> CheckResult<UnitBlock> {
    let span = schema.block_span(unit_index);
    if span.end > width {
        return Err(CheckError::MalformedTemplate(format!(
            "unit {} spans columns {}..{} but the sheet has only {} columns",
            unit_index + 1,
            span.start,
            span.end,
            width
        )));
    }

    let pick = |row: &Vec<Cell>| -> Vec<Cell> {
        (0..schema.metric_columns)
            .chain(span.clone())
            .map(|col| row.get(col).cloned().flatten())
            .collect()
    };

    let (header_row, data_rows) = rows.split_first().ok_or_else(|| {
        CheckError::MalformedTemplate("template has no header row".to_string())
    })?;

    let header = pick(header_row);
    for (offset, expected) in schema.block_fields.iter().enumerate() {
        let found = header[schema.metric_columns + offset].as_deref();
        let matches = found
            .map(|f| f.trim().eq_ignore_ascii_case(expected))
            .unwrap_or(false);
        if !matches {
            return Err(CheckError::MalformedTemplate(format!(
                "unit {} column {} is '{}', expected '{}'",
                unit_index + 1,
                span.start + offset,
                found.unwrap_or(""),
                expected
            )));
        }
    }

    Ok(UnitBlock {
        header,
        rows: data_rows.iter().map(pick).collect(),
    })
}

// Field order follows POINT_SURVEY_SCHEMA.
fn block_to_entries(block: &UnitBlock) -> Vec<PointCatalogEntry> {
    block
        .rows
        .iter()
        .map(|row| {
            let field = |i: usize| row.get(i).cloned().flatten();
            PointCatalogEntry {
                metric_name: field(0).unwrap_or_default(),
                metric_type: field(1),
                point_type: field(2),
                canary_point_name: field(3),
                canary_description: field(4),
                metric: field(5),
                unit: field(6),
            }
        })
        .collect()
}

/// Parse a Point Survey sheet into one point catalog per plant unit.
pub fn parse_template(
    table: &RawTemplateTable,
    settings: &TemplateSettings,
) -> CheckResult<TemplateCatalog> {
    parse_template_with_schema(table, settings, &POINT_SURVEY_SCHEMA)
}

fn parse_template_with_schema(
    table: &RawTemplateTable,
    settings: &TemplateSettings,
    schema: &UnitBlockSchema,
) -> CheckResult<TemplateCatalog> {
    let width = table.width();
    if width < schema.metric_columns {
        return Err(CheckError::MalformedTemplate(format!(
            "expected at least {} metric columns, found {}",
            schema.metric_columns, width
        )));
    }

    let plant_units = detect_plant_units(table, &settings.placeholder_marker);
    if plant_units.is_empty() {
        return Err(CheckError::MalformedTemplate(
            "no plant unit columns found".to_string(),
        ));
    }

    let rows = metric_rows(table, settings);

    let mut units = Vec::with_capacity(plant_units.len());
    for (i, label) in plant_units.into_iter().enumerate() {
        let block = extract_unit_block(&rows, width, schema, i)?;
        units.push(UnitCatalog {
            label,
            entries: block_to_entries(&block),
        });
    }

    let title = table.labels.first().cloned().flatten();
    log::info!(
        "Parsed TDT '{}': {} plant units, {} metrics per unit",
        title.as_deref().unwrap_or("<untitled>"),
        units.len(),
        units.first().map(|u| u.entries.len()).unwrap_or(0)
    );

    Ok(TemplateCatalog { title, units })
}
