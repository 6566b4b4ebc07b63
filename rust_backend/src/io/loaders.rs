use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::core::domain::{cell, Cell, HistoricalTable, RawTemplateTable};

/// Read a CSV with every field as text and no header handling.
///
/// Header lines are taken apart by the callers: historian exports may repeat
/// a point name, which a column-named frame cannot hold.
fn csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_truncate_ragged_lines(true))
}

fn read_path(path: &Path) -> Result<DataFrame> {
    csv_options()
        .try_into_reader_with_file_path(Some(path.into()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV file {}", path.display()))
}

fn read_bytes(bytes: &[u8]) -> Result<DataFrame> {
    csv_options()
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .context("Failed to parse uploaded CSV")
}

/// Row-major cells of a string frame.
fn frame_rows(df: &DataFrame) -> Result<Vec<Vec<Cell>>> {
    let columns: Vec<Vec<Cell>> = df
        .get_columns()
        .iter()
        .map(|column| -> PolarsResult<Vec<Cell>> {
            let ca = column.str()?;
            Ok(ca.into_iter().map(|v| v.and_then(cell)).collect())
        })
        .collect::<PolarsResult<_>>()
        .context("CSV column is not text")?;

    Ok((0..df.height())
        .map(|row| columns.iter().map(|col| col[row].clone()).collect())
        .collect())
}

/// Split off the first row as the header line.
fn header_and_rows(df: &DataFrame) -> Result<(Vec<Cell>, Vec<Vec<Cell>>)> {
    let mut rows = frame_rows(df)?;
    if rows.is_empty() {
        anyhow::bail!("CSV file is empty");
    }
    let header = rows.remove(0);
    Ok((header, rows))
}

/// Loader for historian CSV exports.
pub struct HistoricalLoader;

impl HistoricalLoader {
    pub fn load_from_csv(path: &Path) -> Result<HistoricalTable> {
        Self::from_frame(&read_path(path)?)
    }

    /// Load an uploaded export held in memory.
    pub fn load_from_bytes(bytes: &[u8]) -> Result<HistoricalTable> {
        Self::from_frame(&read_bytes(bytes)?)
    }

    fn from_frame(df: &DataFrame) -> Result<HistoricalTable> {
        let (header, rows) = header_and_rows(df)?;
        // Blank header cells, e.g. from trailing commas, get unique names.
        let columns = header
            .into_iter()
            .enumerate()
            .map(|(i, name)| name.unwrap_or_else(|| format!("Unnamed: {}", i)))
            .collect();
        let table = HistoricalTable::new(columns, rows);
        log::info!(
            "Loaded historical export: {} columns, {} rows",
            table.columns.len(),
            table.height()
        );
        Ok(table)
    }
}

/// Loader for the TDT "Point Survey" sheet saved as CSV.
pub struct TemplateLoader;

impl TemplateLoader {
    pub fn load_from_csv(path: &Path) -> Result<RawTemplateTable> {
        Self::from_frame(&read_path(path)?)
    }

    pub fn load_from_bytes(bytes: &[u8]) -> Result<RawTemplateTable> {
        Self::from_frame(&read_bytes(bytes)?)
    }

    fn from_frame(df: &DataFrame) -> Result<RawTemplateTable> {
        let (mut labels, mut rows) = header_and_rows(df)?;

        // The sheet starts with an unlabelled margin column.
        if labels.len() > 1 && labels[0].is_none() {
            labels.remove(0);
            for row in rows.iter_mut().filter(|r| !r.is_empty()) {
                row.remove(0);
            }
        }

        log::info!(
            "Loaded template sheet: {} columns, {} rows",
            labels.len(),
            rows.len()
        );
        Ok(RawTemplateTable::new(labels, rows))
    }
}
