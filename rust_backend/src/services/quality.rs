//! Missingness and freeze detection per historian column.
//!
//! A row is *missing* when its cell does not coerce to a finite number. A row
//! is *frozen* when the trailing rolling standard deviation ending at it is
//! below the freeze epsilon, or cannot be computed (warm-up rows and windows
//! touching a missing sample). Both are reported as percentages of the total
//! row count.

use serde::Serialize;

use crate::algorithms::{flagged_runs, rolling_std, RowRun};
use crate::config::QualitySettings;
use crate::core::domain::{Cell, DataBlock, PointLabel};
use crate::error::{CheckError, CheckResult};

/// Lenient numeric coercion. Blank, non-numeric and non-finite cells are missing.
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    cell.as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnQuality {
    pub label: PointLabel,
    pub missing_count: usize,
    /// Percentage of rows.
    pub missing_fraction: f64,
    /// Rows flagged by the freeze mask.
    pub freeze_count: usize,
    /// Percentage of rows.
    pub freeze_fraction: f64,
    /// Rows whose full window was flat.
    pub frozen_windows: usize,
    pub missing_runs: Vec<RowRun>,
    pub freeze_runs: Vec<RowRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub window_hours: u32,
    pub window_samples: usize,
    pub total_rows: usize,
    pub columns: Vec<ColumnQuality>,
}

impl QualityReport {
    pub fn column(&self, canonical_id: &str) -> Option<&ColumnQuality> {
        self.columns
            .iter()
            .find(|c| c.label.canonical_id == canonical_id)
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

fn column_quality(
    label: &PointLabel,
    cells: &[Cell],
    window: usize,
    epsilon: f64,
) -> ColumnQuality {
    let total = cells.len();
    let numeric: Vec<Option<f64>> = cells.iter().map(coerce_numeric).collect();
    let rolling = rolling_std(&numeric, window);

    let missing_mask: Vec<bool> = numeric.iter().map(Option::is_none).collect();
    let freeze_mask: Vec<bool> = rolling
        .iter()
        .map(|std| std.map_or(true, |s| s < epsilon))
        .collect();

    let missing_count = missing_mask.iter().filter(|m| **m).count();
    let freeze_count = freeze_mask.iter().filter(|m| **m).count();
    let frozen_windows = rolling
        .iter()
        .filter(|std| matches!(std, Some(s) if *s < epsilon))
        .count();

    ColumnQuality {
        label: label.clone(),
        missing_count,
        missing_fraction: percentage(missing_count, total),
        freeze_count,
        freeze_fraction: percentage(freeze_count, total),
        frozen_windows,
        missing_runs: flagged_runs(missing_mask),
        freeze_runs: flagged_runs(freeze_mask),
    }
}

/// Missingness and freeze statistics for every value column of `block`.
///
/// The rolling window spans `window_hours * samples_per_hour` rows. Fails with
/// `InvalidParameter` when `window_hours` is outside the configured bounds.
pub fn analyze_quality(
    block: &DataBlock,
    window_hours: u32,
    settings: &QualitySettings,
) -> CheckResult<QualityReport> {
    if !(settings.min_window_hours..=settings.max_window_hours).contains(&window_hours) {
        return Err(CheckError::InvalidParameter(format!(
            "window_hours must be within {}..={}, got {}",
            settings.min_window_hours, settings.max_window_hours, window_hours
        )));
    }

    let window_samples = window_hours
        .checked_mul(settings.samples_per_hour)
        .ok_or_else(|| {
            CheckError::InvalidParameter(format!(
                "window of {} hours at {} samples per hour is too large",
                window_hours, settings.samples_per_hour
            ))
        })? as usize;
    let total_rows = block.height();

    let columns: Vec<ColumnQuality> = block
        .columns
        .iter()
        .zip(&block.values)
        .map(|(label, cells)| column_quality(label, cells, window_samples, settings.freeze_epsilon))
        .collect();

    log::debug!(
        "Quality over {} column(s) x {} row(s), window {} samples",
        columns.len(),
        total_rows,
        window_samples
    );

    Ok(QualityReport {
        window_hours,
        window_samples,
        total_rows,
        columns,
    })
}
