//! Timestamp integrity of a historian data block.
//!
//! Everything here is reporting only: rows are never dropped or reordered.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::core::domain::DataBlock;
use crate::error::Advisory;
use crate::time::{parse_timestamp_column, CalendarDuration};

/// A step between successive rows longer than the nominal sampling interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeGap {
    /// Data row holding the later timestamp.
    pub row: usize,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalReport {
    pub format_conformant: bool,
    pub advisory: Option<Advisory>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub duration: Option<CalendarDuration>,
    /// Smallest positive step between successive rows.
    pub min_sampling_interval_minutes: Option<f64>,
    /// Number of data rows, parsed or not.
    pub total_points: usize,
    pub unparseable_rows: usize,
    pub duplicate_timestamps: usize,
    pub out_of_order_steps: usize,
    pub gaps: Vec<TimeGap>,
}

fn minutes(seconds: i64) -> f64 {
    seconds as f64 / 60.0
}

/// Analyze the datetime column of `block` against `format`.
pub fn analyze_timestamps(block: &DataBlock, format: &str) -> TemporalReport {
    let parsed = parse_timestamp_column(&block.timestamps, format);

    let advisory = if parsed.conformant {
        None
    } else {
        Some(Advisory::FormatNonConformant {
            expected_format: format.to_string(),
            first_offending_value: parsed.first_nonconformant.clone(),
            offending_rows: parsed.nonconformant_rows,
        })
    };

    // Successive steps between parsed rows, in file order.
    let stamped: Vec<(usize, NaiveDateTime)> = parsed
        .values
        .iter()
        .enumerate()
        .filter_map(|(row, ts)| ts.map(|t| (row, t)))
        .collect();
    let steps: Vec<(usize, NaiveDateTime, NaiveDateTime, i64)> = stamped
        .windows(2)
        .map(|w| (w[1].0, w[0].1, w[1].1, (w[1].1 - w[0].1).num_seconds()))
        .collect();

    let duplicate_timestamps = steps.iter().filter(|s| s.3 == 0).count();
    let out_of_order_steps = steps.iter().filter(|s| s.3 < 0).count();
    let min_step = steps.iter().map(|s| s.3).filter(|d| *d > 0).min();

    let gaps = match min_step {
        Some(nominal) => steps
            .iter()
            .filter(|s| s.3 > nominal)
            .map(|&(row, from, to, seconds)| TimeGap {
                row,
                from,
                to,
                minutes: minutes(seconds),
            })
            .collect(),
        None => Vec::new(),
    };

    let start = stamped.iter().map(|s| s.1).min();
    let end = stamped.iter().map(|s| s.1).max();
    let duration = start.zip(end).map(|(s, e)| CalendarDuration::between(s, e));

    if out_of_order_steps > 0 {
        log::warn!("{} timestamp step(s) go backwards", out_of_order_steps);
    }

    TemporalReport {
        format_conformant: parsed.conformant,
        advisory,
        start,
        end,
        duration,
        min_sampling_interval_minutes: min_step.map(minutes),
        total_points: block.height(),
        unparseable_rows: parsed.unparseable_rows,
        duplicate_timestamps,
        out_of_order_steps,
        gaps,
    }
}
