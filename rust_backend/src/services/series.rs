//! Plot-ready numeric series.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::core::domain::{DataBlock, PointLabel};
use crate::services::quality::coerce_numeric;
use crate::time::parse_permissive;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: PointLabel,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSet {
    pub timestamps: Vec<Option<NaiveDateTime>>,
    pub series: Vec<Series>,
}

/// Scale to `[0, 1]` by the column's own min and max. Constant columns map to `0.0`.
fn min_max_normalize(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present = values.iter().flatten();
    let min = present.clone().copied().fold(f64::INFINITY, f64::min);
    let max = present.copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|v| {
            v.map(|x| if span > 0.0 { (x - min) / span } else { 0.0 })
        })
        .collect()
}

/// Numeric series for the `selected` columns (by canonical id), in the order given.
///
/// Unknown ids are skipped. Timestamps are parsed permissively so a
/// non-conformant export can still be plotted.
pub fn extract_series(block: &DataBlock, selected: &[String], normalize: bool) -> SeriesSet {
    let timestamps = block
        .timestamps
        .iter()
        .map(|c| c.as_deref().and_then(parse_permissive))
        .collect();

    let series = selected
        .iter()
        .filter_map(|id| {
            let idx = block.column_index(id);
            if idx.is_none() {
                log::debug!("Series '{}' not in data block", id);
            }
            idx
        })
        .map(|idx| {
            let raw: Vec<Option<f64>> = block.values[idx].iter().map(coerce_numeric).collect();
            Series {
                label: block.columns[idx].clone(),
                values: if normalize { min_max_normalize(&raw) } else { raw },
            }
        })
        .collect();

    SeriesSet { timestamps, series }
}
