//! Contiguous runs of flagged rows.

use serde::Serialize;

/// Inclusive row range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowRun {
    pub start: usize,
    pub end: usize,
}

impl RowRun {
    /// Number of rows covered.
    pub fn rows(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Collapse a row mask into maximal runs of `true`.
pub fn flagged_runs<I>(mask: I) -> Vec<RowRun>
where
    I: IntoIterator<Item = bool>,
{
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    let mut last = 0usize;

    for (i, flagged) in mask.into_iter().enumerate() {
        match (flagged, open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                runs.push(RowRun { start, end: i - 1 });
                open = None;
            }
            _ => {}
        }
        last = i;
    }
    if let Some(start) = open {
        runs.push(RowRun { start, end: last });
    }
    runs
}
