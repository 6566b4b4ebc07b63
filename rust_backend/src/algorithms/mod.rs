//! Numeric building blocks for the data-quality analysis.
//!
//! - [`rolling`]: trailing-window standard deviation used for freeze detection
//! - [`runs`]: contiguous runs of flagged rows for completeness matrices

pub mod rolling;
pub mod runs;

pub use rolling::rolling_std;
pub use runs::{flagged_runs, RowRun};
