//! Analysis services.
//!
//! Each service takes already parsed tables and returns a serializable
//! report. Structural problems surface as [`crate::error::CheckError`];
//! findings about the data itself are part of the report.

pub mod quality;
pub mod reconcile;
pub mod series;
pub mod temporal;
pub mod unit_report;

#[cfg(test)]
mod quality_tests;

pub use quality::{analyze_quality, coerce_numeric, ColumnQuality, QualityReport};
pub use reconcile::{
    reconcile_headers, CheckKind, CheckOutcome, EvidenceRow, HeaderChecks, ReconcileOptions,
    ReconciliationReport, ReconciliationResult, Verdict,
};
pub use series::{extract_series, Series, SeriesSet};
pub use temporal::{analyze_timestamps, TemporalReport, TimeGap};
pub use unit_report::{build_unit_report, FormatPreview, ReportOptions, Section, UnitReport};
