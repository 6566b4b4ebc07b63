//! One-pass report for a single plant unit.
//!
//! Runs format preview, header reconciliation, timestamp analysis and data
//! quality against the unit's uploaded export. Sections fail independently:
//! a structural error is recorded in the section that hit it and the other
//! sections still run.

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::core::domain::{HistoricalTable, TemplateCatalog};
use crate::error::{Advisory, CheckError, CheckResult};
use crate::parsing::historical::{header_records, split_historical, NormalizedHistorical};
use crate::services::quality::{analyze_quality, QualityReport};
use crate::services::reconcile::{reconcile_headers, ReconcileOptions, ReconciliationReport};
use crate::services::temporal::{analyze_timestamps, TemporalReport};

/// Result of one report section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ok { result: T },
    Failed { error: String },
}

impl<T> Section<T> {
    fn from_result(result: CheckResult<T>) -> Self {
        match result {
            Ok(result) => Section::Ok { result },
            Err(e) => Section::Failed {
                error: e.to_string(),
            },
        }
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Section::Ok { result } => Some(result),
            Section::Failed { .. } => None,
        }
    }
}

/// Run a section that needs the split export; a failed split fails the section.
fn section<T, F>(split: &CheckResult<NormalizedHistorical>, run: F) -> Section<T>
where
    F: FnOnce(&NormalizedHistorical) -> CheckResult<T>,
{
    match split {
        Ok(normalized) => Section::from_result(run(normalized)),
        Err(e) => Section::Failed {
            error: e.to_string(),
        },
    }
}

/// First rows of the upload as received, plus layout deviations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatPreview {
    pub table: HistoricalTable,
    pub layout_issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Rolling window in hours; the configured default when `None`.
    pub window_hours: Option<u32>,
    pub full_listing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitReport {
    pub title: Option<String>,
    pub unit: String,
    pub preview: FormatPreview,
    pub headers: Section<ReconciliationReport>,
    pub temporal: Section<TemporalReport>,
    pub quality: Section<QualityReport>,
    /// Advisories raised by any section.
    pub advisories: Vec<Advisory>,
}

/// Build the report of `unit_label` against its uploaded `table`.
///
/// Only an unknown unit is an error; everything else lands in a section.
pub fn build_unit_report(
    catalog: &TemplateCatalog,
    unit_label: &str,
    table: &HistoricalTable,
    config: &AnalysisConfig,
    options: &ReportOptions,
) -> CheckResult<UnitReport> {
    let unit = catalog
        .unit(unit_label)
        .ok_or_else(|| CheckError::UnknownUnit(unit_label.to_string()))?;

    let hist = &config.historical;
    let split = split_historical(table, hist);
    if let Err(e) = &split {
        log::warn!("Historical table for {} rejected: {}", unit_label, e);
    }

    let preview = FormatPreview {
        table: table.head(hist.preview_rows),
        layout_issues: split
            .as_ref()
            .map(|s| s.layout_issues.clone())
            .unwrap_or_default(),
    };

    let headers = section(&split, |s| {
        let records = header_records(&s.header_block, &hist.display_prefix);
        Ok(reconcile_headers(
            &unit.entries,
            &records,
            &ReconcileOptions {
                point_type: config.template.analog_point_type.clone(),
                full_listing: options.full_listing,
            },
        ))
    });

    let temporal = section(&split, |s| {
        Ok(analyze_timestamps(&s.data_block, &hist.timestamp_format))
    });

    let window_hours = options.window_hours.unwrap_or(config.quality.window_hours);
    let quality = section(&split, |s| {
        analyze_quality(&s.data_block, window_hours, &config.quality)
    });

    let advisories = headers
        .ok()
        .and_then(|r| r.advisory.clone())
        .into_iter()
        .chain(temporal.ok().and_then(|r| r.advisory.clone()))
        .collect();

    Ok(UnitReport {
        title: catalog.title.clone(),
        unit: unit.label.clone(),
        preview,
        headers,
        temporal,
        quality,
        advisories,
    })
}
