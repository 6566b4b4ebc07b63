use pyo3::prelude::*;

use crate::config::AnalysisConfig;
use crate::io::loaders::{HistoricalLoader, TemplateLoader};
use crate::parsing::tdt_parser::parse_template;
use crate::python::{check_err, json_err, load_err};
use crate::services::unit_report::{build_unit_report, ReportOptions};

/// Parse a TDT (Point Survey sheet as CSV) with default settings.
///
/// Returns:
///     str: JSON of the template catalog (title and per-unit points)
#[pyfunction]
pub fn parse_tdt(content: &[u8]) -> PyResult<String> {
    let config = AnalysisConfig::default();
    let table = TemplateLoader::load_from_bytes(content).map_err(load_err)?;
    let catalog = parse_template(&table, &config.template).map_err(check_err)?;
    serde_json::to_string(&catalog).map_err(json_err)
}

/// Check one historian export against a TDT without keeping a session.
///
/// Args:
///     tdt: Point Survey sheet as CSV bytes
///     historical: historian export as CSV bytes
///     unit: plant unit label the export belongs to
///     window_hours: freeze-detection window (default from settings)
///     full_listing: list every joined point, not only offending ones
///
/// Returns:
///     str: JSON unit report
#[pyfunction]
#[pyo3(signature = (tdt, historical, unit, window_hours=None, full_listing=false))]
pub fn check_unit(
    tdt: &[u8],
    historical: &[u8],
    unit: &str,
    window_hours: Option<u32>,
    full_listing: bool,
) -> PyResult<String> {
    let config = AnalysisConfig::default();
    let catalog = parse_template(
        &TemplateLoader::load_from_bytes(tdt).map_err(load_err)?,
        &config.template,
    )
    .map_err(check_err)?;
    let table = HistoricalLoader::load_from_bytes(historical).map_err(load_err)?;

    let options = ReportOptions {
        window_hours,
        full_listing,
    };
    let report = build_unit_report(&catalog, unit, &table, &config, &options).map_err(check_err)?;
    serde_json::to_string(&report).map_err(json_err)
}
