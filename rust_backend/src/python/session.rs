use pyo3::prelude::*;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::core::domain::{TdtIdentity, TemplateCatalog};
use crate::error::CheckError;
use crate::io::loaders::{HistoricalLoader, TemplateLoader};
use crate::parsing::historical::split_historical;
use crate::parsing::tdt_parser::parse_template;
use crate::python::{check_err, json_err, load_err};
use crate::services::series::extract_series;
use crate::services::unit_report::{build_unit_report, ReportOptions};
use crate::session::{SessionStore, TdtTransition};

#[derive(Serialize)]
struct TdtLoaded<'a> {
    identity: &'a str,
    title: Option<&'a str>,
    units: &'a [String],
    #[serde(flatten)]
    transition: TdtTransition,
}

/// Per-session state: the active TDT, its parsed catalog, and uploads.
#[pyclass(name = "Session")]
pub struct PySession {
    store: SessionStore,
    catalog: Option<TemplateCatalog>,
    config: AnalysisConfig,
}

impl PySession {
    fn catalog(&self) -> PyResult<&TemplateCatalog> {
        self.catalog
            .as_ref()
            .ok_or_else(|| check_err(CheckError::NoTemplateLoaded))
    }
}

#[pymethods]
impl PySession {
    /// Create a session, reading settings from `config_path` or the default location.
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<&str>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => AnalysisConfig::from_file(path),
            None => AnalysisConfig::load_or_default(),
        }
        .and_then(AnalysisConfig::with_env_overrides)
        .map_err(check_err)?;

        Ok(Self {
            store: SessionStore::new(),
            catalog: None,
            config,
        })
    }

    /// Load a TDT (Point Survey sheet as CSV). Returns JSON describing the transition.
    fn load_tdt(&mut self, content: &[u8]) -> PyResult<String> {
        let table = TemplateLoader::load_from_bytes(content).map_err(load_err)?;
        let catalog = parse_template(&table, &self.config.template).map_err(check_err)?;
        let identity = TdtIdentity::from_bytes(content);

        let units = catalog.unit_labels();
        let transition = self.store.load_tdt(identity.clone(), &units);
        self.catalog = Some(catalog);

        let loaded = TdtLoaded {
            identity: identity.as_str(),
            title: self.catalog.as_ref().and_then(|c| c.title.as_deref()),
            units: &units,
            transition,
        };
        serde_json::to_string(&loaded).map_err(json_err)
    }

    /// Store the historian export uploaded for `unit`.
    fn upload_historical(&mut self, unit: &str, content: &[u8], filename: &str) -> PyResult<()> {
        let table = HistoricalLoader::load_from_bytes(content).map_err(load_err)?;
        self.store
            .set_historical(unit, table, filename)
            .map_err(check_err)
    }

    fn unit_labels(&self) -> Vec<String> {
        self.store.unit_labels().to_vec()
    }

    fn historical_filename(&self, unit: &str) -> Option<String> {
        self.store.historical_filename(unit).map(str::to_string)
    }

    /// Full report for `unit` as JSON, or `None` when nothing was uploaded for it.
    #[pyo3(signature = (unit, window_hours=None, full_listing=false))]
    fn unit_report(
        &self,
        unit: &str,
        window_hours: Option<u32>,
        full_listing: bool,
    ) -> PyResult<Option<String>> {
        let catalog = self.catalog()?;
        let Some(table) = self.store.get_historical(unit) else {
            return Ok(None);
        };
        let options = ReportOptions {
            window_hours,
            full_listing,
        };
        let report =
            build_unit_report(catalog, unit, table, &self.config, &options).map_err(check_err)?;
        serde_json::to_string(&report).map(Some).map_err(json_err)
    }

    /// Numeric series of the selected columns for plotting, as JSON.
    #[pyo3(signature = (unit, columns, normalize=false))]
    fn series(&self, unit: &str, columns: Vec<String>, normalize: bool) -> PyResult<Option<String>> {
        let Some(table) = self.store.get_historical(unit) else {
            return Ok(None);
        };
        let normalized = split_historical(table, &self.config.historical).map_err(check_err)?;
        let set = extract_series(&normalized.data_block, &columns, normalize);
        serde_json::to_string(&set).map(Some).map_err(json_err)
    }
}
