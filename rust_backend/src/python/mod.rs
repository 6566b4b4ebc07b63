//! Python bindings used by the Streamlit front end.
//!
//! The front end keeps one [`session::PySession`] per browser session and
//! renders the JSON reports it returns.
//!
//! - [`session`]: stateful `Session` class mirroring the upload workflow
//! - [`checks`]: one-shot functions for scripts and notebooks
//!
//! # Python API
//!
//! ```python
//! import tdt_hist
//!
//! session = tdt_hist.Session()
//! info = json.loads(session.load_tdt(tdt_bytes))
//! session.upload_historical("Unit 1", hist_bytes, "unit1.csv")
//! report = json.loads(session.unit_report("Unit 1", window_hours=6))
//! ```

pub mod checks;
pub mod session;

pub use checks::{check_unit, parse_tdt};
pub use session::PySession;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::PyErr;

use crate::error::CheckError;

pub(crate) fn check_err(e: CheckError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

pub(crate) fn load_err(e: anyhow::Error) -> PyErr {
    PyRuntimeError::new_err(format!("Failed to load file: {:#}", e))
}

pub(crate) fn json_err(e: serde_json::Error) -> PyErr {
    PyRuntimeError::new_err(format!("Failed to serialize report: {}", e))
}
