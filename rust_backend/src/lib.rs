//! Validation of a Tag Definition Table (TDT) against historian exports.
//!
//! A TDT lists, per plant unit, the points a historian is expected to carry.
//! Historian exports are checked against it for header agreement, timestamp
//! integrity, and data quality.

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod services;
pub mod session;
pub mod time;

#[cfg(feature = "python")]
pub mod python;

pub use config::AnalysisConfig;
pub use error::{Advisory, CheckError, CheckResult};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python extension module.
#[cfg(feature = "python")]
#[pymodule]
fn tdt_hist(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PySession>()?;
    m.add_function(wrap_pyfunction!(python::parse_tdt, m)?)?;
    m.add_function(wrap_pyfunction!(python::check_unit, m)?)?;
    Ok(())
}
