//! Error and advisory types shared across the analysis pipeline.
//!
//! Structural problems with an uploaded file are `CheckError`s and abort
//! processing of that file. Reconciliation fallbacks and non-conformant
//! timestamps are not errors: they travel inside results as an [`Advisory`].

use serde::Serialize;

/// Result type for analysis operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Error type for analysis operations
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    #[error("Insufficient rows: table has {rows} rows, at least {required} required")]
    InsufficientRows { rows: usize, required: usize },

    #[error("Unknown plant unit: {0}")]
    UnknownUnit(String),

    #[error("No TDT has been loaded in this session")]
    NoTemplateLoaded,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table read error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Non-fatal findings reported alongside a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The header join could not be trusted; evidence is listed side by side instead.
    ReconciliationDegraded { reason: String },
    /// Timestamps did not match the documented layout and were parsed permissively.
    FormatNonConformant {
        expected_format: String,
        first_offending_value: Option<String>,
        offending_rows: usize,
    },
}

impl Advisory {
    pub fn message(&self) -> String {
        match self {
            Advisory::ReconciliationDegraded { reason } => {
                format!("Header comparison degraded: {}", reason)
            }
            Advisory::FormatNonConformant {
                expected_format,
                first_offending_value,
                offending_rows,
            } => format!(
                "{} timestamp(s) not in format {} (first: {})",
                offending_rows,
                expected_format,
                first_offending_value.as_deref().unwrap_or("<blank>")
            ),
        }
    }
}
