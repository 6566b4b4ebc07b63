//! Parsers for the two uploaded table layouts.
//!
//! # Parsers
//!
//! - [`tdt_parser`]: Point Survey sheet into per-unit point catalogs
//! - [`historical`]: Historian export into header block and data block
//!
//! # Example
//!
//! ```no_run
//! use tdt_hist::config::AnalysisConfig;
//! use tdt_hist::io::loaders::TemplateLoader;
//! use tdt_hist::parsing::tdt_parser::parse_template;
//! use std::path::Path;
//!
//! let config = AnalysisConfig::default();
//! let table = TemplateLoader::load_from_csv(Path::new("point_survey.csv"))
//!     .expect("Failed to read template");
//! let catalog = parse_template(&table, &config.template).expect("Malformed template");
//! println!("{} plant units", catalog.units.len());
//! ```

pub mod historical;
pub mod tdt_parser;

#[cfg(test)]
mod historical_tests;

pub use historical::{
    display_label, header_records, normalize_point_name, split_historical, HeaderBlock,
    NormalizedHistorical,
};
pub use tdt_parser::{parse_template, UnitBlockSchema, POINT_SURVEY_SCHEMA};
