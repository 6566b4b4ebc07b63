//! File loaders for uploaded tables.
//!
//! Both uploads arrive as CSV and are read with polars, every field as text.
//! Nothing is interpreted here beyond splitting off the header line.
//!
//! # Example
//!
//! ```no_run
//! use tdt_hist::io::loaders::HistoricalLoader;
//! use std::path::Path;
//!
//! let table = HistoricalLoader::load_from_csv(Path::new("unit1_export.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} rows", table.height());
//! ```

pub mod loaders;

#[cfg(test)]
mod loaders_tests;

pub use loaders::{HistoricalLoader, TemplateLoader};
