//! Core domain models for TDT and historian data.
//!
//! This module defines the tabular inputs (template grid, historian export),
//! the normalized point catalog and header records derived from them, and the
//! identity types that tie uploads to a session.

pub mod domain;

pub use domain::{
    cell, Cell, DataBlock, HeaderRecord, HistoricalTable, PointCatalogEntry, PointLabel,
    RawTemplateTable, TdtIdentity, TemplateCatalog, UnitCatalog,
};
