//! Domain models for the TDT catalog and historian exports.
//!
//! Raw tables hold cells as loaded; the catalog and split export types are
//! what the parsers produce and the analysis services consume.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single spreadsheet/CSV cell. Blank cells are `None`.
pub type Cell = Option<String>;

/// Build a [`Cell`] from raw text, treating whitespace-only text as blank.
pub fn cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Opaque identity of the TDT currently loaded in a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TdtIdentity(pub String);

impl TdtIdentity {
    /// Identity derived from the uploaded file content (SHA-256, hex encoded).
    pub fn from_bytes(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(hex::encode(hasher.finalize()))
    }

    /// Identity supplied by the caller, e.g. an upload widget handle.
    pub fn from_handle(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The "Point Survey" sheet as uploaded: one label per column plus the grid below it.
///
/// Column 0 holds metric names, column 1 metric types, and each plant unit
/// owns a block of five columns after that. Blank header cells carry
/// auto-generated placeholder labels or `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTemplateTable {
    pub labels: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTemplateTable {
    pub fn new(labels: Vec<Cell>, rows: Vec<Vec<Cell>>) -> Self {
        Self { labels, rows }
    }

    /// Number of columns, taken from the label row.
    pub fn width(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }
}

/// One metric of one plant unit in the TDT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointCatalogEntry {
    pub metric_name: String,
    pub metric_type: Cell,
    pub point_type: Cell,
    pub canary_point_name: Cell,
    pub canary_description: Cell,
    /// Extended-name equivalent on the historian side.
    pub metric: Cell,
    pub unit: Cell,
}

impl PointCatalogEntry {
    pub fn is_point_type(&self, point_type: &str) -> bool {
        self.point_type.as_deref() == Some(point_type)
    }
}

/// Point catalog of a single plant unit, in template row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCatalog {
    pub label: String,
    pub entries: Vec<PointCatalogEntry>,
}

/// Parsed TDT: title plus one catalog per plant unit, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub title: Option<String>,
    pub units: Vec<UnitCatalog>,
}

impl TemplateCatalog {
    pub fn unit(&self, label: &str) -> Option<&UnitCatalog> {
        self.units.iter().find(|u| u.label == label)
    }

    pub fn unit_labels(&self) -> Vec<String> {
        self.units.iter().map(|u| u.label.clone()).collect()
    }

    /// Entries of `label` whose point type equals `point_type`.
    pub fn points_of_type(&self, label: &str, point_type: &str) -> Vec<PointCatalogEntry> {
        self.unit(label)
            .map(|u| {
                u.entries
                    .iter()
                    .filter(|e| e.is_point_type(point_type))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Identity and presentation name of a point or data column.
///
/// `canonical_id` is what joins and lookups use; `display_label` is only for
/// rendering and is never fed back into identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointLabel {
    pub canonical_id: String,
    pub display_label: String,
}

/// An uploaded historian export as read from CSV.
///
/// `columns` is the CSV header line (column 0 is the "Point Name"
/// placeholder); `rows` holds every line after it, the first four being the
/// header block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl HistoricalTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// First `n` rows, used for the format preview.
    pub fn head(&self, n: usize) -> HistoricalTable {
        HistoricalTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Header information of one historian column, transposed from the header block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    /// Position of the column in the export (1-based, column 0 is the datetime).
    pub column_index: usize,
    /// Normalized point name used as the join key.
    pub point_name: String,
    pub label: PointLabel,
    pub description: Cell,
    pub extended_name: Cell,
    pub extended_description: Cell,
    pub unit: Cell,
}

/// Timestamp-keyed observations below the header block, stored column-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataBlock {
    pub datetime_label: String,
    pub timestamps: Vec<Cell>,
    pub columns: Vec<PointLabel>,
    pub values: Vec<Vec<Cell>>,
}

impl DataBlock {
    pub fn height(&self) -> usize {
        self.timestamps.len()
    }

    pub fn column_index(&self, canonical_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.canonical_id == canonical_id)
    }
}
