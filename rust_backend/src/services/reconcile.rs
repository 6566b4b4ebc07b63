//! Header reconciliation between a unit's point catalog and a historian export.
//!
//! Only points of the analog point type are compared. Five checks run
//! independently over an outer join keyed by point name:
//!
//! 1. historian point names are unique
//! 2. every catalog point has a historian column and vice versa
//! 3. descriptions agree
//! 4. extended names agree with the catalog metric
//! 5. units agree
//!
//! The extended description is listed for reference only. The join is only
//! attempted when its keys are trustworthy: duplicated historian names yield
//! a degraded result, and blank or duplicated catalog keys require manual
//! review. Both fallbacks list the raw points side by side instead.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::core::domain::{Cell, HeaderRecord, PointCatalogEntry};
use crate::error::Advisory;

/// Result of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
    /// Informational listing without a pass/fail rule.
    Unconstrained,
}

/// The header checks, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    DuplicateNames,
    NameMatch,
    DescriptionMatch,
    ExtendedNameMatch,
    ExtendedDescription,
    UnitMatch,
}

impl CheckKind {
    pub fn title(&self) -> &'static str {
        match self {
            CheckKind::DuplicateNames => "[Hist] Point Name duplicated",
            CheckKind::NameMatch => "[Hist] Point Name == [TDT] Canary Point Name",
            CheckKind::DescriptionMatch => "[Hist] Description == [TDT] Canary Description",
            CheckKind::ExtendedNameMatch => "[Hist] Extended Name == [TDT] Metric",
            CheckKind::ExtendedDescription => "[Hist] Extended Description (free text)",
            CheckKind::UnitMatch => "[Hist] Unit == [TDT] Unit",
        }
    }
}

/// One evidence line with the catalog side and the historian side next to each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceRow {
    /// Join key (normalized point name).
    pub key: Option<String>,
    /// Position of the entry in the unit catalog.
    pub catalog_index: Option<usize>,
    pub catalog_value: Cell,
    /// Column of the point in the historian export.
    pub historical_index: Option<usize>,
    pub historical_value: Cell,
    pub matches: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub verdict: Verdict,
    pub evidence: Vec<EvidenceRow>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

/// All checks of a successful join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderChecks {
    pub duplicate_names: CheckOutcome,
    pub name_match: CheckOutcome,
    pub description_match: CheckOutcome,
    pub extended_name_match: CheckOutcome,
    pub extended_description: CheckOutcome,
    pub unit_match: CheckOutcome,
}

impl HeaderChecks {
    pub fn outcomes(&self) -> [&CheckOutcome; 6] {
        [
            &self.duplicate_names,
            &self.name_match,
            &self.description_match,
            &self.extended_name_match,
            &self.extended_description,
            &self.unit_match,
        ]
    }

    /// True when every constrained check passed.
    pub fn all_passed(&self) -> bool {
        self.outcomes()
            .iter()
            .all(|o| o.verdict != Verdict::Fail)
    }
}

/// Raw point-name lists for manual comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideBySide {
    pub catalog_points: Vec<Cell>,
    pub historical_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReconciliationResult {
    Succeeded(HeaderChecks),
    /// Historian point names are duplicated; checks 2-5 were skipped.
    Degraded {
        reason: String,
        duplicate_names: CheckOutcome,
        side_by_side: SideBySide,
    },
    /// The join keys could not be trusted; everything is listed for review.
    ManualReviewRequired {
        reason: String,
        duplicate_names: CheckOutcome,
        catalog: Vec<PointCatalogEntry>,
        historical: Vec<HeaderRecord>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub result: ReconciliationResult,
    pub advisory: Option<Advisory>,
}

impl ReconciliationReport {
    pub fn is_degraded(&self) -> bool {
        !matches!(self.result, ReconciliationResult::Succeeded(_))
    }

    pub fn checks(&self) -> Option<&HeaderChecks> {
        match &self.result {
            ReconciliationResult::Succeeded(checks) => Some(checks),
            _ => None,
        }
    }

    pub fn duplicate_names(&self) -> &CheckOutcome {
        match &self.result {
            ReconciliationResult::Succeeded(checks) => &checks.duplicate_names,
            ReconciliationResult::Degraded { duplicate_names, .. }
            | ReconciliationResult::ManualReviewRequired { duplicate_names, .. } => {
                duplicate_names
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Point type that takes part in the comparison.
    pub point_type: String,
    /// List every joined row instead of only the offending ones.
    pub full_listing: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            point_type: "Analog".to_string(),
            full_listing: false,
        }
    }
}

/// A catalog entry, its position, and its join key.
struct CatalogPoint<'a> {
    index: usize,
    key: String,
    entry: &'a PointCatalogEntry,
}

struct JoinedRow<'a> {
    key: String,
    catalog: Option<&'a CatalogPoint<'a>>,
    historical: Option<&'a HeaderRecord>,
}

fn check_duplicates(records: &[HeaderRecord], full_listing: bool) -> CheckOutcome {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.point_name.as_str()).or_insert(0) += 1;
    }

    let evidence: Vec<EvidenceRow> = records
        .iter()
        .map(|r| (r, counts[r.point_name.as_str()] > 1))
        .filter(|(_, duplicated)| full_listing || *duplicated)
        .map(|(r, duplicated)| EvidenceRow {
            key: Some(r.point_name.clone()),
            catalog_index: None,
            catalog_value: None,
            historical_index: Some(r.column_index),
            historical_value: Some(r.label.canonical_id.clone()),
            matches: !duplicated,
        })
        .collect();

    let verdict = if counts.values().any(|c| *c > 1) {
        Verdict::Fail
    } else {
        Verdict::Pass
    };

    CheckOutcome {
        kind: CheckKind::DuplicateNames,
        verdict,
        evidence,
    }
}

/// Why the catalog side cannot serve as a join key, if it cannot.
fn catalog_key_problem(analog: &[(usize, &PointCatalogEntry)]) -> Option<String> {
    let blank: Vec<String> = analog
        .iter()
        .filter(|(_, e)| e.canary_point_name.is_none())
        .map(|(_, e)| e.metric_name.clone())
        .collect();
    if !blank.is_empty() {
        return Some(format!(
            "catalog points without a Canary Point Name: {}",
            blank.join(", ")
        ));
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let duplicated: Vec<&str> = analog
        .iter()
        .filter_map(|(_, e)| e.canary_point_name.as_deref())
        .filter(|name| !seen.insert(*name))
        .filter(|name| reported.insert(*name))
        .collect();
    if !duplicated.is_empty() {
        return Some(format!(
            "duplicated Canary Point Name in catalog: {}",
            duplicated.join(", ")
        ));
    }

    None
}

/// Outer join in catalog order, followed by historian-only points in export order.
fn outer_join<'a>(
    catalog: &'a [CatalogPoint<'a>],
    records: &'a [HeaderRecord],
) -> Vec<JoinedRow<'a>> {
    let by_name: HashMap<&str, &HeaderRecord> =
        records.iter().map(|r| (r.point_name.as_str(), r)).collect();
    let catalog_keys: HashSet<&str> = catalog.iter().map(|c| c.key.as_str()).collect();

    let mut rows: Vec<JoinedRow<'a>> = catalog
        .iter()
        .map(|c| JoinedRow {
            key: c.key.clone(),
            catalog: Some(c),
            historical: by_name.get(c.key.as_str()).copied(),
        })
        .collect();

    rows.extend(
        records
            .iter()
            .filter(|r| !catalog_keys.contains(r.point_name.as_str()))
            .map(|r| JoinedRow {
                key: r.point_name.clone(),
                catalog: None,
                historical: Some(r),
            }),
    );

    rows
}

fn check_names(rows: &[JoinedRow<'_>], full_listing: bool) -> CheckOutcome {
    let evidence: Vec<EvidenceRow> = rows
        .iter()
        .map(|row| EvidenceRow {
            key: Some(row.key.clone()),
            catalog_index: row.catalog.map(|c| c.index),
            catalog_value: row.catalog.and_then(|c| c.entry.canary_point_name.clone()),
            historical_index: row.historical.map(|h| h.column_index),
            historical_value: row.historical.map(|h| h.point_name.clone()),
            matches: row.catalog.is_some() && row.historical.is_some(),
        })
        .filter(|e| full_listing || !e.matches)
        .collect();

    let all_matched = rows
        .iter()
        .all(|row| row.catalog.is_some() && row.historical.is_some());

    CheckOutcome {
        kind: CheckKind::NameMatch,
        verdict: if all_matched { Verdict::Pass } else { Verdict::Fail },
        evidence,
    }
}

fn check_field<F, G>(
    kind: CheckKind,
    rows: &[JoinedRow<'_>],
    full_listing: bool,
    catalog_field: F,
    historical_field: G,
) -> CheckOutcome
where
    F: Fn(&PointCatalogEntry) -> &Cell,
    G: Fn(&HeaderRecord) -> &Cell,
{
    let evidence: Vec<EvidenceRow> = rows
        .iter()
        .filter_map(|row| match (row.catalog, row.historical) {
            (Some(c), Some(h)) => Some((c, h)),
            _ => None,
        })
        .map(|(c, h)| {
            let catalog_value = catalog_field(c.entry).clone();
            let historical_value = historical_field(h).clone();
            EvidenceRow {
                key: Some(c.key.clone()),
                catalog_index: Some(c.index),
                matches: catalog_value == historical_value,
                catalog_value,
                historical_index: Some(h.column_index),
                historical_value,
            }
        })
        .collect();

    let verdict = if evidence.iter().all(|e| e.matches) {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    let evidence = evidence
        .into_iter()
        .filter(|e| full_listing || !e.matches)
        .collect();

    CheckOutcome {
        kind,
        verdict,
        evidence,
    }
}

fn list_extended_descriptions(records: &[HeaderRecord]) -> CheckOutcome {
    CheckOutcome {
        kind: CheckKind::ExtendedDescription,
        verdict: Verdict::Unconstrained,
        evidence: records
            .iter()
            .map(|r| EvidenceRow {
                key: Some(r.point_name.clone()),
                catalog_index: None,
                catalog_value: None,
                historical_index: Some(r.column_index),
                historical_value: r.extended_description.clone(),
                matches: true,
            })
            .collect(),
    }
}

/// Compare the historian header records against a unit's point catalog.
///
/// Never fails: untrustworthy join keys produce a degraded result.
pub fn reconcile_headers(
    unit_entries: &[PointCatalogEntry],
    records: &[HeaderRecord],
    options: &ReconcileOptions,
) -> ReconciliationReport {
    let duplicate_names = check_duplicates(records, options.full_listing);

    if !duplicate_names.passed() {
        let reason = "point names in historical data are duplicated".to_string();
        log::warn!("Header reconciliation degraded: {}", reason);
        return ReconciliationReport {
            advisory: Some(Advisory::ReconciliationDegraded {
                reason: reason.clone(),
            }),
            result: ReconciliationResult::Degraded {
                reason,
                duplicate_names,
                side_by_side: SideBySide {
                    catalog_points: unit_entries
                        .iter()
                        .map(|e| e.canary_point_name.clone())
                        .collect(),
                    historical_points: records.iter().map(|r| r.point_name.clone()).collect(),
                },
            },
        };
    }

    let analog: Vec<(usize, &PointCatalogEntry)> = unit_entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_point_type(&options.point_type))
        .collect();

    if let Some(reason) = catalog_key_problem(&analog) {
        log::warn!("Header reconciliation needs manual review: {}", reason);
        return ReconciliationReport {
            advisory: Some(Advisory::ReconciliationDegraded {
                reason: reason.clone(),
            }),
            result: ReconciliationResult::ManualReviewRequired {
                reason,
                duplicate_names,
                catalog: unit_entries.to_vec(),
                historical: records.to_vec(),
            },
        };
    }

    let catalog: Vec<CatalogPoint<'_>> = analog
        .iter()
        .filter_map(|(index, entry)| {
            entry.canary_point_name.as_ref().map(|key| CatalogPoint {
                index: *index,
                key: key.clone(),
                entry: *entry,
            })
        })
        .collect();
    let rows = outer_join(&catalog, records);
    let full = options.full_listing;

    let checks = HeaderChecks {
        duplicate_names,
        name_match: check_names(&rows, full),
        description_match: check_field(
            CheckKind::DescriptionMatch,
            &rows,
            full,
            |c| &c.canary_description,
            |h| &h.description,
        ),
        extended_name_match: check_field(
            CheckKind::ExtendedNameMatch,
            &rows,
            full,
            |c| &c.metric,
            |h| &h.extended_name,
        ),
        extended_description: list_extended_descriptions(records),
        unit_match: check_field(
            CheckKind::UnitMatch,
            &rows,
            full,
            |c| &c.unit,
            |h| &h.unit,
        ),
    };

    log::debug!(
        "Header reconciliation: {} catalog points, {} historian points, all passed: {}",
        catalog.len(),
        records.len(),
        checks.all_passed()
    );

    ReconciliationReport {
        result: ReconciliationResult::Succeeded(checks),
        advisory: None,
    }
}
