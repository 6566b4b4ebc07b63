//! In-memory session state.
//!
//! Holds the identity of the TDT currently loaded and, per plant unit, the
//! historian export uploaded for it. Loading a different TDT discards every
//! upload: the new template may redefine units or points.

use serde::Serialize;
use std::collections::HashMap;

use crate::core::domain::{HistoricalTable, TdtIdentity};
use crate::error::{CheckError, CheckResult};

/// Outcome of [`SessionStore::load_tdt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum TdtTransition {
    /// First TDT of the session.
    Initialized,
    /// A different TDT replaced the active one; uploads for these units were dropped.
    Replaced { discarded_uploads: Vec<String> },
    /// Same TDT as before; uploads kept.
    Unchanged,
}

/// Per-session store of the active TDT and uploaded historian tables.
#[derive(Debug, Default)]
pub struct SessionStore {
    active_tdt: Option<TdtIdentity>,
    unit_labels: Vec<String>,
    historical_by_unit: HashMap<String, Option<HistoricalTable>>,
    historical_filename_by_unit: HashMap<String, Option<String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `identity` as the active TDT.
    ///
    /// A first load or a changed identity resets both per-unit maps to
    /// all-absent over `unit_labels`. An unchanged identity leaves them alone.
    pub fn load_tdt(&mut self, identity: TdtIdentity, unit_labels: &[String]) -> TdtTransition {
        let transition = match &self.active_tdt {
            None => TdtTransition::Initialized,
            Some(current) if *current == identity => return TdtTransition::Unchanged,
            Some(_) => TdtTransition::Replaced {
                discarded_uploads: self.uploaded_units(),
            },
        };

        if let TdtTransition::Replaced { discarded_uploads } = &transition {
            log::info!(
                "TDT changed to {}; discarding {} historical upload(s)",
                identity.as_str(),
                discarded_uploads.len()
            );
        }

        self.active_tdt = Some(identity);
        self.reset_units(unit_labels);
        transition
    }

    fn reset_units(&mut self, unit_labels: &[String]) {
        self.unit_labels = unit_labels.to_vec();
        self.historical_by_unit = unit_labels.iter().map(|u| (u.clone(), None)).collect();
        self.historical_filename_by_unit =
            unit_labels.iter().map(|u| (u.clone(), None)).collect();
    }

    fn require_unit(&self, unit_label: &str) -> CheckResult<()> {
        if self.active_tdt.is_none() {
            return Err(CheckError::NoTemplateLoaded);
        }
        if !self.historical_by_unit.contains_key(unit_label) {
            return Err(CheckError::UnknownUnit(unit_label.to_string()));
        }
        Ok(())
    }

    /// Store the historian table uploaded for one unit, replacing any previous one.
    pub fn set_historical(
        &mut self,
        unit_label: &str,
        table: HistoricalTable,
        filename: impl Into<String>,
    ) -> CheckResult<()> {
        self.require_unit(unit_label)?;
        let filename = filename.into();
        log::debug!("Stored historical upload '{}' for {}", filename, unit_label);
        self.historical_by_unit
            .insert(unit_label.to_string(), Some(table));
        self.historical_filename_by_unit
            .insert(unit_label.to_string(), Some(filename));
        Ok(())
    }

    pub fn get_historical(&self, unit_label: &str) -> Option<&HistoricalTable> {
        self.historical_by_unit
            .get(unit_label)
            .and_then(|t| t.as_ref())
    }

    pub fn historical_filename(&self, unit_label: &str) -> Option<&str> {
        self.historical_filename_by_unit
            .get(unit_label)
            .and_then(|f| f.as_deref())
    }

    pub fn active_identity(&self) -> Option<&TdtIdentity> {
        self.active_tdt.as_ref()
    }

    /// Unit labels of the active TDT, in template order.
    pub fn unit_labels(&self) -> &[String] {
        &self.unit_labels
    }

    /// Units that currently have an upload, in template order.
    pub fn uploaded_units(&self) -> Vec<String> {
        self.unit_labels
            .iter()
            .filter(|u| self.get_historical(u).is_some())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn table() -> HistoricalTable {
        HistoricalTable::new(vec!["Point Name".to_string()], vec![])
    }

    #[test]
    fn test_first_load_initializes_all_absent() {
        let mut store = SessionStore::new();
        let transition = store.load_tdt(TdtIdentity::from_handle("a"), &units(&["U1", "U2"]));

        assert_eq!(transition, TdtTransition::Initialized);
        assert_eq!(store.unit_labels(), &units(&["U1", "U2"])[..]);
        assert!(store.get_historical("U1").is_none());
        assert!(store.historical_filename("U2").is_none());
    }

    #[test]
    fn test_same_identity_keeps_uploads() {
        let mut store = SessionStore::new();
        store.load_tdt(TdtIdentity::from_handle("a"), &units(&["U1"]));
        store.set_historical("U1", table(), "u1.csv").unwrap();

        let transition = store.load_tdt(TdtIdentity::from_handle("a"), &units(&["U1"]));
        assert_eq!(transition, TdtTransition::Unchanged);
        assert!(store.get_historical("U1").is_some());
        assert_eq!(store.historical_filename("U1"), Some("u1.csv"));
    }

    #[test]
    fn test_new_identity_resets_even_same_unit_names() {
        let mut store = SessionStore::new();
        store.load_tdt(TdtIdentity::from_handle("a"), &units(&["U1", "U2"]));
        store.set_historical("U1", table(), "u1.csv").unwrap();

        let transition = store.load_tdt(TdtIdentity::from_handle("b"), &units(&["U1", "U2"]));
        assert_eq!(
            transition,
            TdtTransition::Replaced {
                discarded_uploads: units(&["U1"])
            }
        );
        assert!(store.get_historical("U1").is_none());
        assert!(store.historical_filename("U1").is_none());
        assert!(store.uploaded_units().is_empty());
    }

    #[test]
    fn test_new_identity_replaces_unit_set() {
        let mut store = SessionStore::new();
        store.load_tdt(TdtIdentity::from_handle("a"), &units(&["U1", "U2"]));
        store.load_tdt(TdtIdentity::from_handle("b"), &units(&["GT-1"]));

        assert_eq!(store.unit_labels(), &units(&["GT-1"])[..]);
        assert!(matches!(
            store.set_historical("U1", table(), "x.csv"),
            Err(CheckError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_set_historical_only_touches_one_unit() {
        let mut store = SessionStore::new();
        store.load_tdt(TdtIdentity::from_handle("a"), &units(&["U1", "U2"]));
        store.set_historical("U2", table(), "first.csv").unwrap();
        store.set_historical("U2", table(), "second.csv").unwrap();

        assert!(store.get_historical("U1").is_none());
        assert_eq!(store.historical_filename("U2"), Some("second.csv"));
        assert_eq!(store.uploaded_units(), units(&["U2"]));
    }

    #[test]
    fn test_upload_without_tdt_fails() {
        let mut store = SessionStore::new();
        assert!(matches!(
            store.set_historical("U1", table(), "u1.csv"),
            Err(CheckError::NoTemplateLoaded)
        ));
    }
}
