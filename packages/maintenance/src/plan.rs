//! Entry name sets derived from catalog queries.
//!
//! A maintenance run is driven by per-archive sets of entry names. The sets
//! are built fresh per run from a catalog export: either a tab-separated
//! `zipfile<TAB>entry` list, or a JSON-lines record file as written by the
//! cataloger's sink (optionally filtered to error records, the usual input
//! when splitting an error subset out of a library).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use homelib_cataloger::config::{FIELD_ERROR, FIELD_XML_FILENAME, FIELD_ZIPFILE};

use crate::error::{MaintenanceError, Result};

/// Per-archive sets of entry names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPlan {
    sets: BTreeMap<String, BTreeSet<String>>,
}

impl EntryPlan {
    /// Create an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from (archive, entry) pairs.
    pub fn from_pairs<A, E>(pairs: impl IntoIterator<Item = (A, E)>) -> Self
    where
        A: Into<String>,
        E: Into<String>,
    {
        let mut plan = Self::new();
        for (archive, entry) in pairs {
            plan.insert(archive, entry);
        }
        plan
    }

    /// Add one entry name to an archive's set.
    pub fn insert(&mut self, archive: impl Into<String>, entry: impl Into<String>) {
        self.sets
            .entry(archive.into())
            .or_default()
            .insert(entry.into());
    }

    /// Iterate archives and their entry sets, in archive-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.sets.iter().map(|(name, set)| (name.as_str(), set))
    }

    /// Entry set for one archive.
    #[must_use]
    pub fn get(&self, archive: &str) -> Option<&BTreeSet<String>> {
        self.sets.get(archive)
    }

    /// Number of archives in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the plan names no archives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Load a plan from a tab-separated list file.
    ///
    /// One `zipfile<TAB>entry` pair per line; blank lines and `#` comments
    /// are ignored.
    pub fn from_list_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut plan = Self::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((archive, entry)) = line.split_once('\t') else {
                return Err(MaintenanceError::InvalidListLine {
                    line: index + 1,
                    text: line.to_string(),
                });
            };
            if archive.is_empty() || entry.is_empty() {
                return Err(MaintenanceError::InvalidListLine {
                    line: index + 1,
                    text: line.to_string(),
                });
            }
            plan.insert(archive, entry);
        }
        Ok(plan)
    }

    /// Load a plan from a JSON-lines catalog export.
    ///
    /// Every record must carry the `zipfile` and `xml_filename` provenance
    /// fields. With `errors_only`, records without a non-null `error` field
    /// are ignored — the selection used to split an error subset out of the
    /// library.
    pub fn from_catalog_file(path: &Path, errors_only: bool) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut plan = Self::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: serde_json::Value = serde_json::from_str(line)?;
            if errors_only {
                let has_error = record
                    .get(FIELD_ERROR)
                    .is_some_and(|value| !value.is_null());
                if !has_error {
                    continue;
                }
            }
            let (Some(archive), Some(entry)) = (
                record.get(FIELD_ZIPFILE).and_then(|v| v.as_str()),
                record.get(FIELD_XML_FILENAME).and_then(|v| v.as_str()),
            ) else {
                return Err(MaintenanceError::MissingProvenance { line: index + 1 });
            };
            plan.insert(archive, entry);
        }
        Ok(plan)
    }
}
