//! Tabular catalog records with a per-processor variable field set.
//!
//! Field sets genuinely vary by processor and by data (numbered tag
//! occurrences), so a record is an ordered mapping rather than a fixed
//! struct. Persistence layers are expected to tolerate additive,
//! union-of-columns schema evolution across appended batches.

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{FIELD_ERROR, FIELD_XML_FILENAME, FIELD_ZIPFILE};

/// Ordered field-name to value mapping produced by a processor.
pub type FieldMap = IndexMap<String, Option<String>>;

/// One tabular row of extracted fields plus provenance.
///
/// Always contains the `zipfile` and `xml_filename` provenance fields. On
/// extraction failure the processor fields are replaced by a single `error`
/// field; success and failure fields never mix in one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CatalogRecord {
    fields: FieldMap,
}

impl CatalogRecord {
    /// Create a record carrying only the provenance fields.
    #[must_use]
    pub fn with_provenance(zipfile: impl Into<String>, xml_filename: impl Into<String>) -> Self {
        let mut fields = FieldMap::new();
        fields.insert(FIELD_ZIPFILE.to_string(), Some(zipfile.into()));
        fields.insert(FIELD_XML_FILENAME.to_string(), Some(xml_filename.into()));
        Self { fields }
    }

    /// Set a field value. An existing field keeps its position; its value is
    /// replaced (last writer wins).
    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) {
        self.fields.insert(name.into(), value);
    }

    /// Merge processor output into this record, after the provenance fields.
    pub fn merge(&mut self, fields: FieldMap) {
        for (name, value) in fields {
            self.fields.insert(name, value);
        }
    }

    /// Get a field value. Returns `None` for an absent field and
    /// `Some(None)` for a field explicitly set to null.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Option<String>> {
        self.fields.get(name)
    }

    /// Whether this record carries an `error` field.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.fields.contains_key(FIELD_ERROR)
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of fields, provenance included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Replace empty-string values with null in place.
    fn coerce_empty(&mut self) {
        for value in self.fields.values_mut() {
            if value.as_deref() == Some("") {
                *value = None;
            }
        }
    }
}

/// Coerce empty-string field values to null uniformly across a record set.
///
/// A single pass over the accumulated records, applied once before the set
/// leaves the pipeline rather than per entry.
pub fn coerce_empty_to_null(records: &mut [CatalogRecord]) {
    for record in records {
        record.coerce_empty();
    }
}
