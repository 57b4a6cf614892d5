//! Catalog sink interface.
//!
//! The relational catalog store is an external collaborator; this module
//! only fixes its interface: append a record batch to a named table,
//! tolerating a variable and evolving column set across batches. A
//! JSON-lines file sink is provided as the reference implementation backing
//! the CLI — JSON objects carry per-record field sets naturally, so no
//! schema inference pass is needed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::Result;
use crate::record::CatalogRecord;

/// Append-only record sink with union-of-columns schema semantics.
pub trait CatalogSink {
    /// Append a record batch to the named table.
    fn append(&mut self, table: &str, records: &[CatalogRecord]) -> Result<()>;
}

/// JSON-lines file sink: one JSON object per record, appended and synced
/// per batch so each committed archive survives a later crash.
///
/// The reference sink writes a single file and keeps the table name only
/// for logging; a real relational sink maps it to an actual table.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a sink appending to the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSink for JsonlSink {
    fn append(&mut self, table: &str, records: &[CatalogRecord]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for record in records {
            serde_json::to_writer(&mut file, record)?;
            file.write_all(b"\n")?;
        }
        file.sync_all()?;
        tracing::debug!(table, records = records.len(), path = %self.path.display(), "sink append");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_jsonl_sink_appends_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.jsonl");
        let mut sink = JsonlSink::new(&path);

        let first = vec![CatalogRecord::with_provenance("a.zip", "one.fb2")];
        let second = vec![
            CatalogRecord::with_provenance("b.zip", "two.fb2"),
            CatalogRecord::with_provenance("b.zip", "three.fb2"),
        ];
        sink.append("lib_current", &first).unwrap();
        sink.append("lib_current", &second).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("\"zipfile\":\"a.zip\""));
        assert!(lines[2].contains("\"three.fb2\""));
    }
}
