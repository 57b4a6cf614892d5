//! Entry and batch cataloging: drive archive entries through a processor.
//!
//! The entry cataloger never fails past its own boundary: every extraction
//! error is folded into an `error` field on the emitted record, so row
//! counts downstream stay predictable. Archive enumeration problems (a
//! folder that cannot be read, an archive that is not a zip file) do
//! propagate — they are batch-level conditions, not per-entry ones.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::config::{is_document_entry, ARCHIVE_EXTENSION, FIELD_ERROR};
use crate::error::Result;
use crate::processors::Processor;
use crate::record::{coerce_empty_to_null, CatalogRecord, FieldMap};
use crate::sink::CatalogSink;

/// Counts reported by a sink-mode folder scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Archives processed.
    pub archives: usize,
    /// Records appended.
    pub records: usize,
}

/// Catalog one entry, producing exactly one record.
///
/// Provenance fields are set first; on any extraction failure the processor
/// fields are replaced by a single `error` field and the record is still
/// emitted.
///
/// # Arguments
/// * `archive` - Open zip archive containing the entry
/// * `archive_path` - Path the archive was opened from (provenance)
/// * `entry_name` - Entry name inside the archive
/// * `processor` - Field processor to run
pub fn catalog_entry(
    archive: &mut ZipArchive<File>,
    archive_path: &Path,
    entry_name: &str,
    processor: &Processor,
) -> CatalogRecord {
    let zipfile = archive_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| archive_path.display().to_string());
    let mut record = CatalogRecord::with_provenance(zipfile, entry_name);

    match run_on_entry(archive, entry_name, processor) {
        Ok(fields) => record.merge(fields),
        Err(e) => {
            tracing::debug!(entry = entry_name, error = %e, "entry extraction failed");
            record.set(FIELD_ERROR, Some(e.to_string()));
        }
    }
    record
}

fn run_on_entry(
    archive: &mut ZipArchive<File>,
    entry_name: &str,
    processor: &Processor,
) -> Result<FieldMap> {
    let entry = archive.by_name(entry_name)?;
    processor.extract(BufReader::new(entry))
}

/// Catalog every document entry of one archive, in entry-listing order.
pub fn catalog_archive(path: &Path, processor: &Processor) -> Result<Vec<CatalogRecord>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    let names = document_entries(&mut archive)?;
    tracing::debug!(archive = %path.display(), entries = names.len(), "cataloging archive");

    Ok(names
        .iter()
        .map(|name| catalog_entry(&mut archive, path, name, processor))
        .collect())
}

/// Document entry names of an archive, in central-directory order.
fn document_entries(archive: &mut ZipArchive<File>) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if is_document_entry(entry.name()) {
            names.push(entry.name().to_string());
        }
    }
    Ok(names)
}

/// List archive files directly inside a folder (non-recursive, files only).
///
/// Order is the directory listing order as returned by the OS; no sorting
/// is applied.
pub fn list_archives(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        let is_archive = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(ARCHIVE_EXTENSION));
        if is_archive && path.is_file() {
            archives.push(path);
        }
    }
    Ok(archives)
}

/// Catalog every archive in a folder into one record set.
///
/// Records are concatenated in archive-listing order, then entry-listing
/// order within each archive.
pub fn catalog_folder(folder: &Path, processor: &Processor) -> Result<Vec<CatalogRecord>> {
    let mut records = Vec::new();
    for path in list_archives(folder)? {
        records.extend(catalog_archive(&path, processor)?);
    }
    Ok(records)
}

/// Catalog a folder straight into a sink, one append per archive.
///
/// Each archive's records are appended as soon as that archive completes.
/// A failure partway through the folder therefore leaves earlier archives
/// already durably appended: at-least-once, per-archive commit granularity,
/// not all-or-nothing for the folder.
pub fn catalog_folder_to_sink(
    folder: &Path,
    processor: &Processor,
    sink: &mut dyn CatalogSink,
    table: &str,
    coerce_empty: bool,
) -> Result<ScanSummary> {
    let mut summary = ScanSummary::default();
    for path in list_archives(folder)? {
        let mut records = catalog_archive(&path, processor)?;
        if coerce_empty {
            coerce_empty_to_null(&mut records);
        }
        sink.append(table, &records)?;
        tracing::info!(archive = %path.display(), records = records.len(), "archive committed to sink");
        summary.archives += 1;
        summary.records += records.len();
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CatalogSink;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const BOOK: &str = r#"<?xml version="1.0"?>
<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">
<description><title-info>
<genre>sf</genre>
<author><first-name>Kir</first-name><last-name>Bulychev</last-name></author>
<book-title>Sto let tomu vpered</book-title>
<lang>ru</lang>
</title-info></description>
<body><p>text</p></body>
</FictionBook>"#;

    fn write_archive(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (entry_name, content) in entries {
            writer
                .start_file(*entry_name, FileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_one_record_per_document_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_archive(
            dir.path(),
            "lib1.zip",
            &[
                ("one.fb2", BOOK),
                ("cover.jpg", "not a document"),
                ("two.fb2", BOOK),
                ("broken.fb2", "<FictionBook><descr"),
            ],
        );

        let records = catalog_archive(&path, &Processor::Catalog).unwrap();

        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.get("zipfile"), Some(&Some("lib1.zip".to_string())));
            assert!(record.get("xml_filename").is_some());
        }
        assert!(!records[0].is_error());
        assert!(!records[1].is_error());
        assert!(records[2].is_error());
        // Error records carry no success fields.
        assert!(records[2].get("author").is_none());
    }

    #[test]
    fn test_error_record_for_missing_description() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_archive(
            dir.path(),
            "lib1.zip",
            &[("nodesc.fb2", "<FictionBook><body/></FictionBook>")],
        );

        let records = catalog_archive(&path, &Processor::Catalog).unwrap();

        assert_eq!(records.len(), 1);
        let error = records[0].get("error").unwrap().as_deref().unwrap();
        assert!(error.contains("description"));
    }

    #[test]
    fn test_folder_concatenates_in_listing_order() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path(), "a.zip", &[("one.fb2", BOOK)]);
        write_archive(dir.path(), "b.zip", &[("two.fb2", BOOK)]);
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();
        fs::create_dir(dir.path().join("sub.zip")).unwrap(); // directory, not a file

        let records = catalog_folder(dir.path(), &Processor::Catalog).unwrap();

        assert_eq!(records.len(), 2);
        let listed = list_archives(dir.path()).unwrap();
        let order: Vec<String> = records
            .iter()
            .map(|r| r.get("zipfile").unwrap().clone().unwrap())
            .collect();
        let expected: Vec<String> = listed
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(order, expected);
    }

    struct MemorySink {
        appends: Vec<(String, Vec<CatalogRecord>)>,
    }

    impl CatalogSink for MemorySink {
        fn append(&mut self, table: &str, records: &[CatalogRecord]) -> Result<()> {
            self.appends.push((table.to_string(), records.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn test_sink_mode_commits_once_per_archive() {
        let dir = tempfile::tempdir().unwrap();
        write_archive(dir.path(), "a.zip", &[("one.fb2", BOOK), ("two.fb2", BOOK)]);
        write_archive(dir.path(), "b.zip", &[("three.fb2", BOOK)]);

        let mut sink = MemorySink { appends: Vec::new() };
        let summary = catalog_folder_to_sink(
            dir.path(),
            &Processor::Catalog,
            &mut sink,
            "lib_current",
            false,
        )
        .unwrap();

        assert_eq!(summary.archives, 2);
        assert_eq!(summary.records, 3);
        assert_eq!(sink.appends.len(), 2);
        assert_eq!(sink.appends[0].0, "lib_current");
        let batch_sizes: Vec<usize> = sink.appends.iter().map(|(_, r)| r.len()).collect();
        assert_eq!(batch_sizes.iter().sum::<usize>(), 3);
    }
}
