//! Delete catalog-retired entries from library archives.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;

use zip::{ZipArchive, ZipWriter};

use crate::archiver::{self, list_arg, run_archiver};
use crate::error::{MaintenanceError, Result};
use crate::plan::EntryPlan;
use crate::types::{MaintenanceReport, Strategy};

/// Remove the planned entries from each archive in `folder`.
///
/// Every other entry keeps its original compressed bytes, metadata and
/// relative order. Per-archive failures (archive missing, archiver exit
/// non-zero) are reported and that archive is skipped; a missing archiver
/// binary stops the run immediately, leaving the remaining archives
/// untouched.
///
/// Running twice with the same plan is a no-op the second time: an archive
/// with nothing left to remove is reported as skipped, never rewritten.
///
/// # Arguments
/// * `folder` - Folder containing the archives to rewrite
/// * `plan` - Per-archive entry names to delete
/// * `strategy` - In-process atomic rewrite or external-tool in-place delete
/// * `archiver` - External archiver program (external-tool strategy only)
pub fn delete_entries(
    folder: &Path,
    plan: &EntryPlan,
    strategy: Strategy,
    archiver: &str,
) -> Result<MaintenanceReport> {
    let mut report = MaintenanceReport::new();

    for (name, entries) in plan.iter() {
        if entries.is_empty() {
            continue;
        }
        let path = folder.join(name);
        if !path.is_file() {
            tracing::warn!(archive = name, "archive not found, skipping");
            report.record_skipped(name, "archive not found");
            continue;
        }

        let outcome = match strategy {
            Strategy::InProcess => rewrite_without(&path, entries),
            Strategy::ExternalTool => external_delete(archiver, &path, entries, name),
        };
        match outcome {
            Ok(true) => {
                tracing::info!(archive = name, entries = entries.len(), "entries removed");
                report.record_updated(name);
            }
            Ok(false) => report.record_skipped(name, "no matching entries"),
            Err(e @ MaintenanceError::ArchiverNotFound(_)) => return Err(e),
            Err(e) => {
                tracing::warn!(archive = name, error = %e, "archive skipped");
                report.record_skipped(name, e.to_string());
            }
        }
    }

    Ok(report)
}

/// In-process rewrite: stream every retained entry into a staging file and
/// atomically rename it over the original, so a concurrent reader never
/// observes a half-written archive.
///
/// Returns `Ok(false)` without touching the archive when none of the
/// planned entries is present.
fn rewrite_without(path: &Path, entries: &BTreeSet<String>) -> Result<bool> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut matched = false;
    for index in 0..archive.len() {
        if entries.contains(archive.by_index(index)?.name()) {
            matched = true;
            break;
        }
    }
    if !matched {
        return Ok(false);
    }

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    // Staging in the same directory keeps the final rename atomic.
    let staging = tempfile::Builder::new()
        .prefix(".homelib-rewrite-")
        .suffix(".zip")
        .tempfile_in(parent)?;
    {
        let mut writer = ZipWriter::new(staging.as_file());
        for index in 0..archive.len() {
            let entry = archive.by_index(index)?;
            if entries.contains(entry.name()) {
                continue;
            }
            writer.raw_copy_file(entry)?;
        }
        writer.finish()?;
    }
    staging.persist(path).map_err(|e| MaintenanceError::Io(e.error))?;

    Ok(true)
}

/// External-tool deletion: the archiver mutates the archive in place from a
/// temporary deletion list. No atomicity guarantee — a crash mid-invocation
/// can leave the archive inconsistent.
fn external_delete(
    tool: &str,
    path: &Path,
    entries: &BTreeSet<String>,
    archive_name: &str,
) -> Result<bool> {
    let list = archiver::write_list_file(entries.iter().map(String::as_str))?;
    let list_ref = list_arg(&list);
    let args: [&OsStr; 4] = [
        OsStr::new("d"),
        path.as_os_str(),
        list_ref.as_os_str(),
        OsStr::new("-y"),
    ];
    run_archiver(tool, &args, None, archive_name)?;
    Ok(true)
}
