//! Repack catalog-selected entry subsets into new archives.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::Path;

use zip::{ZipArchive, ZipWriter};

use crate::archiver::{self, list_arg, output_dir_arg, run_archiver};
use crate::error::{MaintenanceError, Result};
use crate::plan::EntryPlan;
use crate::types::{MaintenanceReport, Strategy};

/// Produce, per planned archive, a new archive in `dest_folder` containing
/// only the intersection of the keep set and the entries actually present
/// in the source archive.
///
/// An empty intersection is reported and produces no destination file.
/// Per-archive failures skip that archive; a missing archiver binary stops
/// the run.
///
/// # Arguments
/// * `source_folder` - Folder containing the source archives
/// * `dest_folder` - Destination folder for the repacked archives (created
///   if absent)
/// * `plan` - Per-archive entry names to keep
/// * `strategy` - In-process selective copy or external extract-and-repack
/// * `archiver` - External archiver program (external-tool strategy only)
pub fn repack_subset(
    source_folder: &Path,
    dest_folder: &Path,
    plan: &EntryPlan,
    strategy: Strategy,
    archiver: &str,
) -> Result<MaintenanceReport> {
    fs::create_dir_all(dest_folder)?;
    let dest_folder = fs::canonicalize(dest_folder)?;
    let mut report = MaintenanceReport::new();

    for (name, keep) in plan.iter() {
        if keep.is_empty() {
            continue;
        }
        let source = source_folder.join(name);
        if !source.is_file() {
            tracing::warn!(archive = name, "archive not found, skipping");
            report.record_skipped(name, "archive not found");
            continue;
        }

        let outcome = repack_one(&source, &dest_folder.join(name), keep, strategy, archiver, name);
        match outcome {
            Ok(true) => {
                tracing::info!(archive = name, "subset repacked");
                report.record_updated(name);
            }
            Ok(false) => {
                tracing::info!(archive = name, "no requested entries present");
                report.record_skipped(name, "no matching entries");
            }
            Err(e @ MaintenanceError::ArchiverNotFound(_)) => return Err(e),
            Err(e) => {
                tracing::warn!(archive = name, error = %e, "archive skipped");
                report.record_skipped(name, e.to_string());
            }
        }
    }

    Ok(report)
}

fn repack_one(
    source: &Path,
    dest: &Path,
    keep: &BTreeSet<String>,
    strategy: Strategy,
    archiver: &str,
    archive_name: &str,
) -> Result<bool> {
    let selected = selected_entries(source, keep)?;
    if selected.is_empty() {
        return Ok(false);
    }

    match strategy {
        Strategy::InProcess => copy_subset(source, dest, keep),
        Strategy::ExternalTool => external_repack(archiver, source, dest, &selected, archive_name),
    }?;
    Ok(true)
}

/// Entry names present in the source archive and requested by the keep set,
/// in archive order.
fn selected_entries(source: &Path, keep: &BTreeSet<String>) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(File::open(source)?)?;
    let mut selected = Vec::new();
    for index in 0..archive.len() {
        let name = archive.by_index(index)?.name().to_string();
        if keep.contains(&name) {
            selected.push(name);
        }
    }
    Ok(selected)
}

/// In-process selective copy: only requested-and-present entries are read,
/// keeping their original compressed bytes.
fn copy_subset(source: &Path, dest: &Path, keep: &BTreeSet<String>) -> Result<()> {
    let mut archive = ZipArchive::new(File::open(source)?)?;
    let mut writer = ZipWriter::new(File::create(dest)?);
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if !keep.contains(entry.name()) {
            continue;
        }
        writer.raw_copy_file(entry)?;
    }
    writer.finish()?;
    Ok(())
}

/// External extract-and-repack: the kept entries are extracted into a
/// scoped temp directory, then re-added into the destination archive at the
/// strongest compression setting. The temp directory and list file are
/// removed on every exit path, including failure.
fn external_repack(
    tool: &str,
    source: &Path,
    dest: &Path,
    selected: &[String],
    archive_name: &str,
) -> Result<()> {
    let temp = tempfile::tempdir()?;
    let list = archiver::write_list_file(selected.iter().map(String::as_str))?;
    let list_ref = list_arg(&list);
    let out_dir = output_dir_arg(temp.path());
    let source_abs = fs::canonicalize(source)?;

    let extract_args: [&OsStr; 5] = [
        OsStr::new("x"),
        source_abs.as_os_str(),
        list_ref.as_os_str(),
        out_dir.as_os_str(),
        OsStr::new("-y"),
    ];
    run_archiver(tool, &extract_args, None, archive_name)?;

    // Add-all runs with the temp directory as working directory so entry
    // names stay relative.
    let add_args: [&OsStr; 5] = [
        OsStr::new("a"),
        OsStr::new("-tzip"),
        OsStr::new("-mx=9"),
        dest.as_os_str(),
        OsStr::new("*"),
    ];
    run_archiver(tool, &add_args, Some(temp.path()), archive_name)?;

    Ok(())
}
