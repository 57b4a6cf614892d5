//! External archiver invocation.
//!
//! Wraps the command-line archiver the way the catalog workflows have
//! always used it: deletion lists and extraction lists are passed via
//! temporary `@list` files to stay clear of command-length limits, and the
//! tool's exit code decides between a per-archive failure and success. A
//! missing binary is a distinct, run-fatal condition: no later archive can
//! succeed without it.

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::Path;
use std::process::Command;

use tempfile::NamedTempFile;

use crate::error::{MaintenanceError, Result};

/// Default external archiver program.
pub const DEFAULT_ARCHIVER: &str = "7z";

/// Execute the archiver and return its stdout.
///
/// # Arguments
/// * `tool` - Archiver program name or path
/// * `args` - Arguments to pass
/// * `cwd` - Optional working directory for the invocation
/// * `archive` - Archive name used in failure reports
///
/// # Returns
/// * `Err(MaintenanceError::ArchiverNotFound)` when the binary is absent
/// * `Err(MaintenanceError::ArchiverFailed)` on a non-zero exit, with the
///   captured error output
pub fn run_archiver(
    tool: &str,
    args: &[&OsStr],
    cwd: Option<&Path>,
    archive: &str,
) -> Result<String> {
    tracing::debug!(tool, args = ?args, cwd = ?cwd, "running archiver");

    let mut command = Command::new(tool);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MaintenanceError::ArchiverNotFound(tool.to_string())
        } else {
            MaintenanceError::Io(e)
        }
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(MaintenanceError::ArchiverFailed {
            archive: archive.to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    if !stderr.is_empty() {
        tracing::debug!(stderr = %stderr, "archiver stderr (non-fatal)");
    }

    Ok(stdout)
}

/// Write entry names to a temporary list file, one per line.
///
/// The file is removed when the returned guard drops, on every exit path.
pub fn write_list_file<'a>(entries: impl IntoIterator<Item = &'a str>) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for entry in entries {
        writeln!(file, "{entry}")?;
    }
    file.flush()?;
    Ok(file)
}

/// Build the `@list` argument referencing a list file.
#[must_use]
pub fn list_arg(file: &NamedTempFile) -> OsString {
    let mut arg = OsString::from("@");
    arg.push(file.path());
    arg
}

/// Build the `-oDIR` output-directory argument for extraction.
#[must_use]
pub fn output_dir_arg(dir: &Path) -> OsString {
    let mut arg = OsString::from("-o");
    arg.push(dir);
    arg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_distinct_error() {
        let err = run_archiver("homelib-no-such-archiver", &[], None, "lib1.zip").unwrap_err();
        assert!(matches!(err, MaintenanceError::ArchiverNotFound(_)));
    }

    #[test]
    fn test_list_file_one_entry_per_line() {
        let file = write_list_file(["one.fb2", "two.fb2"]).unwrap();
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "one.fb2\ntwo.fb2\n");
    }

    #[test]
    fn test_list_arg_prefixes_at_sign() {
        let file = write_list_file(["one.fb2"]).unwrap();
        let arg = list_arg(&file);
        assert!(arg.to_string_lossy().starts_with('@'));
    }
}
