//! Core types for maintenance runs.

use clap::ValueEnum;

/// Archive rewriting strategy.
///
/// The two strategies deliberately differ in their guarantees: the
/// in-process rewrite never lets a reader observe a half-written archive,
/// while the external tool mutates archives in place and a crash
/// mid-invocation can leave one inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Filtered copy into a staging file, atomically renamed over the target.
    InProcess,
    /// Delegate to the external archiver; in-place, no atomicity guarantee.
    ExternalTool,
}

/// An archive skipped by a maintenance run, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Archive file name from the plan.
    pub archive: String,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of one maintenance run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    /// Archives rewritten or repacked.
    pub updated: Vec<String>,
    /// Archives skipped, with reasons.
    pub skipped: Vec<Skipped>,
}

impl MaintenanceReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully processed archive.
    pub fn record_updated(&mut self, archive: impl Into<String>) {
        self.updated.push(archive.into());
    }

    /// Record a skipped archive with its reason.
    pub fn record_skipped(&mut self, archive: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(Skipped {
            archive: archive.into(),
            reason: reason.into(),
        });
    }

    /// Whether every planned archive was processed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_records() {
        let mut report = MaintenanceReport::new();
        assert!(report.is_clean());

        report.record_updated("a.zip");
        report.record_skipped("b.zip", "archive not found");

        assert_eq!(report.updated, vec!["a.zip".to_string()]);
        assert_eq!(report.skipped[0].reason, "archive not found");
        assert!(!report.is_clean());
    }
}
