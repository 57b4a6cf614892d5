//! Command-line interface for archive maintenance.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;

use crate::archiver::DEFAULT_ARCHIVER;
use crate::delete::delete_entries;
use crate::error::Result;
use crate::plan::EntryPlan;
use crate::repack::repack_subset;
use crate::types::{MaintenanceReport, Strategy};

/// homelib maintenance - Rewrite and repack library zip archives.
#[derive(Parser)]
#[command(name = "homelib-maintenance")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the per-archive entry sets come from.
#[derive(Args)]
pub struct PlanSource {
    /// Tab-separated zipfile/entry list derived from the catalog
    #[arg(short, long, conflicts_with = "catalog", required_unless_present = "catalog")]
    pub list: Option<PathBuf>,

    /// JSON-lines catalog export to derive the entry list from
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Select only entries whose catalog record carries an error field
    #[arg(long, requires = "catalog")]
    pub errors_only: bool,
}

impl PlanSource {
    /// Load the entry plan from whichever source was given.
    pub fn load(&self) -> Result<EntryPlan> {
        match (&self.list, &self.catalog) {
            (Some(list), _) => EntryPlan::from_list_file(list),
            (None, Some(catalog)) => EntryPlan::from_catalog_file(catalog, self.errors_only),
            // clap enforces that one of the two is present.
            (None, None) => Ok(EntryPlan::new()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remove catalog-retired entries from archives in a folder.
    Delete {
        /// Folder containing the archives to rewrite
        folder: PathBuf,

        #[command(flatten)]
        plan: PlanSource,

        /// Rewriting strategy
        #[arg(long, value_enum, default_value_t = Strategy::InProcess)]
        strategy: Strategy,

        /// External archiver program (external-tool strategy)
        #[arg(long, default_value = DEFAULT_ARCHIVER)]
        archiver: String,
    },

    /// Repack catalog-selected subsets into new archives in a destination folder.
    Repack {
        /// Folder containing the source archives
        source: PathBuf,

        /// Destination folder for the repacked archives
        dest: PathBuf,

        #[command(flatten)]
        plan: PlanSource,

        /// Rewriting strategy
        #[arg(long, value_enum, default_value_t = Strategy::InProcess)]
        strategy: Strategy,

        /// External archiver program (external-tool strategy)
        #[arg(long, default_value = DEFAULT_ARCHIVER)]
        archiver: String,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Delete {
            folder,
            plan,
            strategy,
            archiver,
        } => {
            let plan = plan.load()?;
            announce("Deleting entries in", &folder, plan.len());
            let report = delete_entries(&folder, &plan, strategy, &archiver)?;
            print_report(&report);
            Ok(())
        }
        Commands::Repack {
            source,
            dest,
            plan,
            strategy,
            archiver,
        } => {
            let plan = plan.load()?;
            announce("Repacking subsets from", &source, plan.len());
            let report = repack_subset(&source, &dest, &plan, strategy, &archiver)?;
            print_report(&report);
            Ok(())
        }
    }
}

fn announce(action: &str, folder: &Path, archives: usize) {
    println!(
        "{} {} ({} archives planned)",
        style(action).bold(),
        style(folder.display()).cyan(),
        archives
    );
}

fn print_report(report: &MaintenanceReport) {
    for skipped in &report.skipped {
        println!(
            "  {} {}: {}",
            style("skipped").yellow(),
            skipped.archive,
            skipped.reason
        );
    }
    println!(
        "{} {} archives updated, {} skipped",
        style("Done:").green().bold(),
        report.updated.len(),
        report.skipped.len()
    );
}
