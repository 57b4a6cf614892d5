//! Command-line interface for the cataloger.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::catalog::{catalog_archive, list_archives};
use crate::config::DEFAULT_TABLE;
use crate::error::Result;
use crate::processors::Processor;
use crate::record::coerce_empty_to_null;
use crate::sink::{CatalogSink, JsonlSink};

/// homelib cataloger - Extract FB2 bibliographic metadata from zip archives.
#[derive(Parser)]
#[command(name = "homelib-cataloger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a folder of zip archives and extract catalog records.
    Scan {
        /// Folder containing .zip archives (non-recursive)
        folder: PathBuf,

        /// Processor spec: catalog, authors, tag_outline, flatten_to_string,
        /// namespace_probe, tag_text=PATH or tag_text_joined=PATH
        #[arg(short, long, default_value = "catalog")]
        processor: String,

        /// Append records to this JSON-lines file, one archive at a time;
        /// without it, records are printed to stdout after the scan
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Catalog table name recorded with sink appends
        #[arg(long, default_value = DEFAULT_TABLE)]
        table: String,

        /// Coerce empty-string field values to null before output
        #[arg(long)]
        coerce_empty: bool,
    },

    /// Survey root tags and namespace declarations across a folder.
    Probe {
        /// Folder containing .zip archives (non-recursive)
        folder: PathBuf,

        /// Append records to this JSON-lines file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Catalog table name recorded with sink appends
        #[arg(long, default_value = DEFAULT_TABLE)]
        table: String,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            folder,
            processor,
            output,
            table,
            coerce_empty,
        } => {
            let processor = Processor::parse(&processor)?;
            scan_command(&folder, &processor, output.as_deref(), &table, coerce_empty)
        }
        Commands::Probe {
            folder,
            output,
            table,
        } => scan_command(
            &folder,
            &Processor::NamespaceProbe,
            output.as_deref(),
            &table,
            false,
        ),
    }
}

/// Execute a folder scan with the chosen processor.
fn scan_command(
    folder: &Path,
    processor: &Processor,
    output: Option<&Path>,
    table: &str,
    coerce_empty: bool,
) -> Result<()> {
    let archives = list_archives(folder)?;
    if archives.is_empty() {
        println!(
            "{} {}",
            style("No archives found in").yellow(),
            folder.display()
        );
        return Ok(());
    }

    println!(
        "{} {} archives in {}",
        style("Scanning").bold(),
        archives.len(),
        style(folder.display()).cyan()
    );

    let pb = ProgressBar::new(archives.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let mut sink = output.map(JsonlSink::new);
    let mut collected = Vec::new();
    let mut total = 0usize;

    for path in &archives {
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }

        let mut records = catalog_archive(path, processor)?;
        total += records.len();

        match sink.as_mut() {
            // Per-archive durable append: earlier archives stay committed
            // even if a later one fails.
            Some(sink) => {
                if coerce_empty {
                    coerce_empty_to_null(&mut records);
                }
                sink.append(table, &records)?;
            }
            None => collected.extend(records),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if sink.is_none() {
        // Single pass over the accumulated set, not per entry.
        if coerce_empty {
            coerce_empty_to_null(&mut collected);
        }
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for record in &collected {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
    }

    println!(
        "{} {} records from {} archives",
        style("Cataloged").green().bold(),
        total,
        archives.len()
    );
    if let Some(path) = output {
        println!(
            "{} {}",
            style("Appended to:").green().bold(),
            path.display()
        );
    }

    Ok(())
}
