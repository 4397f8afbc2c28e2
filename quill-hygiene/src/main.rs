//! quill-hygiene binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quill_hygiene::{Classifier, load_export, partition, write_export};

/// Remove invalid or suspicious subscriber emails from an export.
#[derive(Parser, Debug)]
#[command(name = "quill-hygiene")]
struct Args {
    /// JSON array export of the subscriber collection
    input: PathBuf,

    /// Where to write the kept records (stdout when omitted)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Report removals without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let classifier = Classifier::new()?;
    let subscribers = load_export(&args.input)?;
    let total = subscribers.len();
    let report = partition(&classifier, subscribers);

    tracing::info!(
        total,
        removed = report.removed.len(),
        kept = report.kept.len(),
        "cleanup finished"
    );

    if args.dry_run {
        return Ok(());
    }

    match &args.output {
        Some(path) => write_export(path, &report.kept)?,
        None => {
            let text = serde_json::to_string_pretty(&report.kept)
                .context("failed to serialize kept subscribers")?;
            println!("{text}");
        }
    }
    Ok(())
}
