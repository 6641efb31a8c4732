mod amount;
mod config;
mod error;
mod extract;
mod normalize;
mod pipeline;
mod progress;
mod query;
mod rates;
mod records;
mod sink;
mod source;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::EtlConfig;
use crate::progress::ProgressLog;
use crate::records::TableView;
use crate::source::source_for;

/// Extracts the largest banks table, converts market caps to GBP, INR and EUR,
/// and loads the result into a CSV file and a SQLite table.
#[derive(Parser, Debug)]
#[clap(name = "largest_banks")]
struct Args {
    /// TOML file overriding the default paths, source and queries.
    #[clap(long)]
    config: Option<PathBuf>,

    /// URL or saved HTML file to extract the table from.
    #[clap(long)]
    source: Option<String>,

    /// Exchange rate CSV with Currency and Rate columns.
    #[clap(long)]
    rates: Option<PathBuf>,

    /// Load the table without running the inspection queries.
    #[clap(long)]
    skip_queries: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EtlConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EtlConfig::default(),
    };
    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(rates) = args.rates {
        config.rates_path = rates;
    }
    if args.skip_queries {
        config.run_queries = false;
    }

    let source = source_for(&config.source);
    let log = ProgressLog::new(&config.log_path);
    tracing::debug!(source = %source.location(), log = %log.path().display(), "starting run");
    let summary = pipeline::run(&config, &*source, &log).context("ETL run failed")?;

    println!("{}", TableView(&summary.records));
    for result in &summary.query_results {
        println!("{}", result);
    }
    Ok(())
}
