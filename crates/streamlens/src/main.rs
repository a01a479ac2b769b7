use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use streamlens_catalog::{Catalog, TableName};
use streamlens_core::pipeline;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod preview;

use config::AppConfig;

/// Batch job that cleans the streaming-popularity table and publishes the
/// annotated analysis table.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run the cleaning and aggregation pipeline end to end.
    Run,
    /// Import a CSV snapshot into the catalog as the source table.
    Seed {
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("STREAMLENS_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("streamlens.toml"));
    let config = AppConfig::load(&config_path)?;

    let catalog = Catalog::new(&config.catalog.root);
    let source: TableName = config.catalog.source_table.parse()?;

    match cli.command {
        Command::Run => run_pipeline(&catalog, &source, &config),
        Command::Seed { file } => {
            let df = catalog
                .import_csv(&source, &file)
                .with_context(|| format!("failed to import {}", file.display()))?;
            println!("Imported {} rows into {}", df.height(), source);
            Ok(())
        }
    }
}

fn run_pipeline(catalog: &Catalog, source: &TableName, config: &AppConfig) -> Result<()> {
    let output_name: TableName = config.catalog.output_table.parse()?;

    let df = catalog
        .read_table(source)
        .with_context(|| format!("failed to load source table {source}"))?;
    info!(table = %source, rows = df.height(), "loaded source table");

    let output = pipeline::run(df, &config.pipeline)?;

    println!("Descriptive statistics for streams:");
    println!("{}", preview::render(&output.aggregates.stream_summary)?);

    if let Some(view) = &output.aggregates.top_artists {
        println!("Top {} artists by total streams:", config.pipeline.top_artists_limit);
        println!("{}", preview::render(view)?);
    }
    if let Some(view) = &output.aggregates.track_streams {
        println!("Streams per track (first rows):");
        println!("{}", preview::render(view)?);
    }
    if let Some(view) = &output.aggregates.streams_by_year {
        println!("Total streams by release year:");
        println!("{}", preview::render(view)?);
    }
    if let Some(view) = &output.aggregates.tracks_by_year {
        println!("Tracks released per year:");
        println!("{}", preview::render(view)?);
    }
    if let Some(view) = &output.aggregates.tracks_by_month {
        println!("Tracks released per month (calendar order):");
        println!("{}", preview::render(view)?);
    }
    if let Some(view) = &output.aggregates.tracks_by_day {
        println!("Tracks released per day of month:");
        println!("{}", preview::render(view)?);
    }
    if let Some(view) = &output.aggregates.audio_profiles {
        println!("Audio profiles of the most streamed artists:");
        println!("{}", preview::render(view)?);
    }

    println!(
        "High-stream segmentation (threshold {} streams):",
        config.pipeline.high_streams_threshold
    );
    println!("{}", preview::render(&output.high_streams_counts)?);

    catalog
        .write_table(&output_name, &output.table)
        .with_context(|| format!("failed to write output table {output_name}"))?;
    info!(table = %output_name, rows = output.table.height(), "analysis table written");

    println!("\n✅ Analysis finished; {} written.", output_name);
    Ok(())
}
