//! # tierscore
//!
//! Command-line interface for tiered anomaly scoring of CSV time series.

use anomaly::{
    preview_table, run, write_sample, Method, RunSummary, ScoringConfig, TracingObserver,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "tierscore")]
#[command(version, about = "Tiered anomaly scoring for CSV time series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every row of a CSV table and write the augmented table
    Detect {
        /// Input CSV with a header row
        input: PathBuf,

        /// Output CSV (input columns plus score and contributors)
        output: PathBuf,

        /// Detection method (ml, adtk-style, statistical)
        #[arg(short, long)]
        method: Option<Method>,

        /// Name of the timestamp column
        #[arg(short, long)]
        timestamp_column: Option<String>,

        /// JSON configuration file; flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the built-in sample dataset
    Sample {
        /// Destination CSV
        output: PathBuf,
    },

    /// Print the first rows of a results table as JSON
    Preview {
        /// Results CSV
        results: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value = "100")]
        rows: usize,
    },
}

fn build_config(
    config: Option<PathBuf>,
    method: Option<Method>,
    timestamp_column: Option<String>,
) -> CliResult<ScoringConfig> {
    let mut scoring = match config {
        Some(path) => ScoringConfig::from_json_file(&path).map_err(|e| e.to_string())?,
        None => ScoringConfig::default(),
    };
    if let Some(method) = method {
        scoring.method = method;
    }
    if let Some(column) = timestamp_column {
        scoring.timestamp_column = column;
    }
    scoring.validate().map_err(|e| e.to_string())?;
    Ok(scoring)
}

fn print_summary(summary: &RunSummary) {
    println!("Method: {}", summary.method);
    if summary.degraded() {
        println!("Scored by: {} (degraded)", summary.tier);
        for event in &summary.degrade_log {
            println!("  {}", event);
        }
    } else {
        println!("Scored by: {}", summary.tier);
    }

    let b = &summary.buckets;
    println!("Rows: {}", b.total_rows);
    println!("  high:   {}", b.high);
    println!("  medium: {}", b.medium);
    println!("  low:    {}", b.low);
    println!("Max score: {:.1}", b.max_score);
    if let Some(path) = &summary.output {
        println!("\nResults written to {:?}", path);
    }
}

fn run_detect(
    input: PathBuf,
    output: PathBuf,
    method: Option<Method>,
    timestamp_column: Option<String>,
    config: Option<PathBuf>,
    json: bool,
) -> CliResult<()> {
    let scoring = build_config(config, method, timestamp_column)?;
    debug!(?scoring, "resolved configuration");

    let summary = run(&input, &output, &scoring, &TracingObserver).map_err(|e| e.to_string())?;

    if json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to serialize summary: {}", e))?;
        println!("{}", text);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn run_sample(output: PathBuf) -> CliResult<()> {
    write_sample(&output).map_err(|e| e.to_string())?;
    println!("Sample data written to {:?}", output);
    Ok(())
}

fn run_preview(results: PathBuf, rows: usize) -> CliResult<()> {
    let preview = preview_table(&results, rows).map_err(|e| e.to_string())?;
    let text = serde_json::to_string_pretty(&preview)
        .map_err(|e| format!("Failed to serialize preview: {}", e))?;
    println!("{}", text);
    Ok(())
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect {
            input,
            output,
            method,
            timestamp_column,
            config,
            json,
        } => run_detect(input, output, method, timestamp_column, config, json),

        Commands::Sample { output } => run_sample(output),

        Commands::Preview { results, rows } => run_preview(results, rows),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
