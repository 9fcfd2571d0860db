//! metaingest CLI: run ingestion recipes and inspect the plugin registries.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// metaingest: pluggable metadata ingestion
#[derive(Parser, Debug)]
#[command(name = "metaingest", version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run an ingestion recipe
    Ingest {
        /// Recipe file (YAML, TOML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Treat source and sink warnings as failures
        #[arg(long)]
        strict_warnings: bool,
    },
    /// Inspect plugins and input files
    Check {
        #[command(subcommand)]
        action: CheckAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum CheckAction {
    /// List registered sources, transformers and sinks
    Plugins {
        /// Show implementation types and why plugins are disabled
        #[arg(long)]
        verbose: bool,
    },
    /// Validate a file of change events
    MceFile {
        /// JSON file holding one change event or an array of them
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "metaingest", "metaingest")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "metaingest.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    commands::handle_command(cli.command)
}
