//! bytebuf - producer/consumer stress tool for giztoy byte buffers.

mod config;
mod stress;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use config::{Overrides, StressConfig};

/// Stream payloads between two threads through a byte buffer and verify them.
#[derive(Parser)]
#[command(name = "bytebuf")]
#[command(about = "Stress test chained and ring byte buffers")]
struct Cli {
    /// Config file path (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream through a growable chained buffer
    Chain(RunArgs),
    /// Stream through a fixed-capacity blocking ring buffer
    Ring(RunArgs),
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Number of payloads to stream
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Segment size (chain) or capacity (ring) in bytes
    #[arg(short, long)]
    size: Option<usize>,

    /// Ring poll timeout in milliseconds
    #[arg(long)]
    poll_ms: Option<u64>,

    /// Write src.bin and dst.bin into this directory
    #[arg(long)]
    dump: Option<PathBuf>,
}

impl From<RunArgs> for Overrides {
    fn from(args: RunArgs) -> Self {
        Overrides {
            iterations: args.iterations,
            size: args.size,
            poll_ms: args.poll_ms,
            dump: args.dump,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    }

    let base = match &cli.config {
        Some(path) => StressConfig::load(path)?,
        None => StressConfig::default(),
    };

    let report = match cli.command {
        Commands::Chain(args) => stress::run_chain(&base.apply(args.into()))?,
        Commands::Ring(args) => stress::run_ring(&base.apply(args.into()))?,
    };

    println!(
        "{}: {} payloads, {} bytes, {} mismatched, {:.2?}",
        report.kind, report.payloads, report.bytes, report.mismatches, report.elapsed
    );

    if !report.is_ok() {
        anyhow::bail!("{} payload(s) read unexpected", report.mismatches);
    }
    Ok(())
}
