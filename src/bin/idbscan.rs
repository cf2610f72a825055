//! idbscan Binary
//!
//! Scans a LevelDB IndexedDB store and prints the records it recovers.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use idbscan::{KindFilter, OutputMode, ScanConfig, Scanner, TimestampFormula};
use tracing_subscriber::{fmt, EnvFilter};

/// idbscan
#[derive(Parser, Debug)]
#[command(name = "idbscan")]
#[command(about = "Recover contacts and messages from an IndexedDB LevelDB store")]
#[command(version)]
struct Args {
    /// Store directory, e.g. ~/.config/skypeforlinux/IndexedDB/file__0.indexeddb.leveldb
    leveldb_path: PathBuf,

    /// Output mode: debug, messages, csv or json
    #[arg(short, long, default_value = "debug")]
    mode: OutputMode,

    /// Record kinds to decode: all, contact or message
    #[arg(short, long, default_value = "all")]
    kind: KindFilter,

    /// Print a header line in csv mode
    #[arg(long)]
    csv_header: bool,

    /// Verify table block checksums
    #[arg(long)]
    verify_checksums: bool,

    /// Maximum value nesting depth
    #[arg(long, default_value = "64")]
    max_depth: u32,

    /// Integer timestamp unit: dotnet-ticks or unix-millis
    #[arg(long, default_value = "dotnet-ticks")]
    timestamps: TimestampFormula,
}

fn main() {
    // Logs go to stderr; stdout carries only records
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("idbscan v{}", idbscan::VERSION);
    tracing::debug!("Store directory: {}", args.leveldb_path.display());

    // Build config from args
    let config = ScanConfig::builder()
        .mode(args.mode)
        .kind_filter(args.kind)
        .csv_header(args.csv_header)
        .verify_checksums(args.verify_checksums)
        .max_depth(args.max_depth)
        .timestamps(args.timestamps)
        .build();

    let scanner = match Scanner::new(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = scanner.scan_path(&args.leveldb_path, &mut out);
    // Records written before a failure still reach stdout
    drop(out);

    match result {
        Ok(stats) => {
            tracing::debug!(?stats, "done");
        }
        Err(e) => {
            tracing::error!("Scan failed: {}", e);
            eprintln!("idbscan: {e}");
            std::process::exit(1);
        }
    }
}
