// imgforge/src/cli.rs
use clap::Parser;
use std::path::PathBuf;

/// Batch image processor: applies a JSON-described sequence of
/// operations to every image in a directory.
#[derive(Parser, Debug)]
#[command(name = "imgforge", version, about)]
pub struct Cli {
    /// Input directory containing images
    #[arg(short, long, default_value = "input")]
    pub input: PathBuf,

    /// Output directory for processed images
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// JSON file containing the processing operations
    #[arg(long, value_name = "FILE")]
    pub operations: PathBuf,

    /// History file recording completed operations
    #[arg(long, default_value = "imgforge_history.json")]
    pub history_file: PathBuf,

    /// Log file; log lines also go to the console
    #[arg(long, default_value = "imgforge.log")]
    pub log_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
