use anyhow::Context;
use clap::Parser;
use imgforge::{load_operations, BatchProcessor, Cli, HistoryLog};
use log::LevelFilter;
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logger(&cli);

    let operations = match load_operations(&cli.operations) {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("Error loading operations file: {e}");
            std::process::exit(1);
        }
    };

    let history = HistoryLog::load(&cli.history_file);
    let mut processor = BatchProcessor::new(&cli.output, history);
    let results = processor
        .run(&cli.input, &operations)
        .with_context(|| format!("batch processing failed for {}", cli.input.display()))?;

    let successful = results.iter().filter(|r| r.succeeded()).count();
    println!();
    println!("Processing complete:");
    println!("Successfully processed: {}/{} images", successful, results.len());

    Ok(())
}

/// Timestamped log lines go to the console and the log file at the
/// same time.
fn init_logger(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp_secs();

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
    {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(Tee { file })));
        }
        Err(e) => {
            eprintln!(
                "Warning: could not open log file {}: {e}; logging to console only",
                cli.log_file.display()
            );
        }
    }
    builder.init();
}

/// Duplicates everything written to it onto stderr.
struct Tee {
    file: std::fs::File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        std::io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()?;
        self.file.flush()
    }
}
