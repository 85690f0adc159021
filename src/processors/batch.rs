// imgforge/src/processors/batch.rs
use crate::core::processor::ImageProcessor;
use crate::core::{ForgeError, Operation, Result};
use crate::history::HistoryLog;
use crate::utils::is_eligible_image;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome for one eligible file in a batch: its file name, and the
/// output path when processing succeeded.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file_name: String,
    pub output: Option<PathBuf>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.output.is_some()
    }
}

/// Runs one operation sequence over every eligible file in a
/// directory, strictly one file at a time. A failing file is marked
/// failed and the batch moves on; the result list always covers every
/// eligible file.
pub struct BatchProcessor {
    output_dir: PathBuf,
    processor: ImageProcessor,
}

impl BatchProcessor {
    pub fn new(output_dir: impl Into<PathBuf>, history: HistoryLog) -> Self {
        let output_dir = output_dir.into();
        Self {
            processor: ImageProcessor::new(output_dir.clone(), history),
            output_dir,
        }
    }

    pub fn run(&mut self, input_dir: &Path, ops: &[Operation]) -> Result<Vec<FileOutcome>> {
        self.validate_paths(input_dir)?;

        let image_paths = collect_image_paths(input_dir);
        if image_paths.is_empty() {
            log::warn!("No image files found in {}", input_dir.display());
            return Ok(Vec::new());
        }

        log::info!(
            "Processing {} images from {}",
            image_paths.len(),
            input_dir.display()
        );

        let pb = create_progress_bar(image_paths.len());
        let mut outcomes = Vec::with_capacity(image_paths.len());

        for input_path in &image_paths {
            let file_name = input_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            pb.set_message(file_name.clone());

            let output = match self.processor.process(input_path, ops) {
                Ok(output_path) => Some(output_path),
                Err(e) => {
                    log::error!("Failed to process {}: {}", input_path.display(), e);
                    None
                }
            };
            outcomes.push(FileOutcome { file_name, output });
            pb.inc(1);
        }

        let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
        pb.finish_with_message(format!("Processed {}/{} images", succeeded, outcomes.len()));

        Ok(outcomes)
    }

    fn validate_paths(&self, input_dir: &Path) -> Result<()> {
        if input_dir == self.output_dir {
            return Err(ForgeError::InvalidParameter(
                "Input and output directories cannot be the same".to_string(),
            ));
        }

        // Both directories are created if absent; a batch over a fresh
        // input directory simply reports zero files.
        std::fs::create_dir_all(input_dir)?;
        std::fs::create_dir_all(&self.output_dir)?;

        if !input_dir.is_dir() {
            return Err(ForgeError::InvalidParameter(format!(
                "Input path is not a directory: {}",
                input_dir.display()
            )));
        }

        Ok(())
    }
}

/// Non-recursive scan of the input directory, filtered to the
/// supported extensions and sorted by file name so progress and
/// results come back in a stable order.
fn collect_image_paths(input_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_eligible_image(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}
