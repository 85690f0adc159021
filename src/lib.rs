mod cli;
mod core;
mod history;
mod processors;
mod utils;

pub use cli::Cli;
pub use crate::core::{
    load_operations, processor::ImageProcessor, EnhanceKind, FilterKind, ForgeError, Operation,
    Result,
};
pub use history::{HistoryEntry, HistoryLog, HISTORY_LIMIT};
pub use processors::{pipeline, BatchProcessor, FileOutcome};
pub use utils::{
    derived_output_path, format_file_size, is_eligible_image, ELIGIBLE_EXTENSIONS,
};

pub mod prelude {
    pub use crate::{
        BatchProcessor, FileOutcome, HistoryEntry, HistoryLog, ImageProcessor, Operation,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
