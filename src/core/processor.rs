// imgforge/src/core/processor.rs
use crate::core::{ForgeError, Operation, Result};
use crate::history::{HistoryEntry, HistoryLog};
use crate::processors::pipeline;
use crate::utils::{derived_output_path, format_file_size};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::{Path, PathBuf};

/// Processes one input file end to end: decode, run the operation
/// pipeline, write the result under the output directory, and record a
/// history entry. Every failure comes back as a typed error; nothing
/// here aborts a batch.
pub struct ImageProcessor {
    output_dir: PathBuf,
    history: HistoryLog,
}

impl ImageProcessor {
    pub fn new(output_dir: impl Into<PathBuf>, history: HistoryLog) -> Self {
        Self {
            output_dir: output_dir.into(),
            history,
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn process(&mut self, input_path: &Path, ops: &[Operation]) -> Result<PathBuf> {
        let image = self.load(input_path)?;
        let result = pipeline::apply(image, ops)?;

        let output_path = derived_output_path(&self.output_dir, input_path);
        self.save(result, &output_path)?;

        self.history
            .record(HistoryEntry::new(input_path, &output_path, ops));
        log::info!(
            "Processed {} -> {}",
            input_path.display(),
            output_path.display()
        );
        Ok(output_path)
    }

    fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|source| ForgeError::Decode {
                path: path.to_path_buf(),
                source,
            })
    }

    fn save(&self, image: DynamicImage, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path).map_err(|source| ForgeError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        let image = flatten_alpha_for(format, image);
        image.save(path).map_err(|source| ForgeError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        let size = std::fs::metadata(path)?.len();
        log::debug!("Saved image: {} ({})", path.display(), format_file_size(size));
        Ok(())
    }
}

/// JPEG cannot carry an alpha channel; pipelines that end in an alpha
/// image (watermark, expanded rotation) are flattened before a JPEG
/// save instead of failing the file.
fn flatten_alpha_for(format: ImageFormat, image: DynamicImage) -> DynamicImage {
    if format != ImageFormat::Jpeg || !image.color().has_alpha() {
        return image;
    }
    match image {
        DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => {
            DynamicImage::ImageLuma8(image.to_luma8())
        }
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}
