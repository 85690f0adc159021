// imgforge/src/utils/mod.rs
use std::path::{Path, PathBuf};

/// Extensions the batch scan accepts, matched case-insensitively.
pub const ELIGIBLE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

pub fn is_eligible_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ELIGIBLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Output path for a processed file: same file name under the output
/// directory with a `processed_` prefix, so the source is never
/// overwritten.
pub fn derived_output_path(output_dir: &Path, input_path: &Path) -> PathBuf {
    let file_name = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");
    output_dir.join(format!("processed_{file_name}"))
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = (bytes_f64.log10() / base.log10()).floor() as i32;
    let size = bytes_f64 / base.powi(exponent);

    format!("{:.2} {}", size, UNITS[exponent as usize])
}
