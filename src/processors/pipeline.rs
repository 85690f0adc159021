// imgforge/src/processors/pipeline.rs
use crate::core::{ForgeError, Operation, Result};
use crate::processors::{effects, watermark};
use image::{imageops, imageops::FilterType, DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Applies each operation in sequence order; every step consumes the
/// previous step's output and produces an independent image. The first
/// failing step fails the whole pipeline.
pub fn apply(image: DynamicImage, ops: &[Operation]) -> Result<DynamicImage> {
    let mut current = image;
    for op in ops {
        log::debug!("Applying operation: {}", op.name());
        current = apply_one(&current, op)?;
    }
    Ok(current)
}

fn apply_one(image: &DynamicImage, op: &Operation) -> Result<DynamicImage> {
    match op {
        Operation::Resize { width, height } => resize(image, *width, *height),
        Operation::Rotate { angle, expand } => Ok(rotate(image, *angle, *expand)),
        Operation::Convert { mode } => convert(image, mode),
        Operation::Filter { kind } => Ok(effects::filter(image, *kind)),
        Operation::Enhance { kind, factor } => effects::enhance(image, *kind, *factor),
        Operation::Watermark {
            text,
            position,
            opacity,
        } => watermark::watermark(image, text, *position, *opacity),
    }
}

/// Resizes to exactly `width` x `height`. Zero dimensions are an
/// error, never clamped.
fn resize(image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(ForgeError::InvalidParameter(format!(
            "resize dimensions must be positive, got {width}x{height}"
        )));
    }
    Ok(image.resize_exact(width, height, FilterType::Lanczos3))
}

/// Rotates counter-clockwise by `angle` degrees. Right-angle multiples
/// go through the lossless `rotate90`/`180`/`270`; anything else is
/// resampled on an RGBA canvas, with transparent fill where the source
/// does not cover. With `expand` the output is the rotated bounding
/// box; without it the original canvas size is kept and whatever falls
/// outside it clips.
fn rotate(image: &DynamicImage, angle: f32, expand: bool) -> DynamicImage {
    let norm = angle.rem_euclid(360.0);
    if norm == 0.0 {
        return image.clone();
    }
    let (w, h) = image.dimensions();

    // image's rotate90/180/270 are clockwise.
    let right_angle = if norm == 90.0 {
        Some(image.rotate270())
    } else if norm == 180.0 {
        Some(image.rotate180())
    } else if norm == 270.0 {
        Some(image.rotate90())
    } else {
        None
    };
    if let Some(rotated) = right_angle {
        if expand || rotated.dimensions() == (w, h) {
            return rotated;
        }
        // Keep the original canvas: recenter the swapped-axis result
        // and let the long sides clip.
        return DynamicImage::ImageRgba8(recanvas(&rotated.to_rgba8(), w, h));
    }

    let src = image.to_rgba8();
    let rad = norm.to_radians();
    // imageproc rotates clockwise for positive theta.
    let theta = -rad;
    let transparent = Rgba([0u8, 0, 0, 0]);

    let rotated = if expand {
        // The bounding box can be narrower or shorter than the source
        // (a wide image at a steep angle), so rotation happens on a
        // square canvas sized to the diagonal, which covers every
        // angle; the result is then cropped to the bounding box.
        let diag = (w as f32).hypot(h as f32).ceil() as u32;
        let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
        let new_w = ((w as f32 * cos + h as f32 * sin).ceil() as u32).min(diag);
        let new_h = ((w as f32 * sin + h as f32 * cos).ceil() as u32).min(diag);
        let canvas = recanvas(&src, diag, diag);
        let full = rotate_about_center(&canvas, theta, Interpolation::Bilinear, transparent);
        imageops::crop_imm(&full, (diag - new_w) / 2, (diag - new_h) / 2, new_w, new_h).to_image()
    } else {
        rotate_about_center(&src, theta, Interpolation::Bilinear, transparent)
    };

    DynamicImage::ImageRgba8(rotated)
}

/// Centers `src` on a transparent canvas of exactly `width` x
/// `height`, padding or clipping each axis as needed.
fn recanvas(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    let dx = (width as i64 - src.width() as i64) / 2;
    let dy = (height as i64 - src.height() as i64) / 2;
    imageops::overlay(&mut canvas, src, dx, dy);
    canvas
}

/// Changes the pixel representation. Modes map onto the eight-bit
/// buffer types; anything else is unsupported.
fn convert(image: &DynamicImage, mode: &str) -> Result<DynamicImage> {
    match mode {
        "L" => Ok(DynamicImage::ImageLuma8(image.to_luma8())),
        "LA" => Ok(DynamicImage::ImageLumaA8(image.to_luma_alpha8())),
        "RGB" => Ok(DynamicImage::ImageRgb8(image.to_rgb8())),
        "RGBA" => Ok(DynamicImage::ImageRgba8(image.to_rgba8())),
        other => Err(ForgeError::UnsupportedMode(other.to_string())),
    }
}
