// imgforge/src/processors/effects.rs
use crate::core::{EnhanceKind, FilterKind, ForgeError, Result};
use image::{imageops, ColorType, DynamicImage, Rgba, RgbaImage};

/// 3x3 presets, pre-divided by their scale factors.
const SHARPEN_KERNEL: [f32; 9] = [
    -0.125, -0.125, -0.125, //
    -0.125, 2.0, -0.125, //
    -0.125, -0.125, -0.125,
];

const EDGE_ENHANCE_KERNEL: [f32; 9] = [
    -0.5, -0.5, -0.5, //
    -0.5, 5.0, -0.5, //
    -0.5, -0.5, -0.5,
];

const EMBOSS_KERNEL: [f32; 9] = [
    -1.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0,
];

const EDGE_DETECT_KERNEL: [f32; 9] = [
    -1.0, -1.0, -1.0, //
    -1.0, 8.0, -1.0, //
    -1.0, -1.0, -1.0,
];

const BLUR_SIGMA: f32 = 2.0;

/// Applies one of the fixed filter presets. Convolution and blurring
/// are the `image` crate's; this module only supplies the kernels.
pub fn filter(image: &DynamicImage, kind: FilterKind) -> DynamicImage {
    log::debug!("Applying filter {:?}", kind);
    match kind {
        FilterKind::Blur => image.blur(BLUR_SIGMA),
        FilterKind::Sharpen => image.filter3x3(&SHARPEN_KERNEL),
        FilterKind::EdgeEnhance => image.filter3x3(&EDGE_ENHANCE_KERNEL),
        // The emboss kernel centers its response on zero; shifting to
        // mid-gray keeps the relief visible.
        FilterKind::Emboss => image.filter3x3(&EMBOSS_KERNEL).brighten(128),
        FilterKind::FindEdges => image.filter3x3(&EDGE_DETECT_KERNEL),
        FilterKind::Contour => {
            let mut out = image.filter3x3(&EDGE_DETECT_KERNEL);
            out.invert();
            out
        }
    }
}

/// Adjusts brightness, contrast, sharpness or color saturation by a
/// multiplicative factor where 1.0 is identity: the result is the
/// original interpolated against a fully degenerate version of itself
/// (black, flat gray, blurred, or grayscale respectively). The input's
/// color mode is preserved.
pub fn enhance(image: &DynamicImage, kind: EnhanceKind, factor: f32) -> Result<DynamicImage> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(ForgeError::InvalidParameter(format!(
            "enhancement factor must be a non-negative number, got {factor}"
        )));
    }
    log::debug!("Applying enhancement {:?} with factor {}", kind, factor);

    let base = image.to_rgba8();
    let (width, height) = base.dimensions();

    let degenerate: RgbaImage = match kind {
        EnhanceKind::Brightness => RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        EnhanceKind::Contrast => {
            let m = mean_luma(image);
            RgbaImage::from_pixel(width, height, Rgba([m, m, m, 255]))
        }
        EnhanceKind::Sharpness => imageops::blur(&base, 1.5),
        EnhanceKind::Color => {
            let gray = image.to_luma8();
            RgbaImage::from_fn(width, height, |x, y| {
                let l = gray.get_pixel(x, y).0[0];
                Rgba([l, l, l, 255])
            })
        }
    };

    let blended = interpolate(&degenerate, &base, factor);
    Ok(coerce_color(
        DynamicImage::ImageRgba8(blended),
        image.color(),
    ))
}

/// Per-channel lerp from `from` toward `to`; factor 0 yields `from`,
/// 1 yields `to`, >1 extrapolates. Alpha is taken from `to`.
fn interpolate(from: &RgbaImage, to: &RgbaImage, factor: f32) -> RgbaImage {
    RgbaImage::from_fn(to.width(), to.height(), |x, y| {
        let f = from.get_pixel(x, y).0;
        let t = to.get_pixel(x, y).0;
        let mut out = [0u8; 4];
        for c in 0..3 {
            let v = f[c] as f32 + (t[c] as f32 - f[c] as f32) * factor;
            out[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = t[3];
        Rgba(out)
    })
}

fn mean_luma(image: &DynamicImage) -> u8 {
    let gray = image.to_luma8();
    let count = (gray.width() as u64 * gray.height() as u64).max(1);
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    (sum / count) as u8
}

/// Converts back to the eight-bit buffer matching `color`, so effects
/// that work in RGBA internally do not change the image's mode.
pub(crate) fn coerce_color(image: DynamicImage, color: ColorType) -> DynamicImage {
    match color {
        ColorType::L8 => DynamicImage::ImageLuma8(image.to_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(image.to_rgb8()),
        ColorType::Rgba8 => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => image,
    }
}
