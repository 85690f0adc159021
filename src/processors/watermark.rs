// imgforge/src/processors/watermark.rs
use crate::core::{ForgeError, Result};
use font8x8::legacy::BASIC_LEGACY;
use image::{imageops, DynamicImage, Rgba, RgbaImage};

/// Pixel multiplier applied to the 8x8 glyphs, so text renders at
/// 16 px tall.
const GLYPH_SCALE: u32 = 2;
const GLYPH_SIZE: u32 = 8;

/// Default placement, measured from the bottom-right corner.
const DEFAULT_RIGHT_MARGIN: u32 = 200;
const DEFAULT_BOTTOM_MARGIN: u32 = 50;

/// Composites translucent white text onto the image. The text is
/// rasterized onto a transparent layer of the same size which is then
/// alpha-blended over the source, so the image is promoted to RGBA.
pub fn watermark(
    image: &DynamicImage,
    text: &str,
    position: Option<(u32, u32)>,
    opacity: f32,
) -> Result<DynamicImage> {
    if !(0.0..=1.0).contains(&opacity) {
        return Err(ForgeError::InvalidParameter(format!(
            "watermark opacity must be within [0, 1], got {opacity}"
        )));
    }

    let mut base = image.to_rgba8();
    let (width, height) = base.dimensions();
    let (x, y) = position.unwrap_or((
        width.saturating_sub(DEFAULT_RIGHT_MARGIN),
        height.saturating_sub(DEFAULT_BOTTOM_MARGIN),
    ));

    let alpha = (opacity * 255.0).round() as u8;
    let mut layer = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    draw_text(&mut layer, text, x, y, Rgba([255, 255, 255, alpha]));

    imageops::overlay(&mut base, &layer, 0, 0);
    Ok(DynamicImage::ImageRgba8(base))
}

/// Stamps `text` starting at `(x, y)` using the built-in 8x8 glyph
/// set, scaled by [`GLYPH_SCALE`]. Pixels falling outside the layer
/// are dropped. Characters outside the basic set render as `?`.
fn draw_text(layer: &mut RgbaImage, text: &str, x: u32, y: u32, color: Rgba<u8>) {
    let fallback = BASIC_LEGACY[b'?' as usize];
    let mut pen_x = x;
    for ch in text.chars() {
        let glyph = BASIC_LEGACY
            .get(ch as usize)
            .copied()
            .unwrap_or(fallback);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        let px = pen_x + col * GLYPH_SCALE + dx;
                        let py = y + row as u32 * GLYPH_SCALE + dy;
                        if px < layer.width() && py < layer.height() {
                            layer.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
        pen_x += GLYPH_SIZE * GLYPH_SCALE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, GenericImageView};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(240, 120, image::Rgb([10, 20, 30])))
    }

    #[test]
    fn keeps_dimensions_and_promotes_to_rgba() {
        let out = watermark(&sample(), "hello", None, 0.5).unwrap();
        assert_eq!(out.dimensions(), (240, 120));
        assert_eq!(out.color(), ColorType::Rgba8);
    }

    #[test]
    fn text_changes_pixels_at_the_given_position() {
        let out = watermark(&sample(), "X", Some((10, 10)), 1.0).unwrap();
        let rgba = out.to_rgba8();
        let touched = rgba
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [10, 20, 30, 255])
            .count();
        assert!(touched > 0, "watermark left the image untouched");
    }

    #[test]
    fn zero_opacity_is_invisible() {
        let out = watermark(&sample(), "hello", Some((10, 10)), 0.0).unwrap();
        assert!(out
            .to_rgba8()
            .pixels()
            .all(|p| p.0 == [10, 20, 30, 255]));
    }

    #[test]
    fn out_of_range_opacity_is_rejected() {
        assert!(matches!(
            watermark(&sample(), "x", None, 1.5),
            Err(ForgeError::InvalidParameter(_))
        ));
        assert!(matches!(
            watermark(&sample(), "x", None, -0.1),
            Err(ForgeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn default_position_fits_small_images() {
        // Smaller than the default margins; must not panic.
        let tiny = DynamicImage::ImageRgb8(image::RgbImage::new(32, 16));
        let out = watermark(&tiny, "w", None, 0.8).unwrap();
        assert_eq!(out.dimensions(), (32, 16));
    }
}
