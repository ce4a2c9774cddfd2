//! PNG export

use std::io::Cursor;

use image::{imageops, ImageFormat, Rgb, RgbImage};

use crate::chart::Chart;
use crate::error::ChartResult;
use crate::render::{render, RenderOptions};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Crop uniform white margins, keeping `pad` pixels of white around the
/// content. A blank image is returned unchanged.
pub fn tight_crop(image: &RgbImage, pad: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if *pixel == WHITE {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let Some((x0, y0, x1, y1)) = bounds else {
        return image.clone();
    };

    let left = x0.saturating_sub(pad);
    let top = y0.saturating_sub(pad);
    let right = x1.saturating_add(pad).min(width - 1);
    let bottom = y1.saturating_add(pad).min(height - 1);

    imageops::crop_imm(image, left, top, right - left + 1, bottom - top + 1).to_image()
}

/// Render `chart` and encode it as PNG, cropped to its content.
pub fn export_png(chart: &Chart, options: &RenderOptions) -> ChartResult<Vec<u8>> {
    let image = render(chart, options)?;
    let cropped = tight_crop(&image, options.tight_pad_px);

    let mut bytes = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    log::debug!(
        "exported {}x{} PNG ({} bytes)",
        cropped.width(),
        cropped.height(),
        bytes.len()
    );
    Ok(bytes)
}
