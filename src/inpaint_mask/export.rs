use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use super::error::MaskError;
use super::geometry::scale_factors;

pub const PRESERVE: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const REGENERATE: Rgba<u8> = Rgba([255, 255, 255, 255]);

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A binary mask at the source image's native resolution.
///
/// Every pixel is either [`PRESERVE`] (opaque black) or [`REGENERATE`]
/// (opaque white).
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedMask {
    image: RgbaImage,
}

impl ExportedMask {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Number of pixels marked for regeneration.
    pub fn painted_pixels(&self) -> usize {
        self.image.pixels().filter(|p| **p == REGENERATE).count()
    }

    pub fn to_png(&self) -> Result<Vec<u8>, MaskError> {
        encode_png(&self.image)
    }

    pub fn to_data_url(&self) -> Result<String, MaskError> {
        encode_png_data_url(&self.image)
    }
}

/// Resample a display-resolution mask raster to `native` size.
///
/// Nearest-neighbor: destination `(x, y)` reads source
/// `(floor(x / scale_x), floor(y / scale_y))`. Source alpha > 0 becomes white,
/// anything else black.
pub fn export_mask(mask: &RgbaImage, native: (u32, u32)) -> ExportedMask {
    let (native_width, native_height) = native;
    let (width, height) = mask.dimensions();
    let mut output = RgbaImage::from_pixel(native_width, native_height, PRESERVE);
    if width == 0 || height == 0 || native_width == 0 || native_height == 0 {
        return ExportedMask { image: output };
    }

    let (scale_x, scale_y) = scale_factors(native, (width, height));
    debug!(
        "exporting {width}x{height} mask to {native_width}x{native_height} (scale {scale_x:.3}, {scale_y:.3})"
    );

    // Source column/row for each destination column/row, computed once.
    let src_columns: Vec<usize> = (0..native_width)
        .map(|x| nearest_source(x, scale_x, width))
        .collect();
    let src_rows: Vec<usize> = (0..native_height)
        .map(|y| nearest_source(y, scale_y, height))
        .collect();

    let stride = width as usize * 4;
    let src = mask.as_raw();
    for (row, src_y) in output
        .chunks_exact_mut(native_width as usize * 4)
        .zip(src_rows)
    {
        let src_row = &src[src_y * stride..(src_y + 1) * stride];
        for (out, &src_x) in row.chunks_exact_mut(4).zip(&src_columns) {
            if src_row[src_x * 4 + 3] > 0 {
                out.copy_from_slice(&REGENERATE.0);
            }
        }
    }

    ExportedMask { image: output }
}

fn nearest_source(dest: u32, scale: f64, len: u32) -> usize {
    let src = (dest as f64 / scale).floor() as usize;
    src.min(len as usize - 1)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, MaskError> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(MaskError::Encode)?;
    Ok(buf)
}

pub fn encode_png_data_url(image: &RgbaImage) -> Result<String, MaskError> {
    let png = encode_png(image)?;
    Ok(format!(
        "{PNG_DATA_URL_PREFIX}{}",
        general_purpose::STANDARD.encode(png)
    ))
}

/// Decode the payload of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, MaskError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| MaskError::InvalidDataUrl("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MaskError::InvalidDataUrl("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(MaskError::InvalidDataUrl(format!(
            "unsupported encoding in header {header:?}"
        )));
    }
    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| MaskError::InvalidDataUrl(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint(mask: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, alpha: u8) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.put_pixel(x, y, Rgba([255, 255, 255, alpha]));
            }
        }
    }

    #[test]
    fn empty_mask_exports_all_black() {
        let mask = RgbaImage::new(10, 8);
        let exported = export_mask(&mask, (40, 32));
        assert_eq!(exported.dimensions(), (40, 32));
        assert!(exported.image().pixels().all(|p| *p == PRESERVE));
        assert_eq!(exported.painted_pixels(), 0);
    }

    #[test]
    fn any_alpha_exports_white() {
        let mut mask = RgbaImage::new(2, 1);
        mask.put_pixel(0, 0, Rgba([12, 34, 56, 1]));
        let exported = export_mask(&mask, (2, 1));
        assert_eq!(*exported.image().get_pixel(0, 0), REGENERATE);
        assert_eq!(*exported.image().get_pixel(1, 0), PRESERVE);
    }

    #[test]
    fn upscale_doubles_painted_block() {
        let mut mask = RgbaImage::new(50, 50);
        paint(&mut mask, 20, 20, 29, 29, 179);
        let exported = export_mask(&mask, (100, 100));
        for (x, y, p) in exported.image().enumerate_pixels() {
            let inside = (40..=59).contains(&x) && (40..=59).contains(&y);
            assert_eq!(*p, if inside { REGENERATE } else { PRESERVE }, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn downscale_samples_every_other_pixel() {
        // 4x1 display raster mapped to a 2x1 native image reads source columns 0 and 2.
        let mut mask = RgbaImage::new(4, 1);
        mask.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        mask.put_pixel(2, 0, Rgba([255, 255, 255, 255]));
        let exported = export_mask(&mask, (2, 1));
        assert_eq!(*exported.image().get_pixel(0, 0), PRESERVE);
        assert_eq!(*exported.image().get_pixel(1, 0), REGENERATE);
    }

    #[test]
    fn non_integer_scale_stays_in_bounds() {
        let mut mask = RgbaImage::new(3, 3);
        paint(&mut mask, 2, 2, 2, 2, 255);
        let exported = export_mask(&mask, (10, 10));
        assert_eq!(exported.dimensions(), (10, 10));
        assert_eq!(*exported.image().get_pixel(9, 9), REGENERATE);
        assert_eq!(*exported.image().get_pixel(0, 0), PRESERVE);
    }

    #[test]
    fn data_url_round_trips_through_png() {
        let mut mask = RgbaImage::new(6, 4);
        paint(&mut mask, 1, 1, 3, 2, 255);
        let exported = export_mask(&mask, (6, 4));
        let url = exported.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let bytes = decode_data_url(&url).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(&decoded, exported.image());
    }

    #[test]
    fn decode_rejects_non_base64_data_urls() {
        assert!(matches!(
            decode_data_url("data:text/plain,hello"),
            Err(MaskError::InvalidDataUrl(_))
        ));
        assert!(matches!(
            decode_data_url("https://example.com/room.png"),
            Err(MaskError::InvalidDataUrl(_))
        ));
    }
}
