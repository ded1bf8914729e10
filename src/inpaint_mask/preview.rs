use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_circle_mut;

use super::error::MaskError;
use super::export::encode_png_data_url;
use super::geometry::Point;

const CURSOR_COLOR: Rgba<u8> = Rgba([30, 144, 255, 255]);

/// The on-screen overlay: the mask raster as painted, plus an outline showing
/// where and how big the brush is.
pub fn render_overlay(mask: &RgbaImage, cursor: Option<(Point, f64)>) -> RgbaImage {
    let mut overlay = mask.clone();
    if let Some((center, radius)) = cursor {
        draw_hollow_circle_mut(
            &mut overlay,
            center.rounded(),
            radius.round().max(1.0) as i32,
            CURSOR_COLOR,
        );
    }
    overlay
}

pub fn overlay_data_url(mask: &RgbaImage, cursor: Option<(Point, f64)>) -> Result<String, MaskError> {
    encode_png_data_url(&render_overlay(mask, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_without_cursor_is_the_mask() {
        let mut mask = RgbaImage::new(10, 10);
        mask.put_pixel(3, 3, Rgba([255, 255, 255, 179]));
        assert_eq!(render_overlay(&mask, None), mask);
    }

    #[test]
    fn cursor_ring_is_drawn_at_radius() {
        let mask = RgbaImage::new(40, 40);
        let overlay = render_overlay(&mask, Some((Point::new(20.0, 20.0), 10.0)));
        assert_eq!(*overlay.get_pixel(30, 20), CURSOR_COLOR);
        assert_eq!(*overlay.get_pixel(20, 10), CURSOR_COLOR);
        assert_eq!(overlay.get_pixel(20, 20)[3], 0);
    }

    #[test]
    fn cursor_does_not_touch_the_mask() {
        let mask = RgbaImage::new(40, 40);
        render_overlay(&mask, Some((Point::new(20.0, 20.0), 10.0)));
        assert!(mask.pixels().all(|p| p[3] == 0));
    }
}
