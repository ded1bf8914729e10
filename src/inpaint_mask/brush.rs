use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use super::config::{DEFAULT_BRUSH_SIZE, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use super::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushSettings {
    pub tool: Tool,
    size: u32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self { tool: Tool::Brush, size: DEFAULT_BRUSH_SIZE }
    }
}

impl BrushSettings {
    pub fn new(tool: Tool, size: u32) -> Self {
        Self { tool, size: clamp_brush_size(size) }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = clamp_brush_size(size);
        self
    }

    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tool = tool;
        self
    }

    /// Diameter in display pixels, always within the slider range.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn radius(&self) -> f64 {
        self.size as f64 / 2.0
    }
}

pub fn clamp_brush_size(size: u32) -> u32 {
    size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
}

/// Composite one filled circle (a "dab") into `mask`.
///
/// A pixel is covered when its center lies within `radius` of `center`.
/// The brush paints white with `brush_alpha` using source-over, so alpha
/// builds up under repeated dabs and saturates at 255. The eraser is
/// destination-out: covered pixels become fully transparent.
pub fn paint_dab(mask: &mut RgbaImage, center: Point, radius: f64, tool: Tool, brush_alpha: u8) {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 || radius <= 0.0 {
        return;
    }

    // Bounding box of the circle, clipped to the raster.
    let min_x = (center.x - radius).floor().max(0.0) as u32;
    let min_y = (center.y - radius).floor().max(0.0) as u32;
    let max_x = (center.x + radius).ceil().min(width as f64);
    let max_y = (center.y + radius).ceil().min(height as f64);
    if max_x <= 0.0 || max_y <= 0.0 {
        return;
    }
    let (max_x, max_y) = (max_x as u32, max_y as u32);

    let r2 = radius * radius;
    for py in min_y..max_y {
        let dy = py as f64 + 0.5 - center.y;
        for px in min_x..max_x {
            let dx = px as f64 + 0.5 - center.x;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let pixel = mask.get_pixel_mut(px, py);
            *pixel = match tool {
                Tool::Brush => source_over_white(*pixel, brush_alpha),
                Tool::Eraser => Rgba([0, 0, 0, 0]),
            };
        }
    }
}

/// White paint with alpha `sa` composited over `dst`.
fn source_over_white(dst: Rgba<u8>, sa: u8) -> Rgba<u8> {
    let sa = sa as u32;
    let da = dst[3] as u32;
    let out_a = sa + (da * (255 - sa) + 127) / 255;
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    // Straight-alpha blend of white over the existing color.
    let blend = |dc: u8| -> u8 {
        let num = 255 * sa + dc as u32 * da * (255 - sa) / 255;
        ((num + out_a / 2) / out_a).min(255) as u8
    };
    Rgba([blend(dst[0]), blend(dst[1]), blend(dst[2]), out_a.min(255) as u8])
}
