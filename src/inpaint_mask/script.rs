//! Recorded strokes that can be replayed against a [`MaskEditor`] without a browser.
//!
//! ```json
//! {
//!   "container_width": 640,
//!   "strokes": [
//!     { "tool": "brush", "size": 40, "points": [[120, 80], [130, 84]] },
//!     { "tool": "eraser", "size": 10, "points": [[125, 82]] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::brush::Tool;
use super::editor::{MaskChange, MaskEditor};
use super::error::MaskError;
use super::export::ExportedMask;
use super::geometry::Point;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeScript {
    /// Width the display surface is fit to. Points are in this space.
    pub container_width: u32,
    #[serde(default)]
    pub strokes: Vec<RecordedStroke>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedStroke {
    #[serde(default)]
    pub tool: Tool,
    pub size: u32,
    pub points: Vec<(f64, f64)>,
}

impl StrokeScript {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replay every stroke and return the mask exported after the last one.
    ///
    /// With no strokes the current mask is exported as is.
    pub fn replay(&self, editor: &mut MaskEditor) -> Result<ExportedMask, MaskError> {
        let mut last = None;
        for stroke in &self.strokes {
            let Some((&first, rest)) = stroke.points.split_first() else {
                continue;
            };
            editor.set_tool(stroke.tool);
            editor.set_brush_size(stroke.size);
            editor.begin_stroke(Point::new(first.0, first.1))?;
            for &(x, y) in rest {
                editor.extend_stroke(Point::new(x, y))?;
            }
            if let Some(MaskChange::Updated(mask)) = editor.end_stroke()? {
                last = Some(mask);
            }
        }
        match last {
            Some(mask) => Ok(mask),
            None => editor.export(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    const SCRIPT: &str = r#"{
        "container_width": 50,
        "strokes": [
            { "tool": "brush", "size": 10, "points": [[25, 25]] },
            { "size": 10, "points": [] }
        ]
    }"#;

    #[test]
    fn parses_and_defaults_tool_to_brush() {
        let script = StrokeScript::from_json_str(SCRIPT).unwrap();
        assert_eq!(script.container_width, 50);
        assert_eq!(script.strokes[1].tool, Tool::Brush);
    }

    #[test]
    fn replay_exports_native_mask() {
        let script = StrokeScript::from_json_str(SCRIPT).unwrap();
        let mut editor = MaskEditor::default();
        editor
            .load(&DynamicImage::new_rgba8(100, 100), script.container_width)
            .unwrap();
        let mask = script.replay(&mut editor).unwrap();
        assert_eq!(mask.dimensions(), (100, 100));
        // 10 display pixels across, doubled.
        assert_eq!(mask.painted_pixels(), mask_area_of_radius_five() * 4);
    }

    fn mask_area_of_radius_five() -> usize {
        let mut count = 0;
        for py in 0..50 {
            for px in 0..50 {
                let dx = px as f64 + 0.5 - 25.0;
                let dy = py as f64 + 0.5 - 25.0;
                if dx * dx + dy * dy <= 25.0 {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn replay_before_load_is_not_ready() {
        let script = StrokeScript::from_json_str(SCRIPT).unwrap();
        let mut editor = MaskEditor::default();
        assert!(matches!(script.replay(&mut editor), Err(MaskError::NotReady)));
    }
}
