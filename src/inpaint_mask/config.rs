use serde::{Deserialize, Serialize};

pub const MIN_BRUSH_SIZE: u32 = 5;
pub const MAX_BRUSH_SIZE: u32 = 100;
pub const DEFAULT_BRUSH_SIZE: u32 = 30;

/// Brush paint is white at 70% opacity.
pub const DEFAULT_BRUSH_OPACITY: f32 = 0.7;

pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// Tunables for a [`MaskEditor`](super::editor::MaskEditor).
///
/// Every field has a default, so a partial JSON document such as
/// `{"brush_size": 50}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskEditorConfig {
    /// Initial brush diameter in display pixels.
    pub brush_size: u32,
    /// Opacity of brush paint, 0.0 to 1.0.
    pub brush_opacity: f32,
    /// How many strokes can be undone.
    pub history_depth: usize,
    /// Endpoint accepting `{ imageUrl, maskUrl, prompt, negativePrompt }`.
    pub inpaint_endpoint: Option<String>,
}

impl Default for MaskEditorConfig {
    fn default() -> Self {
        Self {
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_opacity: DEFAULT_BRUSH_OPACITY,
            history_depth: DEFAULT_HISTORY_DEPTH,
            inpaint_endpoint: None,
        }
    }
}

impl MaskEditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Config for the web app. The endpoint is baked in at build time.
    pub fn from_build_env() -> Self {
        Self {
            inpaint_endpoint: option_env!("INPAINT_ENDPOINT")
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            ..Self::default()
        }
    }

    /// Brush alpha as the 0..=255 value written into the mask raster.
    pub fn brush_alpha(&self) -> u8 {
        (self.brush_opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}
