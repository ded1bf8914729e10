use std::collections::VecDeque;

use image::{DynamicImage, RgbaImage};
use tracing::{debug, info};

use super::brush::{paint_dab, BrushSettings, Tool};
use super::config::MaskEditorConfig;
use super::error::MaskError;
use super::export::{export_mask, ExportedMask};
use super::geometry::Point;
use super::surface::{DisplaySurface, SurfaceState};

/// What the parent should be told after an editing action.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskChange {
    /// The mask was repainted, here is the fresh native-resolution export.
    Updated(ExportedMask),
    /// There is no mask to submit.
    Cleared,
}

impl MaskChange {
    /// The `onMaskChange` payload: a PNG data URL, or `None` for no mask.
    pub fn to_callback_payload(&self) -> Result<Option<String>, MaskError> {
        match self {
            MaskChange::Updated(mask) => mask.to_data_url().map(Some),
            MaskChange::Cleared => Ok(None),
        }
    }
}

/// Brush/eraser painting state for one display surface.
#[derive(Debug, Clone)]
pub struct MaskEditor {
    surface: DisplaySurface,
    brush: BrushSettings,
    brush_alpha: u8,
    disabled: bool,
    stroke_active: bool,
    /// Mask rasters as they were before each recent stroke, newest last.
    history: VecDeque<RgbaImage>,
    history_depth: usize,
}

impl Default for MaskEditor {
    fn default() -> Self {
        Self::new(&MaskEditorConfig::default())
    }
}

impl MaskEditor {
    pub fn new(config: &MaskEditorConfig) -> Self {
        Self {
            surface: DisplaySurface::new(),
            brush: BrushSettings::default().with_size(config.brush_size),
            brush_alpha: config.brush_alpha(),
            disabled: false,
            stroke_active: false,
            history: VecDeque::new(),
            history_depth: config.history_depth,
        }
    }

    pub fn surface(&self) -> &DisplaySurface {
        &self.surface
    }

    pub fn state(&self) -> &SurfaceState {
        self.surface.state()
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_ready()
    }

    /// Start a new editing session on `source`, fit to `container_width`.
    pub fn load(&mut self, source: &DynamicImage, container_width: u32) -> Result<(), MaskError> {
        self.stroke_active = false;
        self.history.clear();
        self.surface.load(source, container_width)?;
        let rasters = self.surface.rasters()?;
        info!(
            "mask surface ready: source {:?}, display {:?}",
            rasters.source_size,
            rasters.display_size()
        );
        Ok(())
    }

    pub fn begin_loading(&mut self) {
        self.stroke_active = false;
        self.history.clear();
        self.surface.reset();
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.stroke_active = false;
        self.surface.fail(reason);
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.brush = self.brush.with_tool(tool);
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.brush = self.brush.with_size(size);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// While disabled every pointer event is ignored. Disabling in the middle
    /// of a stroke finishes that stroke first and returns its export.
    pub fn set_disabled(&mut self, disabled: bool) -> Result<Option<MaskChange>, MaskError> {
        let finished = if disabled { self.end_stroke() } else { Ok(None) };
        self.disabled = disabled;
        finished
    }

    pub fn is_stroke_active(&self) -> bool {
        self.stroke_active
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Pointer-down: start a stroke and paint one dab at `at`, so a single
    /// click leaves a visible dot. A second pointer-down during a stroke
    /// (another finger) only adds a dab to the stroke in progress.
    pub fn begin_stroke(&mut self, at: Point) -> Result<(), MaskError> {
        if self.disabled {
            return Ok(());
        }
        let rasters = self.surface.rasters_mut()?;
        if !self.stroke_active && self.history_depth > 0 {
            if self.history.len() == self.history_depth {
                self.history.pop_front();
            }
            self.history.push_back(rasters.mask.clone());
        }
        self.stroke_active = true;
        paint_dab(&mut rasters.mask, at, self.brush.radius(), self.brush.tool, self.brush_alpha);
        Ok(())
    }

    /// Pointer-move: paint one dab if a stroke is active. Samples are not
    /// interpolated. Returns whether the mask was touched.
    pub fn extend_stroke(&mut self, at: Point) -> Result<bool, MaskError> {
        if self.disabled || !self.stroke_active {
            return Ok(false);
        }
        let rasters = self.surface.rasters_mut()?;
        paint_dab(&mut rasters.mask, at, self.brush.radius(), self.brush.tool, self.brush_alpha);
        Ok(true)
    }

    /// Pointer-up, touch-end or pointer-leave.
    ///
    /// Returns `Ok(None)` when no stroke was active, otherwise the freshly
    /// exported mask.
    pub fn end_stroke(&mut self) -> Result<Option<MaskChange>, MaskError> {
        if self.disabled || !self.stroke_active {
            return Ok(None);
        }
        self.stroke_active = false;
        let mask = self.export()?;
        debug!("stroke finished, {} pixels marked", mask.painted_pixels());
        Ok(Some(MaskChange::Updated(mask)))
    }

    /// Resample the current mask raster to the source's native resolution.
    pub fn export(&self) -> Result<ExportedMask, MaskError> {
        let rasters = self.surface.rasters()?;
        Ok(export_mask(&rasters.mask, rasters.source_size))
    }

    /// Wipe the mask. Always reports [`MaskChange::Cleared`].
    pub fn clear(&mut self) -> MaskChange {
        self.stroke_active = false;
        self.history.clear();
        if let Ok(rasters) = self.surface.rasters_mut() {
            rasters.mask.pixels_mut().for_each(|p| p.0 = [0, 0, 0, 0]);
        }
        MaskChange::Cleared
    }

    /// Restore the mask as it was before the last stroke.
    ///
    /// Returns `Ok(None)` when there is nothing to undo. Undoing back to an
    /// untouched raster reports [`MaskChange::Cleared`].
    pub fn undo(&mut self) -> Result<Option<MaskChange>, MaskError> {
        if self.disabled {
            return Ok(None);
        }
        let rasters = self.surface.rasters_mut()?;
        let Some(previous) = self.history.pop_back() else {
            return Ok(None);
        };
        rasters.mask = previous;
        self.stroke_active = false;

        if rasters.mask.pixels().all(|p| p[3] == 0) && self.history.is_empty() {
            return Ok(Some(MaskChange::Cleared));
        }
        Ok(Some(MaskChange::Updated(self.export()?)))
    }
}
