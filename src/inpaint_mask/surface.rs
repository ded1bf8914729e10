use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};
use tracing::{debug, warn};

use super::error::MaskError;
use super::geometry::fit_to_container;

/// Load state of a display surface.
#[derive(Debug, Clone, Default)]
pub enum SurfaceState {
    #[default]
    Loading,
    Ready(Rasters),
    Failed(String),
}

/// The buffers a loaded surface owns.
#[derive(Debug, Clone)]
pub struct Rasters {
    /// Native size of the source image.
    pub source_size: (u32, u32),
    /// Source image resized to the display size. Never touched by strokes.
    pub display: RgbaImage,
    /// Transparent overlay, alpha > 0 marks pixels to regenerate.
    pub mask: RgbaImage,
}

impl Rasters {
    pub fn display_size(&self) -> (u32, u32) {
        self.display.dimensions()
    }
}

/// Owns the source image geometry and the display/mask rasters for one editing session.
#[derive(Debug, Clone, Default)]
pub struct DisplaySurface {
    state: SurfaceState,
}

impl DisplaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit `source` to `container_width` and allocate fresh rasters.
    ///
    /// Any previous mask is discarded. The scale is fixed from here on, a
    /// later container resize does not re-fit the surface.
    pub fn load(&mut self, source: &DynamicImage, container_width: u32) -> Result<(), MaskError> {
        let (source_width, source_height) = source.dimensions();
        if source_width == 0 || source_height == 0 || container_width == 0 {
            self.state = SurfaceState::Failed(MaskError::EmptyImage.to_string());
            return Err(MaskError::EmptyImage);
        }

        let (width, height) = fit_to_container(source_width, source_height, container_width);
        debug!(
            "fit {source_width}x{source_height} source to {width}x{height} display raster"
        );
        let display = source
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgba8();
        let mask = RgbaImage::new(width, height);

        self.state = SurfaceState::Ready(Rasters {
            source_size: (source_width, source_height),
            display,
            mask,
        });
        Ok(())
    }

    /// Record that the source could not be loaded. The surface stays unusable.
    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("mask surface failed to load: {reason}");
        self.state = SurfaceState::Failed(reason);
    }

    /// Drop the current rasters, e.g. when a new image URL is being fetched.
    pub fn reset(&mut self) {
        self.state = SurfaceState::Loading;
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SurfaceState::Ready(_))
    }

    pub fn rasters(&self) -> Result<&Rasters, MaskError> {
        match &self.state {
            SurfaceState::Ready(rasters) => Ok(rasters),
            _ => Err(MaskError::NotReady),
        }
    }

    pub fn rasters_mut(&mut self) -> Result<&mut Rasters, MaskError> {
        match &mut self.state {
            SurfaceState::Ready(rasters) => Ok(rasters),
            _ => Err(MaskError::NotReady),
        }
    }
}
