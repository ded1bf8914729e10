/// A point in display-raster space, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The pixel the point falls nearest to.
    pub fn rounded(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// The bounding box of the display surface, in the same space as the pointer
/// positions it maps (viewport or page).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Map a pointer position into the surface's local coordinate system.
    pub fn to_local(&self, x: f64, y: f64) -> Point {
        Point::new(x - self.left, y - self.top)
    }

    /// Shift the box, e.g. from viewport to page space by the scroll offset.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }
}

/// Size of the display raster when a `source_width x source_height` image is fit
/// to a container `container_width` pixels wide. Height keeps the aspect ratio.
pub fn fit_to_container(source_width: u32, source_height: u32, container_width: u32) -> (u32, u32) {
    let scale = container_width as f64 / source_width as f64;
    let height = (source_height as f64 * scale).floor() as u32;
    (container_width, height.max(1))
}

/// Native-over-display scale factors `(W / w, H / h)`.
pub fn scale_factors(native: (u32, u32), display: (u32, u32)) -> (f64, f64) {
    (
        native.0 as f64 / display.0 as f64,
        native.1 as f64 / display.1 as f64,
    )
}
