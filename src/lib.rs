pub mod inpaint_mask;

pub use inpaint_mask::brush::{BrushSettings, Tool};
pub use inpaint_mask::config::MaskEditorConfig;
pub use inpaint_mask::editor::{MaskChange, MaskEditor};
pub use inpaint_mask::error::{InpaintError, MaskError};
pub use inpaint_mask::export::{export_mask, ExportedMask};
pub use inpaint_mask::geometry::{ClientRect, Point};
