pub mod brush;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod loader;
pub mod preview;
pub mod script;
pub mod sidebar;
pub mod surface;
pub mod ui;
