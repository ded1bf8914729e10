//! Replay a recorded stroke script against a photo and write the binary mask.
//!
//! ```text
//! mask-render --image room.jpg --strokes strokes.json --output mask.png
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use inpaint_mask::inpaint_mask::loader::decode_source_image;
use inpaint_mask::inpaint_mask::script::StrokeScript;
use inpaint_mask::{MaskEditor, MaskEditorConfig};

#[derive(Parser, Debug)]
#[command(name = "mask-render", about = "Render an inpainting mask from recorded strokes")]
struct Args {
    /// Source photo the mask is painted over.
    #[arg(short, long)]
    image: PathBuf,

    /// JSON stroke script (container width plus strokes in display coordinates).
    #[arg(short, long)]
    strokes: PathBuf,

    /// Where to write the PNG mask.
    #[arg(short, long, default_value = "mask.png")]
    output: PathBuf,

    /// Optional JSON editor config (brush opacity, history depth, ...).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the container width recorded in the script.
    #[arg(long)]
    container_width: Option<u32>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            MaskEditorConfig::from_json_str(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => MaskEditorConfig::default(),
    };

    let script_json = fs::read_to_string(&args.strokes)
        .with_context(|| format!("reading stroke script {}", args.strokes.display()))?;
    let script = StrokeScript::from_json_str(&script_json)
        .with_context(|| format!("parsing stroke script {}", args.strokes.display()))?;

    let bytes = fs::read(&args.image)
        .with_context(|| format!("reading image {}", args.image.display()))?;
    let source = decode_source_image(&bytes)?;

    let container_width = args.container_width.unwrap_or(script.container_width);
    let mut editor = MaskEditor::new(&config);
    editor.load(&source, container_width)?;

    let mask = script.replay(&mut editor)?;
    let (width, height) = mask.dimensions();
    info!(
        "replayed {} strokes, {} of {} pixels marked",
        script.strokes.len(),
        mask.painted_pixels(),
        width as usize * height as usize
    );

    fs::write(&args.output, mask.to_png()?)
        .with_context(|| format!("writing mask {}", args.output.display()))?;
    info!("wrote {width}x{height} mask to {}", args.output.display());
    Ok(())
}
