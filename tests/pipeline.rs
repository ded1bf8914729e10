use image::{DynamicImage, Rgba};

use inpaint_mask::inpaint_mask::export::{PRESERVE, REGENERATE};
use inpaint_mask::inpaint_mask::script::StrokeScript;
use inpaint_mask::{ClientRect, MaskChange, MaskEditor, Point, Tool};

fn editor_for(native: (u32, u32), container_width: u32) -> MaskEditor {
    let mut editor = MaskEditor::default();
    editor
        .load(&DynamicImage::new_rgb8(native.0, native.1), container_width)
        .unwrap();
    editor
}

fn stroke(editor: &mut MaskEditor, points: &[(f64, f64)]) -> MaskChange {
    let (first, rest) = points.split_first().unwrap();
    editor.begin_stroke(Point::new(first.0, first.1)).unwrap();
    for &(x, y) in rest {
        editor.extend_stroke(Point::new(x, y)).unwrap();
    }
    editor.end_stroke().unwrap().unwrap()
}

fn assert_binary(change: &MaskChange) {
    let MaskChange::Updated(mask) = change else {
        panic!("expected a mask, got {change:?}");
    };
    for pixel in mask.image().pixels() {
        assert!(*pixel == PRESERVE || *pixel == REGENERATE, "non-binary pixel {pixel:?}");
    }
}

/// Dabs every `step` pixels over the whole display raster.
fn cover_everything(editor: &mut MaskEditor, width: u32, height: u32, step: usize) -> MaskChange {
    let points: Vec<(f64, f64)> = (0..=height)
        .step_by(step)
        .flat_map(|y| (0..=width).step_by(step).map(move |x| (x as f64, y as f64)))
        .collect();
    stroke(editor, &points)
}

#[test]
fn mixed_strokes_export_only_black_and_white() {
    let mut editor = editor_for((1200, 900), 400);
    let change = stroke(&mut editor, &[(10.0, 10.0), (60.5, 40.25), (120.0, 90.0), (300.0, 200.0)]);
    assert_binary(&change);

    editor.set_tool(Tool::Eraser);
    editor.set_brush_size(12);
    let change = stroke(&mut editor, &[(60.0, 40.0), (61.0, 41.0), (399.0, 299.0)]);
    assert_binary(&change);

    editor.set_tool(Tool::Brush);
    editor.set_brush_size(100);
    let change = stroke(&mut editor, &[(200.0, 150.0), (210.0, 150.0), (220.0, 150.0)]);
    assert_binary(&change);
}

#[test]
fn export_matches_native_size_for_large_and_small_sources() {
    for (native, container) in [((4032, 3024), 800), ((320, 240), 800), ((333, 500), 250)] {
        let mut editor = editor_for(native, container);
        let MaskChange::Updated(mask) = stroke(&mut editor, &[(5.0, 5.0)]) else {
            panic!("expected a mask");
        };
        assert_eq!(mask.dimensions(), native);
    }
}

#[test]
fn re_export_is_byte_identical() {
    let mut editor = editor_for((640, 480), 320);
    stroke(&mut editor, &[(100.0, 100.0), (140.0, 120.0)]);
    let first = editor.export().unwrap().to_data_url().unwrap();
    let second = editor.export().unwrap().to_data_url().unwrap();
    assert_eq!(first, second);
}

#[test]
fn erasing_a_painted_canvas_restores_black() {
    let mut editor = editor_for((200, 100), 100);
    editor.set_brush_size(30);

    let MaskChange::Updated(painted) = cover_everything(&mut editor, 100, 50, 10) else {
        panic!("expected a mask");
    };
    assert!(painted.image().pixels().all(|p| *p == REGENERATE));

    editor.set_tool(Tool::Eraser);
    let MaskChange::Updated(erased) = cover_everything(&mut editor, 100, 50, 10) else {
        panic!("expected a mask");
    };
    assert!(erased.image().pixels().all(|p| *p == PRESERVE));
}

#[test]
fn clear_reports_none_while_empty_stroke_reports_black_mask() {
    let mut editor = editor_for((100, 100), 100);
    stroke(&mut editor, &[(50.0, 50.0)]);

    let cleared = editor.clear();
    assert_eq!(cleared.to_callback_payload().unwrap(), None);

    // Erasing nothing still materialises an all-black mask.
    editor.set_tool(Tool::Eraser);
    let erased = stroke(&mut editor, &[(50.0, 50.0)]);
    let payload = erased.to_callback_payload().unwrap();
    assert!(payload.is_some_and(|url| url.starts_with("data:image/png;base64,")));
    let MaskChange::Updated(mask) = erased else {
        panic!("expected a mask");
    };
    assert_eq!(mask.painted_pixels(), 0);
}

#[test]
fn single_dab_maps_to_doubled_native_square() {
    let mut editor = editor_for((100, 100), 50);
    editor.set_brush_size(10);
    let MaskChange::Updated(mask) = stroke(&mut editor, &[(25.0, 25.0)]) else {
        panic!("expected a mask");
    };
    let image = mask.image();

    let white: Vec<(u32, u32)> = image
        .enumerate_pixels()
        .filter(|(_, _, p)| **p == REGENERATE)
        .map(|(x, y, _)| (x, y))
        .collect();
    let min_x = white.iter().map(|p| p.0).min().unwrap();
    let max_x = white.iter().map(|p| p.0).max().unwrap();
    let min_y = white.iter().map(|p| p.1).min().unwrap();
    let max_y = white.iter().map(|p| p.1).max().unwrap();
    assert_eq!((min_x, max_x, min_y, max_y), (40, 59, 40, 59));

    // The rows through the center are solid white across the full diameter.
    for x in 40..=59 {
        assert_eq!(*image.get_pixel(x, 49), REGENERATE);
        assert_eq!(*image.get_pixel(x, 50), REGENERATE);
    }
    // Each display pixel becomes a 2x2 native block.
    assert_eq!(mask.painted_pixels() % 4, 0);
    assert_eq!(*image.get_pixel(39, 50), Rgba([0, 0, 0, 255]));
    assert_eq!(*image.get_pixel(60, 50), Rgba([0, 0, 0, 255]));
}

#[test]
fn client_coordinates_map_through_bounding_rect() {
    let mut editor = editor_for((100, 100), 50);
    editor.set_brush_size(10);
    let rect = ClientRect::new(300.0, 120.0, 50.0, 50.0);
    let at = rect.to_local(325.0, 145.0);
    editor.begin_stroke(at).unwrap();
    let MaskChange::Updated(mask) = editor.end_stroke().unwrap().unwrap() else {
        panic!("expected a mask");
    };
    assert_eq!(*mask.image().get_pixel(50, 50), REGENERATE);
}

#[test]
fn stroke_script_replay_matches_manual_strokes() {
    let script = StrokeScript::from_json_str(
        r#"{
            "container_width": 160,
            "strokes": [
                { "tool": "brush", "size": 20, "points": [[40, 40], [50, 44], [60, 48]] },
                { "tool": "eraser", "size": 8, "points": [[50, 44]] }
            ]
        }"#,
    )
    .unwrap();

    let mut scripted = editor_for((640, 480), script.container_width);
    let replayed = script.replay(&mut scripted).unwrap();

    let mut manual = editor_for((640, 480), 160);
    manual.set_brush_size(20);
    stroke(&mut manual, &[(40.0, 40.0), (50.0, 44.0), (60.0, 48.0)]);
    manual.set_tool(Tool::Eraser);
    manual.set_brush_size(8);
    let MaskChange::Updated(expected) = stroke(&mut manual, &[(50.0, 44.0)]) else {
        panic!("expected a mask");
    };

    assert_eq!(replayed, expected);
    assert_eq!(replayed.dimensions(), (640, 480));
}
