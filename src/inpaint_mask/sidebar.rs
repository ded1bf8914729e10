use base64::{engine::general_purpose, Engine as _};
use dioxus::logger::tracing::{info, warn};
use dioxus::prelude::*;
use web_sys::wasm_bindgen::{JsCast, JsValue};

use super::brush::Tool;
use super::config::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use super::ui::MaskCanvasHandle;

#[component]
pub fn MaskToolbar(handle: MaskCanvasHandle, disabled: bool) -> Element {
    let mut editor = handle.editor;
    let brush = editor.read().brush();
    let is_ready = editor.read().is_ready();
    let can_undo = editor.read().can_undo();
    let size = brush.size();

    let download_mask = move |_: MouseEvent| {
        let png = match editor.read().export().and_then(|mask| mask.to_png()) {
            Ok(png) => png,
            Err(e) => {
                warn!("cannot download mask: {e}");
                return;
            }
        };
        if let Err(e) = download_png(&png, "mask.png") {
            warn!("mask download failed: {e:?}");
        }
    };

    rsx! {
        div {
            class: "control-bar",
            button {
                id: "brush-btn",
                aria_label: "Paint mask",
                disabled: disabled,
                class: format_args!(
                    "control-button {}",
                    if brush.tool == Tool::Brush { "tool-active" } else { "" }
                ),
                onclick: move |_| editor.write().set_tool(Tool::Brush),
                span { "Brush" }
            }
            button {
                id: "eraser-btn",
                aria_label: "Erase mask",
                disabled: disabled,
                class: format_args!(
                    "control-button {}",
                    if brush.tool == Tool::Eraser { "tool-active" } else { "" }
                ),
                onclick: move |_| editor.write().set_tool(Tool::Eraser),
                span { "Eraser" }
            }
            label {
                class: "brush-size",
                r#for: "brush-size",
                "Size: {size}px"
            }
            input {
                id: "brush-size",
                r#type: "range",
                min: "{MIN_BRUSH_SIZE}",
                max: "{MAX_BRUSH_SIZE}",
                value: "{size}",
                disabled: disabled,
                oninput: move |evt: FormEvent| {
                    match evt.value().parse::<u32>() {
                        Ok(size) => editor.write().set_brush_size(size),
                        Err(e) => warn!("bad brush size {:?}: {e}", evt.value()),
                    }
                },
            }
            button {
                id: "undo-btn",
                class: "control-button",
                disabled: disabled || !can_undo,
                onclick: move |_| {
                    info!("undoing last stroke");
                    handle.undo();
                },
                span { "Undo" }
            }
            button {
                id: "clear-btn",
                class: "control-button",
                disabled: disabled || !is_ready,
                onclick: move |_| handle.clear(),
                span { "Clear" }
            }
            button {
                class: "download-button",
                disabled: !is_ready,
                onclick: download_mask,
                "Download Mask PNG"
            }
        }
    }
}

/// Save `png` through a temporary object URL and a synthetic anchor click.
fn download_png(png: &[u8], filename: &str) -> Result<(), JsValue> {
    let array = js_sys::Uint8Array::from(png);
    let blob = web_sys::Blob::new_with_u8_array_sequence(&js_sys::Array::of1(&array))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)
}

/// Turn uploaded file bytes into a `data:` URL the mask canvas can load.
pub fn image_data_url(bytes: &[u8]) -> Option<String> {
    let format = image::guess_format(bytes).ok()?;
    Some(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        general_purpose::STANDARD.encode(bytes)
    ))
}

#[component]
pub fn ImageSourcePicker(mut image_url: Signal<String>) -> Element {
    let mut draft_url = use_signal(String::new);

    let on_file_upload = move |evt: Event<FormData>| {
        if let Some(file_engine) = evt.files() {
            let file_names = file_engine.files();
            if let Some(name) = file_names.first() {
                let name = name.clone();
                spawn(async move {
                    match file_engine.read_file(&name).await {
                        Some(bytes) => {
                            info!("Read file: {name} ({} bytes)", bytes.len());
                            match image_data_url(&bytes) {
                                Some(url) => image_url.set(url),
                                None => warn!("{name} is not a recognised image format"),
                            }
                        }
                        None => warn!("Failed to read file {name}"),
                    }
                });
            }
        }
    };

    rsx! {
        div {
            class: "image-uploader-container",
            div {
                class: "url-row",
                input {
                    r#type: "url",
                    placeholder: "https://example.com/room.jpg",
                    value: "{draft_url}",
                    oninput: move |evt: FormEvent| draft_url.set(evt.value()),
                }
                button {
                    class: "control-button",
                    disabled: draft_url.read().is_empty(),
                    onclick: move |_| image_url.set(draft_url()),
                    "Load"
                }
            }
            div {
                class: "drop-image-container",
                label {
                    r#for: "drop-image",
                    class: "drop-image-label",
                    div {
                        class: "drop-image-text",
                        span { "Drag & drop" }
                        span { class: "drop-image-subtext", "or click to upload a room photo" }
                    }
                    input {
                        id: "drop-image",
                        name: "drop-image",
                        r#type: "file",
                        accept: "image/*",
                        class: "sr-only",
                        onchange: on_file_upload,
                    }
                }
            }
        }
    }
}
