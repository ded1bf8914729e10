use std::rc::Rc;

use dioxus::logger::tracing::{debug, info, warn};
use dioxus::prelude::*;

use super::config::MaskEditorConfig;
use super::editor::{MaskChange, MaskEditor};
use super::error::MaskError;
use super::export::encode_png_data_url;
use super::geometry::{ClientRect, Point};
use super::loader::fetch_source_image;
use super::preview::overlay_data_url;
use super::sidebar::MaskToolbar;
use super::surface::SurfaceState;

#[derive(Props, Clone, PartialEq)]
pub struct MaskCanvasProps {
    /// Same-origin, CORS-enabled or `data:` URL of the photo to mask.
    pub image_url: ReadOnlySignal<String>,
    /// Suppresses all pointer handling while true.
    pub disabled: ReadOnlySignal<bool>,
    /// Called after every finished stroke, undo and clear. `None` means there
    /// is no mask to submit.
    pub on_mask_change: EventHandler<Option<String>>,
    #[props(default)]
    pub config: MaskEditorConfig,
}

/// The signals behind one mask canvas, shared with its toolbar.
///
/// Every method reads through `peek`, so calling one from inside a resource or
/// effect never subscribes that scope to the editor.
#[derive(Clone, Copy, PartialEq)]
pub struct MaskCanvasHandle {
    pub editor: Signal<MaskEditor>,
    display_url: Signal<String>,
    overlay_url: Signal<String>,
    /// Bounding box of the surface in page space, used to map touches.
    page_rect: Signal<ClientRect>,
    cursor: Signal<Option<Point>>,
    mounted: Signal<Option<Rc<MountedData>>>,
    on_mask_change: EventHandler<Option<String>>,
}

impl MaskCanvasHandle {
    fn pointer_down(mut self, at: Point) {
        if let Err(e) = self.editor.write().begin_stroke(at) {
            debug!("ignoring pointer-down: {e}");
            return;
        }
        if self.editor.peek().is_disabled() {
            return;
        }
        self.cursor.set(Some(at));
        self.refresh_overlay();
    }

    fn pointer_move(mut self, at: Point) {
        let (disabled, ready, stroking) = {
            let editor = self.editor.peek();
            (editor.is_disabled(), editor.is_ready(), editor.is_stroke_active())
        };
        if disabled || !ready {
            return;
        }
        let painted = stroking
            && match self.editor.write().extend_stroke(at) {
                Ok(painted) => painted,
                Err(e) => {
                    debug!("ignoring pointer-move: {e}");
                    return;
                }
            };
        // Hovering only moves the brush ring, which is drawn at whole pixels.
        let ring_moved = (*self.cursor.peek()).map(|c| c.rounded()) != Some(at.rounded());
        if !painted && !ring_moved {
            return;
        }
        self.cursor.set(Some(at));
        self.refresh_overlay();
    }

    fn pointer_up(mut self) {
        if !self.editor.peek().is_stroke_active() {
            return;
        }
        let change = self.editor.write().end_stroke();
        self.report(change);
    }

    fn pointer_leave(mut self) {
        let had_cursor = self.cursor.peek().is_some();
        self.pointer_up();
        if had_cursor {
            self.cursor.set(None);
            self.refresh_overlay();
        }
    }

    /// Touches carry page coordinates, which do not move when the page scrolls.
    fn touch_point(self, page_x: f64, page_y: f64) -> Point {
        self.page_rect.peek().to_local(page_x, page_y)
    }

    fn set_disabled(mut self, disabled: bool) {
        let finished = self.editor.write().set_disabled(disabled);
        self.report(finished);
        if disabled && self.cursor.peek().is_some() {
            self.cursor.set(None);
            self.refresh_overlay();
        }
    }

    pub fn clear(mut self) {
        let change = self.editor.write().clear();
        info!("mask cleared");
        self.report(Ok(Some(change)));
        self.refresh_overlay();
    }

    pub fn undo(mut self) {
        let change = self.editor.write().undo();
        self.report(change);
        self.refresh_overlay();
    }

    /// Re-read the surface's bounding box. Runs on mount and resize.
    fn refresh_rect(mut self) {
        let Some(element) = self.mounted.peek().clone() else {
            return;
        };
        spawn(async move {
            match element.get_client_rect().await {
                Ok(rect) => self.page_rect.set(page_rect(
                    rect.origin.x,
                    rect.origin.y,
                    rect.size.width,
                    rect.size.height,
                )),
                Err(e) => warn!("failed to read mask surface rect: {e:?}"),
            }
        });
    }

    pub fn refresh_overlay(mut self) {
        let url = {
            let editor = self.editor.peek();
            let Ok(rasters) = editor.surface().rasters() else {
                return;
            };
            let ring = (*self.cursor.peek()).map(|at| (at, editor.brush().radius()));
            overlay_data_url(&rasters.mask, ring)
        };
        match url {
            Ok(url) => self.overlay_url.set(url),
            Err(e) => warn!("failed to render mask overlay: {e}"),
        }
    }

    /// Forward an editing result to the parent. Errors are logged, never reported.
    fn report(self, change: Result<Option<MaskChange>, MaskError>) {
        let change = match change {
            Ok(Some(change)) => change,
            Ok(None) => return,
            Err(e) => {
                debug!("mask not exported: {e}");
                return;
            }
        };
        match change.to_callback_payload() {
            Ok(payload) => self.on_mask_change.call(payload),
            Err(e) => warn!("failed to encode mask: {e}"),
        }
    }
}

/// Convert a viewport-space bounding box into page space.
fn page_rect(left: f64, top: f64, width: f64, height: f64) -> ClientRect {
    let (scroll_x, scroll_y) = page_scroll();
    ClientRect::new(left, top, width, height).translated(scroll_x, scroll_y)
}

#[cfg(target_arch = "wasm32")]
fn page_scroll() -> (f64, f64) {
    web_sys::window()
        .map(|window| {
            (
                window.scroll_x().unwrap_or_default(),
                window.scroll_y().unwrap_or_default(),
            )
        })
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_scroll() -> (f64, f64) {
    (0.0, 0.0)
}

/// Editor state, the `disabled` sync and the image loader for one canvas.
///
/// The image reloads only when `image_url` or `container_width` changes.
pub fn use_mask_canvas(
    config: &MaskEditorConfig,
    image_url: ReadOnlySignal<String>,
    disabled: ReadOnlySignal<bool>,
    container_width: ReadOnlySignal<Option<u32>>,
    on_mask_change: EventHandler<Option<String>>,
) -> MaskCanvasHandle {
    let config = config.clone();
    let mut editor = use_signal(move || MaskEditor::new(&config));
    let mut display_url = use_signal(String::new);
    let handle = MaskCanvasHandle {
        editor,
        display_url,
        overlay_url: use_signal(String::new),
        page_rect: use_signal(ClientRect::default),
        cursor: use_signal(|| None::<Point>),
        mounted: use_signal(|| None::<Rc<MountedData>>),
        on_mask_change,
    };

    use_effect(move || handle.set_disabled(disabled()));

    let _loader = use_resource(move || {
        let url = image_url();
        let width = container_width();
        async move {
            let Some(width) = width else {
                return;
            };
            if url.is_empty() {
                return;
            }
            editor.write().begin_loading();
            display_url.set(String::new());

            let source = match fetch_source_image(&url).await {
                Ok(source) => source,
                Err(e) => {
                    editor.write().fail(e.to_string());
                    return;
                }
            };
            let encoded = {
                let mut editor = editor.write();
                if let Err(e) = editor.load(&source, width) {
                    editor.fail(e.to_string());
                    return;
                }
                match editor.surface().rasters() {
                    Ok(rasters) => encode_png_data_url(&rasters.display),
                    Err(e) => Err(e),
                }
            };
            match encoded {
                Ok(url) => display_url.set(url),
                Err(e) => editor.write().fail(e.to_string()),
            }
            handle.refresh_overlay();
            handle.refresh_rect();
        }
    });

    handle
}

#[component]
pub fn MaskCanvas(props: MaskCanvasProps) -> Element {
    // Read once on mount, so the display scale stays fixed for the session.
    let mut container_width = use_signal(|| None::<u32>);
    let handle = use_mask_canvas(
        &props.config,
        props.image_url,
        props.disabled,
        container_width.into(),
        props.on_mask_change,
    );
    let mut mounted = handle.mounted;
    let mut page_rect_signal = handle.page_rect;

    let display_url = handle.display_url;
    let overlay_url = handle.overlay_url;
    let (display_width, display_height) = match handle.editor.read().state() {
        SurfaceState::Ready(rasters) => rasters.display_size(),
        _ => (0, 0),
    };

    rsx! {
        div {
            class: "mask-canvas",
            MaskToolbar {
                handle: handle,
                disabled: (props.disabled)(),
            }
            div {
                class: "mask-surface",
                style: if (props.disabled)() { "cursor: not-allowed;" } else { "cursor: crosshair;" },
                onmounted: move |evt: MountedEvent| async move {
                    let element = evt.data();
                    match element.get_client_rect().await {
                        Ok(rect) => {
                            info!("mask surface mounted, container width {}", rect.size.width);
                            container_width.set(Some(rect.size.width.floor() as u32));
                            page_rect_signal.set(page_rect(
                                rect.origin.x,
                                rect.origin.y,
                                rect.size.width,
                                rect.size.height,
                            ));
                        }
                        Err(e) => warn!("failed to measure mask surface: {e:?}"),
                    }
                    mounted.set(Some(element));
                },
                onresize: move |_| handle.refresh_rect(),
                onmousedown: move |evt: MouseEvent| {
                    evt.prevent_default();
                    let point = evt.element_coordinates();
                    handle.pointer_down(Point::new(point.x, point.y));
                },
                onmousemove: move |evt: MouseEvent| {
                    let point = evt.element_coordinates();
                    handle.pointer_move(Point::new(point.x, point.y));
                },
                onmouseup: move |_| handle.pointer_up(),
                onmouseleave: move |_| handle.pointer_leave(),
                ontouchstart: move |evt: TouchEvent| {
                    evt.prevent_default();
                    if let Some(touch) = evt.touches().first() {
                        let point = touch.page_coordinates();
                        handle.pointer_down(handle.touch_point(point.x, point.y));
                    }
                },
                ontouchmove: move |evt: TouchEvent| {
                    evt.prevent_default();
                    if let Some(touch) = evt.touches().first() {
                        let point = touch.page_coordinates();
                        handle.pointer_move(handle.touch_point(point.x, point.y));
                    }
                },
                ontouchend: move |_| handle.pointer_up(),
                ontouchcancel: move |_| handle.pointer_up(),

                match handle.editor.read().state() {
                    SurfaceState::Ready(_) => rsx! {
                        img {
                            class: "mask-display",
                            src: "{display_url}",
                            width: "{display_width}",
                            height: "{display_height}",
                            draggable: "false",
                        }
                        img {
                            class: "mask-overlay",
                            src: "{overlay_url}",
                            width: "{display_width}",
                            height: "{display_height}",
                            draggable: "false",
                        }
                    },
                    SurfaceState::Failed(_) => rsx! {
                        div { class: "mask-placeholder", "Could not load image" }
                    },
                    SurfaceState::Loading => rsx! {
                        div { class: "mask-placeholder", "Loading image..." }
                    },
                }
            }
        }
    }
}
