use dioxus::logger::tracing::{info, warn};
use dioxus::prelude::*;

use inpaint_mask::inpaint_mask::client::{InpaintClient, InpaintRequest};
use inpaint_mask::inpaint_mask::sidebar::ImageSourcePicker;
use inpaint_mask::inpaint_mask::ui::MaskCanvas;
use inpaint_mask::MaskEditorConfig;

fn main() {
    dioxus::launch(app);
}

fn app() -> Element {
    rsx! { Router::<Route> {} }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[route("/")]
    InpaintMaskApp {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationState {
    Idle,
    Running,
    Done(String),
    Failed(String),
}

#[component]
fn InpaintMaskApp() -> Element {
    info!("launch");
    let config = use_hook(MaskEditorConfig::from_build_env);

    let image_url = use_signal(String::new);
    let mut mask_url = use_signal(|| None::<String>);
    let mut prompt = use_signal(String::new);
    let mut negative_prompt = use_signal(String::new);
    let mut generation = use_signal(|| GenerationState::Idle);

    // A new photo invalidates the old mask.
    use_effect(move || {
        let _ = image_url();
        mask_url.set(None);
        generation.set(GenerationState::Idle);
    });

    let endpoint = config.inpaint_endpoint.clone();
    let running = *generation.read() == GenerationState::Running;
    let can_submit = endpoint.is_some()
        && mask_url.read().is_some()
        && !prompt.read().trim().is_empty()
        && !running;

    let generate = move |_: MouseEvent| {
        let Some(mask) = mask_url() else {
            return;
        };
        let client = match InpaintClient::from_endpoint(endpoint.as_deref()) {
            Ok(client) => client,
            Err(e) => {
                generation.set(GenerationState::Failed(e.to_string()));
                return;
            }
        };
        // The demo sends the mask inline; production callers upload it first
        // and pass the storage URL.
        let request = InpaintRequest {
            image_url: image_url(),
            mask_url: mask,
            prompt: prompt(),
            negative_prompt: negative_prompt(),
        };
        generation.set(GenerationState::Running);
        spawn(async move {
            match client.submit(&request).await {
                Ok(output_url) => generation.set(GenerationState::Done(output_url)),
                Err(e) => {
                    warn!("inpaint failed: {e}");
                    generation.set(GenerationState::Failed(e.to_string()));
                }
            }
        });
    };

    rsx! {
        document::Link {
            rel: "stylesheet",
            href: asset!("/assets/inpaint_mask.css")
        }
        div {
            class: "centered-container",
            h1 { class: "title", "Room Inpainting" }
            p {
                class: "subtitle",
                "Paint over the part of the room you want to redesign, then describe the change."
            }
        }
        div {
            class: "app-layout",
            div {
                class: "sidebar",
                ImageSourcePicker { image_url: image_url }
                div {
                    class: "prompt-form",
                    label { r#for: "prompt", "Prompt" }
                    textarea {
                        id: "prompt",
                        placeholder: "Replace the sofa with a green velvet sectional",
                        value: "{prompt}",
                        oninput: move |evt: FormEvent| prompt.set(evt.value()),
                    }
                    label { r#for: "negative-prompt", "Negative prompt" }
                    textarea {
                        id: "negative-prompt",
                        value: "{negative_prompt}",
                        oninput: move |evt: FormEvent| negative_prompt.set(evt.value()),
                    }
                    button {
                        class: "generate-button",
                        disabled: !can_submit,
                        onclick: generate,
                        if running { "Generating..." } else { "Generate" }
                    }
                    if config.inpaint_endpoint.is_none() {
                        p { class: "hint", "Set INPAINT_ENDPOINT at build time to enable generation." }
                    }
                    match &*generation.read() {
                        GenerationState::Failed(reason) => rsx! {
                            p { class: "error", "{reason}" }
                        },
                        _ => rsx! {},
                    }
                }
            }
            div {
                class: "editor",
                if image_url.read().is_empty() {
                    div { class: "image-placeholder", "Select or Upload an Image" }
                } else {
                    MaskCanvas {
                        image_url: image_url,
                        disabled: running,
                        on_mask_change: move |mask: Option<String>| {
                            info!("mask changed, present: {}", mask.is_some());
                            mask_url.set(mask);
                        },
                        config: config.clone(),
                    }
                }
                match &*generation.read() {
                    GenerationState::Done(output_url) => rsx! {
                        div {
                            class: "result",
                            h3 { "Result" }
                            img { class: "result-image", src: "{output_url}" }
                        }
                    },
                    _ => rsx! {},
                }
            }
        }
    }
}
