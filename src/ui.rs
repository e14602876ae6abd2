//! Desktop window components.

use dioxus::events::MouseData;
use dioxus::prelude::*;

use crate::config::ClientConfig;
use crate::controller::{run_upload, start_upload};
use crate::state::{ImageFile, UploadEvent, UploadState};
use crate::transport::HttpTransport;
use crate::view::{render, RecommendationsView};

/// Extensions offered by the native file dialog
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

// -----------------------------------------------------------------------------
// Components
// -----------------------------------------------------------------------------

/// Root application component
#[component]
pub fn App() -> Element {
    let config = use_context::<ClientConfig>();
    use_context_provider(|| HttpTransport::new(&config));
    let state = use_signal(UploadState::default);

    let view = render(&state.read(), &config);

    rsx! {
        style { {STYLES} }
        div { class: "upload-container",
            h2 { class: "upload-title", "Image Upload" }
            FilePicker { state }
            PreviewImage { preview: view.preview }
            UploadButton {
                state,
                enabled: view.upload_enabled,
                busy: view.busy,
            }
            UploadProgress { progress: view.progress }
            ErrorMessage { error: view.error }
            Recommendations { recommendations: view.recommendations }
        }
    }
}

#[component]
fn FilePicker(mut state: Signal<UploadState>) -> Element {
    let handle_file_select = move |event: Event<FormData>| {
        let files = event.files();
        if let Some(file) = files.first().cloned() {
            spawn(async move {
                match file.read_bytes().await {
                    Ok(bytes) => {
                        let image = ImageFile::new(file.name(), bytes.to_vec());
                        state.write().apply(UploadEvent::FileSelected(image));
                    }
                    Err(error) => log::error!("Failed to read selected file: {}", error),
                }
            });
        }
    };

    let handle_browse = move |_: Event<MouseData>| {
        spawn(async move {
            let Some(handle) = rfd::AsyncFileDialog::new()
                .set_title("Select an image")
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
                .await
            else {
                return;
            };
            let bytes = handle.read().await;
            let image = ImageFile::new(handle.file_name(), bytes);
            state.write().apply(UploadEvent::FileSelected(image));
        });
    };

    rsx! {
        div { class: "file-picker",
            input {
                r#type: "file",
                accept: "image/*",
                id: "file-input",
                onchange: handle_file_select,
            }
            button { class: "browse-button", onclick: handle_browse, "Browse…" }
        }
    }
}

#[component]
fn PreviewImage(preview: Option<String>) -> Element {
    let Some(src) = preview else {
        return rsx! {};
    };

    rsx! {
        img { class: "preview-image", src: "{src}", alt: "Preview" }
    }
}

#[component]
fn UploadButton(mut state: Signal<UploadState>, enabled: bool, busy: bool) -> Element {
    let transport = use_context::<HttpTransport>();

    let handle_upload = move |_: Event<MouseData>| {
        let pending = match start_upload(&mut state.write()) {
            Ok(pending) => pending,
            Err(reason) => {
                log::debug!("Upload not started: {}", reason);
                return;
            }
        };
        let transport = transport.clone();
        spawn(async move {
            run_upload(&transport, pending, |event| state.write().apply(event)).await;
        });
    };

    rsx! {
        button {
            class: "upload-button",
            disabled: !enabled,
            onclick: handle_upload,
            if busy {
                span { class: "spinner" }
            } else {
                "Upload"
            }
        }
    }
}

#[component]
fn UploadProgress(progress: Option<u8>) -> Element {
    let Some(percent) = progress else {
        return rsx! {};
    };

    rsx! {
        div { class: "upload-progress",
            progress { max: "100", value: "{percent}" }
            span { "{percent}%" }
        }
    }
}

#[component]
fn ErrorMessage(error: Option<String>) -> Element {
    let Some(message) = error else {
        return rsx! {};
    };

    rsx! {
        p { class: "error-message", "{message}" }
    }
}

#[component]
fn Recommendations(recommendations: RecommendationsView) -> Element {
    match recommendations {
        RecommendationsView::Hidden => rsx! {},
        RecommendationsView::Placeholder => rsx! {
            p { class: "placeholder", "No recommendations available" }
        },
        RecommendationsView::Grid(images) => rsx! {
            div { class: "recommendations",
                h3 { "Recommended Images" }
                div { class: "recommendation-grid",
                    for (index, image) in images.into_iter().enumerate() {
                        img {
                            key: "{index}",
                            class: "recommended-image",
                            src: "{image.url}",
                            alt: "{image.alt}",
                        }
                    }
                }
            }
        },
    }
}

// ============================================================================
// Styling
// ============================================================================

const STYLES: &str = r#"
html, body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: #fafafa;
    color: #212121;
}

.upload-container {
    max-width: 600px;
    margin: 32px auto;
    padding: 0 16px;
    display: flex;
    flex-direction: column;
    gap: 16px;
}

.upload-title {
    text-align: center;
    font-weight: 400;
}

.file-picker {
    display: flex;
    align-items: center;
    gap: 12px;
}

.browse-button,
.upload-button {
    padding: 8px 22px;
    border: none;
    border-radius: 4px;
    background: #3f51b5;
    color: white;
    text-transform: uppercase;
    letter-spacing: 0.03em;
    cursor: pointer;
}

.browse-button {
    background: #757575;
}

.upload-button:disabled {
    background: #e0e0e0;
    color: #9e9e9e;
    cursor: default;
}

.spinner {
    display: inline-block;
    width: 16px;
    height: 16px;
    border: 2px solid #9e9e9e;
    border-top-color: transparent;
    border-radius: 50%;
    animation: spin 0.8s linear infinite;
}

@keyframes spin {
    to { transform: rotate(360deg); }
}

.preview-image,
.recommended-image {
    width: 100%;
    height: auto;
    border-radius: 8px;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.2);
}

.upload-progress {
    display: flex;
    align-items: center;
    gap: 8px;
}

.upload-progress progress {
    flex: 1;
}

.error-message {
    text-align: center;
    color: #f44336;
}

.placeholder {
    text-align: center;
}

.recommendations {
    margin-top: 32px;
}

.recommendation-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(160px, 1fr));
    gap: 16px;
}
"#;
