//! Upload state record and the reducer that transitions it.
//!
//! Every change to [`UploadState`] goes through [`UploadState::apply`] (or the
//! pure [`reduce`] wrapper), so each transition can be exercised without a
//! rendering environment.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Fallback name for files the picker reports without one.
const UNKNOWN_FILE_NAME: &str = "unknown";

/// MIME type for content that could not be identified.
const OCTET_STREAM: &str = "application/octet-stream";

// -----------------------------------------------------------------------------
// Selected file
// -----------------------------------------------------------------------------

/// A local image chosen by the user, held fully in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            UNKNOWN_FILE_NAME.to_string()
        } else {
            name
        };
        let bytes: Arc<[u8]> = bytes.into();
        let mime_type = sniff_mime_type(&bytes).to_string();

        Self {
            name,
            mime_type,
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Inline `data:` URL the renderer can display without touching disk.
    pub fn preview_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// MIME type detected from the file's magic bytes, ignoring its name.
/// Unrecognised content falls back to `application/octet-stream`.
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(OCTET_STREAM)
}

// -----------------------------------------------------------------------------
// Events
// -----------------------------------------------------------------------------

/// Everything that can change the upload state.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadEvent {
    /// The user picked a file
    FileSelected(ImageFile),
    /// An upload attempt began
    UploadStarted { attempt: u64 },
    /// The transport reported bytes handed to the network
    ProgressUpdated { attempt: u64, sent: u64, total: u64 },
    /// The service answered with a recommendation list
    UploadSucceeded {
        attempt: u64,
        recommendations: Vec<String>,
    },
    /// The attempt failed for any reason
    UploadFailed { attempt: u64, message: String },
}

// -----------------------------------------------------------------------------
// State record
// -----------------------------------------------------------------------------

/// State of one upload session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadState {
    selected_image: Option<ImageFile>,
    preview_url: Option<String>,
    recommendations: Vec<String>,
    uploading: bool,
    upload_progress: u8,
    error: Option<String>,
    attempt: u64,
}

impl UploadState {
    pub fn selected_image(&self) -> Option<&ImageFile> {
        self.selected_image.as_ref()
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn upload_progress(&self) -> u8 {
        self.upload_progress
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Id of the most recently started attempt, `0` before the first one.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Apply one event in place.
    pub fn apply(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::FileSelected(file) => {
                self.preview_url = Some(file.preview_url());
                self.selected_image = Some(file);
            }
            UploadEvent::UploadStarted { attempt } => {
                self.uploading = true;
                self.upload_progress = 0;
                self.error = None;
                self.attempt = attempt;
            }
            UploadEvent::ProgressUpdated {
                attempt,
                sent,
                total,
            } => {
                if !self.is_current(attempt) {
                    log::debug!("Ignoring progress for stale attempt {}", attempt);
                    return;
                }
                if let Some(percent) = progress_percent(sent, total) {
                    self.upload_progress = self.upload_progress.max(percent);
                }
            }
            UploadEvent::UploadSucceeded {
                attempt,
                recommendations,
            } => {
                if !self.is_current(attempt) {
                    log::debug!("Ignoring result for stale attempt {}", attempt);
                    return;
                }
                self.recommendations = recommendations;
                self.selected_image = None;
                self.uploading = false;
            }
            UploadEvent::UploadFailed { attempt, message } => {
                if !self.is_current(attempt) {
                    log::debug!("Ignoring failure for stale attempt {}", attempt);
                    return;
                }
                self.uploading = false;
                self.error = Some(message);
            }
        }
    }

    fn is_current(&self, attempt: u64) -> bool {
        self.uploading && attempt == self.attempt
    }
}

/// Pure form of [`UploadState::apply`].
pub fn reduce(mut state: UploadState, event: UploadEvent) -> UploadState {
    state.apply(event);
    state
}

/// `round(sent * 100 / total)` clamped to 100. `None` when `total` is zero.
pub fn progress_percent(sent: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let percent = (sent as f64 * 100.0 / total as f64).round();
    Some(percent.clamp(0.0, 100.0) as u8)
}
