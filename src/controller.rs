//! Upload controller: starts attempts and drives them to a single terminal event.
//!
//! An upload runs in two phases. [`start_upload`] is synchronous: it checks
//! the preconditions and marks the state as uploading. [`run_upload`] performs
//! the network exchange and feeds progress and the outcome back as
//! [`UploadEvent`]s. The UI calls the two phases separately so the state borrow
//! is released before awaiting. [`UploadController`] bundles them for headless
//! use.

use thiserror::Error;

use crate::error::UPLOAD_FAILED_MESSAGE;
use crate::state::{ImageFile, UploadEvent, UploadState};
use crate::transport::{progress_channel, RecommendationTransport, UploadProgress};

/// Why an upload was not started. Neither case changes the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UploadRejected {
    #[error("no image selected")]
    NoFile,

    #[error("an upload is already in progress")]
    AlreadyUploading,
}

/// An attempt that has been marked as started but not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload {
    attempt: u64,
    image: ImageFile,
}

impl PendingUpload {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }
}

/// Begin an upload of the selected image.
///
/// Overlapping uploads are rejected rather than queued, so at most one attempt
/// mutates the state at a time.
pub fn start_upload(state: &mut UploadState) -> Result<PendingUpload, UploadRejected> {
    let Some(image) = state.selected_image().cloned() else {
        return Err(UploadRejected::NoFile);
    };
    if state.is_uploading() {
        log::warn!(
            "Ignoring upload of {} while attempt {} is in flight",
            image.name(),
            state.attempt()
        );
        return Err(UploadRejected::AlreadyUploading);
    }

    if image.is_empty() {
        log::warn!("{} is empty; uploading it anyway", image.name());
    }

    let attempt = state.attempt() + 1;
    state.apply(UploadEvent::UploadStarted { attempt });
    log::info!(
        "Uploading {} ({} bytes), attempt {}",
        image.name(),
        image.len(),
        attempt
    );

    Ok(PendingUpload { attempt, image })
}

/// Send a pending upload and report what happens through `dispatch`.
///
/// `dispatch` sees zero or more `ProgressUpdated` events in transport order
/// followed by exactly one `UploadSucceeded` or `UploadFailed`.
pub async fn run_upload<T, F>(transport: &T, pending: PendingUpload, mut dispatch: F)
where
    T: RecommendationTransport,
    F: FnMut(UploadEvent),
{
    let PendingUpload { attempt, image } = pending;
    let (progress, mut progress_rx) = progress_channel();

    let upload = transport.upload(image, progress);
    tokio::pin!(upload);

    let result = loop {
        tokio::select! {
            biased;
            Some(update) = progress_rx.recv() => dispatch(progress_event(attempt, update)),
            result = &mut upload => break result,
        }
    };

    // Reports queued while the final poll completed still precede the outcome.
    while let Ok(update) = progress_rx.try_recv() {
        dispatch(progress_event(attempt, update));
    }

    let terminal = match result {
        Ok(recommendations) => {
            log::info!(
                "Attempt {} returned {} recommendations",
                attempt,
                recommendations.len()
            );
            UploadEvent::UploadSucceeded {
                attempt,
                recommendations,
            }
        }
        Err(error) => {
            log::error!("Upload attempt {} failed: {}", attempt, error);
            UploadEvent::UploadFailed {
                attempt,
                message: UPLOAD_FAILED_MESSAGE.to_string(),
            }
        }
    };
    dispatch(terminal);
}

fn progress_event(attempt: u64, update: UploadProgress) -> UploadEvent {
    UploadEvent::ProgressUpdated {
        attempt,
        sent: update.sent,
        total: update.total,
    }
}

/// Owns an [`UploadState`] together with the transport that serves it.
pub struct UploadController<T> {
    state: UploadState,
    transport: T,
}

impl<T: RecommendationTransport> UploadController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            state: UploadState::default(),
            transport,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn select_file(&mut self, file: ImageFile) {
        self.state.apply(UploadEvent::FileSelected(file));
    }

    pub fn start_upload(&mut self) -> Result<PendingUpload, UploadRejected> {
        start_upload(&mut self.state)
    }

    pub async fn finish_upload(&mut self, pending: PendingUpload) {
        let Self { state, transport } = self;
        run_upload(transport, pending, |event| state.apply(event)).await;
    }

    /// Start and finish an upload of the selected image.
    pub async fn upload(&mut self) -> Result<(), UploadRejected> {
        let pending = self.start_upload()?;
        self.finish_upload(pending).await;
        Ok(())
    }
}
