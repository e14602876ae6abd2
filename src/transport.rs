//! Network exchange with the recommendation service.
//!
//! An upload is a single request that yields either the recommendation list
//! or an [`AppError`]. Progress is reported separately through a
//! [`ProgressSender`], since the request body may be polled off the UI task.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, Stream};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::config::ClientConfig;
use crate::error::{AppError, AppResult};
use crate::state::ImageFile;

/// Bytes of the file handed to the HTTP stack so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

/// Sending half of a progress channel.
///
/// Progress counts bytes handed to the HTTP stack, not bytes acknowledged by
/// the socket. Granularity is one report per body chunk, so a file smaller
/// than the chunk size goes from 0 to 100 in a single step.
#[derive(Clone, Debug)]
pub struct ProgressSender(mpsc::UnboundedSender<UploadProgress>);

impl ProgressSender {
    pub fn report(&self, sent: u64, total: u64) {
        // Nobody listening any more is not an upload failure.
        let _ = self.0.send(UploadProgress { sent, total });
    }
}

/// Create a progress channel. Reports arrive in the order they were sent.
pub fn progress_channel() -> (ProgressSender, mpsc::UnboundedReceiver<UploadProgress>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender(tx), rx)
}

/// Something that can deliver an image to the recommendation service.
pub trait RecommendationTransport {
    /// Upload `image` and return the recommended image paths in service order.
    fn upload(
        &self,
        image: ImageFile,
        progress: ProgressSender,
    ) -> impl Future<Output = AppResult<Vec<String>>> + Send;
}

/// Response from the recommendation endpoint
#[derive(Deserialize)]
struct RecommendResponse {
    recommended_images: Vec<String>,
}

// -----------------------------------------------------------------------------
// HTTP transport
// -----------------------------------------------------------------------------

/// Multipart upload over HTTP with a streamed, progress-reporting body.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    upload_field: String,
    chunk_size: usize,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint_url(),
            upload_field: config.upload_field.clone(),
            chunk_size: config.chunk_size.max(1),
            timeout: config.timeout(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(&self, image: ImageFile, progress: ProgressSender) -> AppResult<Form> {
        let total = image.len() as u64;
        let body = Body::wrap_stream(chunked_body(
            Arc::clone(image.bytes()),
            self.chunk_size,
            progress,
        ));

        let part = Part::stream_with_length(body, total)
            .file_name(image.name().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| AppError::FileProcessing(e.to_string()))?;

        Ok(Form::new().part(self.upload_field.clone(), part))
    }
}

impl RecommendationTransport for HttpTransport {
    async fn upload(&self, image: ImageFile, progress: ProgressSender) -> AppResult<Vec<String>> {
        let form = self.build_form(image, progress)?;

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: RecommendResponse = response
            .json()
            .await
            .map_err(|e| AppError::Serialization(e.to_string()))?;

        Ok(payload.recommended_images)
    }
}

/// Split `bytes` into chunks, reporting cumulative progress as each chunk is
/// pulled by the HTTP stack.
///
/// A report fires when reqwest takes a chunk from the stream, which may be
/// before those bytes are written to the socket.
fn chunked_body(
    bytes: Arc<[u8]>,
    chunk_size: usize,
    progress: ProgressSender,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + Sync + 'static {
    let total = bytes.len() as u64;
    let chunk_count = bytes.len().div_ceil(chunk_size);

    stream::iter((0..chunk_count).map(move |index| {
        let start = index * chunk_size;
        let end = (start + chunk_size).min(bytes.len());
        progress.report(end as u64, total);
        log::trace!("Streamed {} of {} bytes", end, total);
        Ok(bytes[start..end].to_vec())
    }))
}
