//! Fashion Recommender Client
//!
//! A desktop client that uploads a clothing image to the recommendation
//! service and shows the visually similar items it returns.

pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod transport;
pub mod ui;
pub mod view;

use log::LevelFilter;

pub use config::{ClientConfig, LogLevel};
pub use controller::{run_upload, start_upload, PendingUpload, UploadController, UploadRejected};
pub use error::{AppError, AppResult, UPLOAD_FAILED_MESSAGE};
pub use state::{reduce, ImageFile, UploadEvent, UploadState};
pub use transport::{HttpTransport, ProgressSender, RecommendationTransport, UploadProgress};

/// Initialize logging once.
///
/// `RUST_LOG` takes precedence over `default_filter` when it is set.
pub fn init_logging(default_filter: LevelFilter) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter.as_str()),
    );

    // A second call keeps the logger installed by the first.
    builder.try_init().ok();
}
