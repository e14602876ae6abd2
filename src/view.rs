//! Pure mapping from upload state to what the window shows.

use crate::config::ClientConfig;
use crate::state::UploadState;

/// One entry of the recommendations grid
#[derive(Clone, Debug, PartialEq)]
pub struct RecommendedImage {
    pub url: String,
    pub alt: String,
}

/// What the recommendations area displays
#[derive(Clone, Debug, PartialEq)]
pub enum RecommendationsView {
    Grid(Vec<RecommendedImage>),
    Placeholder,
    Hidden,
}

/// Everything the window needs to draw the upload panel
#[derive(Clone, Debug, PartialEq)]
pub struct UploadView {
    pub preview: Option<String>,
    pub upload_enabled: bool,
    pub busy: bool,
    pub progress: Option<u8>,
    pub error: Option<String>,
    pub recommendations: RecommendationsView,
}

pub fn render(state: &UploadState, config: &ClientConfig) -> UploadView {
    let uploading = state.is_uploading();

    UploadView {
        preview: state.preview_url().map(str::to_string),
        upload_enabled: state.selected_image().is_some() && !uploading,
        busy: uploading,
        progress: uploading.then(|| state.upload_progress()),
        error: state.error().map(str::to_string),
        recommendations: render_recommendations(state, config),
    }
}

fn render_recommendations(state: &UploadState, config: &ClientConfig) -> RecommendationsView {
    let recommendations = state.recommendations();

    if !recommendations.is_empty() {
        let images = recommendations
            .iter()
            .enumerate()
            .map(|(index, path)| RecommendedImage {
                url: config.image_url(path),
                alt: format!("Recommended {}", index + 1),
            })
            .collect();
        return RecommendationsView::Grid(images);
    }

    if !state.is_uploading() && state.error().is_none() {
        RecommendationsView::Placeholder
    } else {
        RecommendationsView::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{reduce, ImageFile, UploadEvent};

    fn selected() -> UploadState {
        reduce(
            UploadState::default(),
            UploadEvent::FileSelected(ImageFile::new("coat.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])),
        )
    }

    #[test]
    fn empty_state_shows_placeholder_and_disabled_button() {
        let view = render(&UploadState::default(), &ClientConfig::default());
        assert!(!view.upload_enabled);
        assert!(!view.busy);
        assert_eq!(view.progress, None);
        assert_eq!(view.preview, None);
        assert_eq!(view.recommendations, RecommendationsView::Placeholder);
    }

    #[test]
    fn selected_file_enables_upload_and_shows_preview() {
        let view = render(&selected(), &ClientConfig::default());
        assert!(view.upload_enabled);
        assert!(view.preview.unwrap().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn uploading_disables_button_and_hides_placeholder() {
        let state = reduce(selected(), UploadEvent::UploadStarted { attempt: 1 });
        let state = reduce(
            state,
            UploadEvent::ProgressUpdated {
                attempt: 1,
                sent: 1,
                total: 4,
            },
        );

        let view = render(&state, &ClientConfig::default());
        assert!(!view.upload_enabled);
        assert!(view.busy);
        assert_eq!(view.progress, Some(25));
        assert_eq!(view.recommendations, RecommendationsView::Hidden);
    }

    #[test]
    fn error_hides_placeholder() {
        let state = reduce(selected(), UploadEvent::UploadStarted { attempt: 1 });
        let state = reduce(
            state,
            UploadEvent::UploadFailed {
                attempt: 1,
                message: "failed".to_string(),
            },
        );

        let view = render(&state, &ClientConfig::default());
        assert_eq!(view.error.as_deref(), Some("failed"));
        assert_eq!(view.progress, None);
        assert!(view.upload_enabled);
        assert_eq!(view.recommendations, RecommendationsView::Hidden);
    }

    #[test]
    fn recommendations_render_as_grid_with_service_urls() {
        let state = reduce(selected(), UploadEvent::UploadStarted { attempt: 1 });
        let state = reduce(
            state,
            UploadEvent::UploadSucceeded {
                attempt: 1,
                recommendations: vec!["12.jpg".to_string(), "7.jpg".to_string()],
            },
        );
        let config = ClientConfig {
            image_path_prefix: "image".to_string(),
            ..ClientConfig::default()
        };

        let view = render(&state, &config);
        assert!(!view.upload_enabled);
        assert_eq!(
            view.recommendations,
            RecommendationsView::Grid(vec![
                RecommendedImage {
                    url: "http://localhost:5000/image/12.jpg".to_string(),
                    alt: "Recommended 1".to_string(),
                },
                RecommendedImage {
                    url: "http://localhost:5000/image/7.jpg".to_string(),
                    alt: "Recommended 2".to_string(),
                },
            ])
        );
    }
}
