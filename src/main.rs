//! Fashion Recommender desktop entry point.
//!
//! Usage: `fashion-recommender [CONFIG_PATH]`

use std::path::PathBuf;

use fashion_recommender::{init_logging, ui::App, ClientConfig};

fn main() {
    let loaded = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => ClientConfig::load(&path),
        None => ClientConfig::load_optional(ClientConfig::default_path().as_deref()),
    };

    let config = loaded
        .as_ref()
        .cloned()
        .unwrap_or_default()
        .with_env_overrides();

    init_logging(config.log_level.to_level_filter());

    if let Err(error) = &loaded {
        log::warn!("Falling back to default configuration: {}", error);
    }
    log::info!("Recommendation endpoint: {}", config.endpoint_url());

    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}
