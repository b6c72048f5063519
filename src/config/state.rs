// Application state module
// Immutable per-process values shared by every request handler

use crate::http::cache::CachePolicy;
use crate::media::MediaLibrary;

use super::types::{Config, MediaConfig};

/// Application state
pub struct AppState {
    pub config: Config,
    pub library: MediaLibrary,
    pub cache_policy: CachePolicy,
    /// Cached `Cache-Control` header value
    pub cache_control: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_library(config, MediaLibrary::new(&config.media.root_dir))
    }

    /// Build state around an explicit library (tests point it at a temp dir)
    pub fn with_library(config: &Config, library: MediaLibrary) -> Self {
        let cache_policy = cache_policy_for(&config.media);
        Self {
            config: config.clone(),
            library,
            cache_policy,
            cache_control: cache_policy.to_header_value(),
        }
    }
}

fn cache_policy_for(media: &MediaConfig) -> CachePolicy {
    match (media.cache_max_age, media.cache_private) {
        (0, _) => CachePolicy::NoCache,
        (max_age, true) => CachePolicy::Private(max_age),
        (max_age, false) => CachePolicy::Public(max_age),
    }
}
