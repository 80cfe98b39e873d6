use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    error::AppResult,
    services::{images::ImageLocator, ArtProvider, HttpArtProvider, SessionStore},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ArtProvider>,
    pub sessions: SessionStore,
    pub images: ImageLocator,
    pub settle_delay: Duration,
    pub recommend_concurrency: usize,
}

impl AppState {
    /// Creates state around an arbitrary backend provider
    pub fn new(provider: Arc<dyn ArtProvider>, config: &Config) -> Self {
        Self {
            provider,
            sessions: SessionStore::new(),
            images: ImageLocator::from_config(config),
            settle_delay: config.settle_delay(),
            recommend_concurrency: config.recommend_concurrency.max(1),
        }
    }

    /// Creates state talking to the configured HTTP backend
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let provider = HttpArtProvider::new(config)?;
        Ok(Self::new(Arc::new(provider), config))
    }
}
