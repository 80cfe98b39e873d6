/// Recommendation backend abstraction
///
/// The backend is opaque: it hands out a random batch of swipe candidates
/// and, per artwork, a list of similar artworks. Responses are normalized to
/// [`ArtworkPayload`] at this boundary so nothing downstream cares about
/// which envelope the backend happened to use.
use crate::{error::AppResult, models::ArtworkPayload};

pub mod http;

pub use http::HttpArtProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArtProvider: Send + Sync {
    /// Fetch a batch of swipe candidates (`GET /random-art`)
    async fn random_artworks(&self) -> AppResult<ArtworkPayload>;

    /// Fetch artworks similar to `artwork_id` (`GET /recommend/:id`)
    ///
    /// A non-success status is an error; callers decide whether to skip it.
    async fn recommendations(&self, artwork_id: &str) -> AppResult<ArtworkPayload>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
