use reqwest::{Client as HttpClient, Url};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::ArtworkPayload,
    services::providers::ArtProvider,
};

/// Talks to the recommendation backend over plain HTTP
#[derive(Clone)]
pub struct HttpArtProvider {
    http_client: HttpClient,
    api_url: Url,
}

impl HttpArtProvider {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout())
            .build()?;

        let api_url = Url::parse(&config.backend_url).map_err(|e| {
            AppError::InvalidInput(format!("Invalid backend URL {}: {}", config.backend_url, e))
        })?;

        if api_url.cannot_be_a_base() {
            return Err(AppError::InvalidInput(format!(
                "Backend URL {} cannot carry a path",
                config.backend_url
            )));
        }

        Ok(Self {
            http_client,
            api_url,
        })
    }

    /// Appends path segments to the backend URL, escaping each one
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Backend URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_payload(&self, url: Url) -> AppResult<ArtworkPayload> {
        tracing::debug!(url = %url, "Fetching from recommendation backend");

        let response = self.http_client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                url = %url,
                status = %status,
                body = %body,
                "Recommendation backend request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Backend returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json::<ArtworkPayload>().await?)
    }
}

#[async_trait::async_trait]
impl ArtProvider for HttpArtProvider {
    async fn random_artworks(&self) -> AppResult<ArtworkPayload> {
        let url = self.endpoint(&["random-art"])?;
        self.get_payload(url).await
    }

    async fn recommendations(&self, artwork_id: &str) -> AppResult<ArtworkPayload> {
        let url = self.endpoint(&["recommend", artwork_id])?;
        self.get_payload(url).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
