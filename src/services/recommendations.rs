use std::{collections::HashSet, sync::Arc};

use crate::{
    models::{
        Artwork, ArtworkCard, ArtworkDetail, GalleryView, NO_LIKED_MESSAGE,
        NO_RECOMMENDATIONS_MESSAGE,
    },
    services::{images::ImageLocator, providers::ArtProvider},
};

/// Result of aggregating recommendations for a set of liked artworks
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    /// No liked ids were supplied; nothing was fetched
    MissingInput,
    /// Recommendations deduplicated by id, first occurrence wins
    Artworks(Vec<Artwork>),
}

impl Aggregate {
    /// Renders the results screen, with the detail overlay open on `selected` if it is in the set
    pub fn into_view(self, selected: Option<&str>, images: &ImageLocator) -> GalleryView {
        match self {
            Aggregate::MissingInput => GalleryView::Error {
                message: NO_LIKED_MESSAGE,
            },
            Aggregate::Artworks(artworks) if artworks.is_empty() => GalleryView::Empty {
                message: NO_RECOMMENDATIONS_MESSAGE,
            },
            Aggregate::Artworks(artworks) => {
                let detail = selected
                    .and_then(|id| artworks.iter().find(|artwork| artwork.id == id))
                    .map(|artwork| ArtworkDetail::new(artwork, images));

                GalleryView::Gallery {
                    artworks: artworks
                        .iter()
                        .map(|artwork| ArtworkCard::new(artwork, images))
                        .collect(),
                    detail,
                }
            }
        }
    }
}

/// Splits the `liked` navigation parameter into ids, dropping blank entries
pub fn parse_liked(raw: Option<&str>) -> Vec<String> {
    raw.map(|liked| {
        liked
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Keeps the first artwork seen for each id, preserving order
pub fn dedup_by_id(artworks: Vec<Artwork>) -> Vec<Artwork> {
    let mut seen = HashSet::new();
    artworks
        .into_iter()
        .filter(|artwork| seen.insert(artwork.id.clone()))
        .collect()
}

/// Gathers recommendations for every liked id and returns their deduplicated union.
///
/// Requests go out `concurrency` at a time (at least one). Results are always
/// concatenated in the order of `liked_ids`, so dedup tie-breaking does not
/// depend on which response arrives first. Failed requests are skipped.
pub async fn recommend_for_liked(
    provider: Arc<dyn ArtProvider>,
    liked_ids: &[String],
    concurrency: usize,
) -> Aggregate {
    if liked_ids.is_empty() {
        tracing::info!("No liked artworks supplied, skipping recommendation fetch");
        return Aggregate::MissingInput;
    }

    tracing::info!(
        liked_count = liked_ids.len(),
        concurrency,
        "Fetching recommendations"
    );

    let mut collected = Vec::new();
    let mut failures = 0;

    for chunk in liked_ids.chunks(concurrency.max(1)) {
        let mut tasks = Vec::with_capacity(chunk.len());

        for artwork_id in chunk {
            let provider = provider.clone();
            let artwork_id = artwork_id.clone();
            tasks.push(tokio::spawn(async move {
                let result = provider.recommendations(&artwork_id).await;
                (artwork_id, result)
            }));
        }

        // Awaited in submission order
        for task in tasks {
            match task.await {
                Ok((artwork_id, Ok(payload))) => {
                    let artworks = payload.into_artworks();
                    tracing::debug!(
                        artwork_id = %artwork_id,
                        count = artworks.len(),
                        "Recommendations received"
                    );
                    collected.extend(artworks);
                }
                Ok((artwork_id, Err(e))) => {
                    tracing::error!(artwork_id = %artwork_id, error = %e, "Recommendation fetch failed, skipping");
                    failures += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                    failures += 1;
                }
            }
        }
    }

    let total = collected.len();
    let unique = dedup_by_id(collected);

    if failures > 0 {
        tracing::warn!(
            success_count = liked_ids.len() - failures,
            error_count = failures,
            "Partial recommendation fetch failure"
        );
    }

    tracing::info!(total, unique = unique.len(), "Recommendations aggregated");

    Aggregate::Artworks(unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::ArtworkPayload, services::providers::MockArtProvider};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn artwork(id: &str) -> Artwork {
        Artwork {
            id: id.to_string(),
            artist: format!("artist-{id}"),
            description: String::new(),
            genre: String::new(),
            image_url: String::new(),
            vector_index: None,
        }
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn result_ids(aggregate: &Aggregate) -> Vec<&str> {
        match aggregate {
            Aggregate::Artworks(artworks) => artworks.iter().map(|a| a.id.as_str()).collect(),
            Aggregate::MissingInput => panic!("expected artworks"),
        }
    }

    fn scripted_provider() -> MockArtProvider {
        let mut provider = MockArtProvider::new();
        provider
            .expect_recommendations()
            .withf(|id: &str| id == "a")
            .returning(|_| Ok(ArtworkPayload::Bare(vec![artwork("x"), artwork("y")])));
        provider
            .expect_recommendations()
            .withf(|id: &str| id == "b")
            .returning(|_| {
                Ok(ArtworkPayload::Recommendations {
                    recommendations: vec![artwork("y"), artwork("z")],
                })
            });
        provider
    }

    #[tokio::test]
    async fn test_union_in_input_order() {
        let provider: Arc<dyn ArtProvider> = Arc::new(scripted_provider());
        let aggregate = recommend_for_liked(provider, &ids(&["a", "b"]), 1).await;
        assert_eq!(result_ids(&aggregate), vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_parallel_fetch_keeps_input_order() {
        let provider: Arc<dyn ArtProvider> = Arc::new(scripted_provider());
        let aggregate = recommend_for_liked(provider, &ids(&["b", "a"]), 4).await;
        assert_eq!(result_ids(&aggregate), vec!["y", "z", "x"]);
    }

    #[tokio::test]
    async fn test_failed_request_is_skipped() {
        let mut provider = scripted_provider();
        provider
            .expect_recommendations()
            .withf(|id: &str| id == "broken")
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("500".to_string())));
        let provider: Arc<dyn ArtProvider> = Arc::new(provider);

        let aggregate = recommend_for_liked(provider, &ids(&["broken", "b"]), 1).await;
        assert_eq!(result_ids(&aggregate), vec!["y", "z"]);
    }

    #[tokio::test]
    async fn test_missing_input_issues_no_requests() {
        let mut provider = MockArtProvider::new();
        provider.expect_recommendations().never();
        let provider: Arc<dyn ArtProvider> = Arc::new(provider);

        let aggregate = recommend_for_liked(provider, &[], 1).await;
        assert_eq!(aggregate, Aggregate::MissingInput);
    }

    #[tokio::test]
    async fn test_each_id_fetched_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut provider = MockArtProvider::new();
        provider.expect_recommendations().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(ArtworkPayload::Bare(vec![]))
        });
        let provider: Arc<dyn ArtProvider> = Arc::new(provider);

        let aggregate = recommend_for_liked(provider, &ids(&["a", "b", "c"]), 2).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(aggregate, Aggregate::Artworks(vec![]));
    }

    #[test]
    fn test_parse_liked() {
        assert!(parse_liked(None).is_empty());
        assert!(parse_liked(Some("")).is_empty());
        assert!(parse_liked(Some(" , ,")).is_empty());
        assert_eq!(parse_liked(Some("a,b")), vec!["a", "b"]);
        assert_eq!(parse_liked(Some("a,,b ")), vec!["a", "b"]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let artworks = vec![
            Artwork {
                artist: "first".to_string(),
                ..artwork("x")
            },
            artwork("y"),
            Artwork {
                artist: "second".to_string(),
                ..artwork("x")
            },
        ];
        let unique = dedup_by_id(artworks);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].artist, "first");
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let artworks: Vec<Artwork> = ["a", "b", "a", "c", "b", "d"]
            .iter()
            .map(|id| artwork(id))
            .collect();
        let once = dedup_by_id(artworks);
        let twice = dedup_by_id(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_views() {
        let images = ImageLocator::new("https://img.test");

        assert_eq!(
            Aggregate::MissingInput.into_view(None, &images),
            GalleryView::Error {
                message: NO_LIKED_MESSAGE
            }
        );
        assert_eq!(
            Aggregate::Artworks(vec![]).into_view(None, &images),
            GalleryView::Empty {
                message: NO_RECOMMENDATIONS_MESSAGE
            }
        );

        let aggregate = Aggregate::Artworks(vec![artwork("x"), artwork("y")]);
        let GalleryView::Gallery { artworks, detail } =
            aggregate.clone().into_view(Some("y"), &images)
        else {
            panic!("expected gallery");
        };
        assert_eq!(artworks.len(), 2);
        assert_eq!(detail.unwrap().card.id, "y");

        let GalleryView::Gallery { detail, .. } = aggregate.into_view(Some("nope"), &images) else {
            panic!("expected gallery");
        };
        assert!(detail.is_none());
    }
}
