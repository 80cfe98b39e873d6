use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::Artwork,
    services::{
        genre::{genre_tone, parse_genres},
        images::ImageLocator,
    },
};

// ============================================================================
// Artwork presentation
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreBadge {
    pub label: String,
    pub tone: &'static str,
}

/// One tile of the swipe deck or the gallery grid
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArtworkCard {
    pub id: String,
    pub artist: String,
    pub title: String,
    pub image_url: String,
    pub genres: Vec<GenreBadge>,
}

impl ArtworkCard {
    pub fn new(artwork: &Artwork, images: &ImageLocator) -> Self {
        let genres = parse_genres(&artwork.genre)
            .into_iter()
            .map(|label| GenreBadge {
                tone: genre_tone(&label),
                label,
            })
            .collect();

        Self {
            id: artwork.id.clone(),
            artist: artwork.artist.clone(),
            title: artwork.display_title(),
            image_url: images.url_for(&artwork.id),
            genres,
        }
    }
}

/// Full-size overlay for a single selected artwork
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArtworkDetail {
    #[serde(flatten)]
    pub card: ArtworkCard,
    pub description: String,
}

impl ArtworkDetail {
    pub fn new(artwork: &Artwork, images: &ImageLocator) -> Self {
        Self {
            card: ArtworkCard::new(artwork, images),
            description: artwork.description.clone(),
        }
    }
}

// ============================================================================
// Screens
// ============================================================================

pub const NO_ARTWORKS_MESSAGE: &str = "No Artworks Available";
pub const NO_LIKED_MESSAGE: &str = "No liked artworks found";
pub const NO_RECOMMENDATIONS_MESSAGE: &str =
    "No recommendations available. Try liking more artworks!";

/// What the swipe screen should show right now
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SwipeView {
    Loading,
    Empty {
        message: &'static str,
    },
    Ready {
        /// 1-based position of `card` in the deck
        position: usize,
        total: usize,
        card: ArtworkCard,
    },
    Complete {
        liked_ids: Vec<String>,
        disliked_ids: Vec<String>,
        redirect: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SwipeSessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub view: SwipeView,
}

/// What the results screen should show
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GalleryView {
    Error {
        message: &'static str,
    },
    Empty {
        message: &'static str,
    },
    Gallery {
        artworks: Vec<ArtworkCard>,
        detail: Option<ArtworkDetail>,
    },
}
