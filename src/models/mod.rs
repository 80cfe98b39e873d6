mod artwork;
mod view;

pub use artwork::{Artwork, ArtworkPayload};
pub use view::{
    ArtworkCard, ArtworkDetail, GalleryView, GenreBadge, SwipeSessionView, SwipeView,
    NO_ARTWORKS_MESSAGE, NO_LIKED_MESSAGE, NO_RECOMMENDATIONS_MESSAGE,
};
