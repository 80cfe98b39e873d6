pub mod genre;
pub mod images;
pub mod providers;
pub mod recommendations;
pub mod session;
pub mod swipe;

pub use providers::{ArtProvider, HttpArtProvider};
pub use session::SessionStore;
