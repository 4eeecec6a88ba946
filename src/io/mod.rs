//! IO modules - external system interfaces
//!
//! - `loader` - venue list and suburb groups from disk or HTTP
//! - `favourites` - favourite venue ids persisted to a JSON file

pub mod favourites;
pub mod loader;

pub use favourites::FavouritesStore;
pub use loader::{DataSource, Loader};
