pub mod discover;
pub mod providers;
pub mod recommendations;

pub use providers::{CatalogProvider, TmdbProvider};
