pub mod filters;
pub mod media;
pub mod preferences;

pub use filters::{FilterSet, FilterValue};
pub use media::{CatalogScope, MediaReference, MediaType, TimeWindow};
pub use preferences::{
    Mood, Popularity, PreferenceParams, PreferenceRecord, Period, Quality, Runtime,
};
