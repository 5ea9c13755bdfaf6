//! Catalog proxy for movie/TV browsing, search and preference-driven recommendations.
//!
//! Requests for trending lists, genres and item details are answered through a
//! read-through cache in front of TMDb. The recommendation wizard compiles a handful of
//! preference answers into TMDb discovery filters.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
