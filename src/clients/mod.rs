pub mod tmdb;

pub use tmdb::{CatalogError, PosterSource, TmdbClient};
