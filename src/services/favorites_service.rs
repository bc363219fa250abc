//! Domain service for the user's favorite movies.
//!
//! Marking a favorite stores the movie, its trailers and its reviews in the
//! favorites store; the rest of the service reads them back.

use crate::domain::MovieId;
use crate::models::movie::{MovieDetail, Review, Trailer};
use crate::provider::{Row, StoreError};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("Favorites store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid favorite row: {0}")]
    InvalidData(String),
}

/// A stored favorite as listed, without trailers and reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteMovie {
    pub id: MovieId,
    pub original_title: Option<String>,
    #[serde(skip)]
    pub poster_image: Option<Vec<u8>>,
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
}

impl FavoriteMovie {
    /// Reads the movie columns of a movie-table or join-view row.
    pub fn from_row(row: &Row) -> Result<Self, FavoritesError> {
        let id = row
            .get_i64("movie_id")
            .map(MovieId::new)
            .ok_or_else(|| FavoritesError::InvalidData("missing movie_id".to_string()))?;

        Ok(Self {
            id,
            original_title: row.get_str("original_title").map(str::to_string),
            poster_image: row.get_bytes("poster_image").map(<[u8]>::to_vec),
            release_date: row.get_str("release_date").map(str::to_string),
            runtime: row
                .get_i64("runtime")
                .and_then(|r| i32::try_from(r).ok()),
            vote_average: row.get_f64("vote_average"),
            overview: row.get_str("overview").map(str::to_string),
        })
    }
}

/// A stored favorite with its trailers and reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteDetail {
    pub movie: FavoriteMovie,
    pub trailers: Vec<Trailer>,
    pub reviews: Vec<Review>,
}

/// Rows removed per table by [`FavoritesService::remove_favorite`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemovedFavorite {
    pub movies: u64,
    pub trailers: u64,
    pub reviews: u64,
}

impl RemovedFavorite {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.movies == 0 && self.trailers == 0 && self.reviews == 0
    }
}

/// Folds the trailer × review rows of the movie join view back into one
/// movie. Trailers and reviews are deduplicated by id in first-seen order.
///
/// Returns `Ok(None)` for an empty row set.
pub fn fold_movie_rows(rows: &[Row]) -> Result<Option<FavoriteDetail>, FavoritesError> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };
    let movie = FavoriteMovie::from_row(first)?;

    let mut seen_trailers = HashSet::new();
    let mut seen_reviews = HashSet::new();
    let mut trailers = Vec::new();
    let mut reviews = Vec::new();

    for row in rows {
        if let Some(id) = row.get_str("trailer_id") {
            if seen_trailers.insert(id.to_string()) {
                trailers.push(Trailer {
                    id: id.to_string(),
                    url: row.get_str("uri").unwrap_or_default().to_string(),
                    name: row.get_str("name").unwrap_or_default().to_string(),
                });
            }
        }
        if let Some(id) = row.get_str("review_id") {
            if seen_reviews.insert(id.to_string()) {
                reviews.push(Review {
                    id: id.to_string(),
                    author: row.get_str("author").unwrap_or_default().to_string(),
                    content: row.get_str("content").unwrap_or_default().to_string(),
                });
            }
        }
    }

    Ok(Some(FavoriteDetail {
        movie,
        trailers,
        reviews,
    }))
}

/// Domain service trait for favorites.
///
/// # Examples
///
/// ```rust,ignore
/// use popmovies::services::{FavoritesError, FavoritesService};
/// use popmovies::domain::MovieId;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn FavoritesService>) -> Result<(), FavoritesError> {
///     if service.is_favorite(MovieId::new(76341)).await? {
///         service.remove_favorite(MovieId::new(76341)).await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait FavoritesService: Send + Sync {
    /// Stores the movie, then its trailers, then its reviews.
    ///
    /// Marking an already stored movie replaces its rows.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Store`] when any of the writes fails. A
    /// failed trailer or review batch leaves none of that batch behind.
    async fn add_favorite(
        &self,
        detail: &MovieDetail,
        poster_image: Option<Vec<u8>>,
    ) -> Result<(), FavoritesError>;

    /// Deletes the movie, then its trailers, then its reviews.
    async fn remove_favorite(&self, id: MovieId) -> Result<RemovedFavorite, FavoritesError>;

    async fn is_favorite(&self, id: MovieId) -> Result<bool, FavoritesError>;

    /// Every stored favorite, newest release first.
    async fn list_favorites(&self) -> Result<Vec<FavoriteMovie>, FavoritesError>;

    /// One stored favorite with trailers and reviews, if present.
    async fn get_favorite(&self, id: MovieId) -> Result<Option<FavoriteDetail>, FavoritesError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ColumnValue;

    fn join_row(trailer: Option<&str>, review: Option<&str>) -> Row {
        let text = |v: Option<&str>| v.map_or(ColumnValue::Null, ColumnValue::from);
        Row::new(
            [
                "movie_id",
                "original_title",
                "poster_image",
                "runtime",
                "trailer_id",
                "uri",
                "name",
                "review_id",
                "author",
                "content",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            vec![
                ColumnValue::Integer(76341),
                ColumnValue::from("Mad Max: Fury Road"),
                ColumnValue::Blob(vec![1, 2, 3]),
                ColumnValue::Integer(120),
                text(trailer),
                text(trailer.map(|_| "https://www.youtube.com/watch?v=x")),
                text(trailer.map(|_| "Trailer")),
                text(review),
                text(review.map(|_| "Phileas Fogg")),
                text(review.map(|_| "Fabulous")),
            ],
        )
    }

    #[test]
    fn fold_deduplicates_cross_product() {
        let rows = vec![
            join_row(Some("t1"), Some("r1")),
            join_row(Some("t1"), Some("r2")),
            join_row(Some("t2"), Some("r1")),
            join_row(Some("t2"), Some("r2")),
        ];

        let detail = fold_movie_rows(&rows).unwrap().unwrap();
        assert_eq!(detail.movie.id, MovieId::new(76341));
        assert_eq!(detail.movie.runtime, Some(120));
        assert_eq!(detail.movie.poster_image.as_deref(), Some(&[1, 2, 3][..]));
        let trailer_ids: Vec<_> = detail.trailers.iter().map(|t| t.id.as_str()).collect();
        let review_ids: Vec<_> = detail.reviews.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(trailer_ids, ["t1", "t2"]);
        assert_eq!(review_ids, ["r1", "r2"]);
    }

    #[test]
    fn fold_of_null_extras_is_bare_movie() {
        let detail = fold_movie_rows(&[join_row(None, None)]).unwrap().unwrap();
        assert!(detail.trailers.is_empty());
        assert!(detail.reviews.is_empty());
    }

    #[test]
    fn fold_of_nothing_is_none() {
        assert!(fold_movie_rows(&[]).unwrap().is_none());
    }

    #[test]
    fn row_without_movie_id_is_invalid() {
        let row = Row::new(vec!["original_title".into()], vec![ColumnValue::from("x")]);
        assert!(matches!(
            FavoriteMovie::from_row(&row),
            Err(FavoritesError::InvalidData(_))
        ));
    }
}
