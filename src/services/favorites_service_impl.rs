//! Implementation of [`FavoritesService`] over the favorites provider.

use tracing::{debug, info};

use crate::domain::MovieId;
use crate::models::movie::MovieDetail;
use crate::provider::{ContentValues, FavoritesProvider, Query, Resource, Selection};
use crate::services::favorites_service::{
    FavoriteDetail, FavoriteMovie, FavoritesError, FavoritesService, RemovedFavorite,
    fold_movie_rows,
};

/// Favorites kept in the local store through [`FavoritesProvider`].
#[derive(Clone, Debug)]
pub struct SeaOrmFavoritesService {
    provider: FavoritesProvider,
}

impl SeaOrmFavoritesService {
    #[must_use]
    pub const fn new(provider: FavoritesProvider) -> Self {
        Self { provider }
    }

    #[must_use]
    pub const fn provider(&self) -> &FavoritesProvider {
        &self.provider
    }

    fn movie_values(detail: &MovieDetail, poster_image: Option<Vec<u8>>) -> ContentValues {
        ContentValues::new()
            .with("movie_id", detail.id)
            .with("original_title", detail.original_title.as_str())
            .with("poster_image", poster_image)
            .with("release_date", detail.release_date.as_str())
            .with("runtime", detail.runtime)
            .with("vote_average", detail.vote_average)
            .with("overview", detail.overview.as_str())
    }

    fn trailer_values(detail: &MovieDetail) -> Vec<ContentValues> {
        detail
            .trailers
            .iter()
            .map(|t| {
                ContentValues::new()
                    .with("movie_key", detail.id)
                    .with("trailer_id", t.id.as_str())
                    .with("uri", t.url.as_str())
                    .with("name", t.name.as_str())
            })
            .collect()
    }

    fn review_values(detail: &MovieDetail) -> Vec<ContentValues> {
        detail
            .reviews
            .iter()
            .map(|r| {
                ContentValues::new()
                    .with("movie_key", detail.id)
                    .with("review_id", r.id.as_str())
                    .with("author", r.author.as_str())
                    .with("content", r.content.as_str())
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl FavoritesService for SeaOrmFavoritesService {
    async fn add_favorite(
        &self,
        detail: &MovieDetail,
        poster_image: Option<Vec<u8>>,
    ) -> Result<(), FavoritesError> {
        let inserted = self
            .provider
            .insert(&Resource::Movies, &Self::movie_values(detail, poster_image))
            .await?;
        debug!(id = %detail.id, row = %inserted, "Stored favorite movie");

        let trailers = Self::trailer_values(detail);
        if !trailers.is_empty() {
            self.provider
                .bulk_insert(&Resource::Trailers, &trailers)
                .await?;
        }

        let reviews = Self::review_values(detail);
        if !reviews.is_empty() {
            self.provider.bulk_insert(&Resource::Reviews, &reviews).await?;
        }

        info!(
            id = %detail.id,
            title = %detail.original_title,
            trailers = trailers.len(),
            reviews = reviews.len(),
            "Added favorite"
        );
        Ok(())
    }

    async fn remove_favorite(&self, id: MovieId) -> Result<RemovedFavorite, FavoritesError> {
        let movies = self
            .provider
            .delete(&Resource::Movies, Some(&Selection::eq("movie_id", id)))
            .await?;
        let trailers = self
            .provider
            .delete(&Resource::Trailers, Some(&Selection::eq("movie_key", id)))
            .await?;
        let reviews = self
            .provider
            .delete(&Resource::Reviews, Some(&Selection::eq("movie_key", id)))
            .await?;

        let removed = RemovedFavorite {
            movies,
            trailers,
            reviews,
        };
        info!(%id, ?removed, "Removed favorite");
        Ok(removed)
    }

    async fn is_favorite(&self, id: MovieId) -> Result<bool, FavoritesError> {
        let query = Query::new()
            .projection(["movie_id"])
            .selection(Selection::eq("movie_id", id));
        let rows = self.provider.query(&Resource::Movies, &query).await?;
        Ok(!rows.is_empty())
    }

    async fn list_favorites(&self) -> Result<Vec<FavoriteMovie>, FavoritesError> {
        let query = Query::new().order_by("release_date DESC");
        let rows = self.provider.query(&Resource::Movies, &query).await?;
        rows.rows().iter().map(FavoriteMovie::from_row).collect()
    }

    async fn get_favorite(&self, id: MovieId) -> Result<Option<FavoriteDetail>, FavoritesError> {
        let rows = self
            .provider
            .query(&Resource::MovieWithExtras(id), &Query::new())
            .await?;
        fold_movie_rows(rows.rows())
    }
}
