pub mod favorites_service;
pub mod favorites_service_impl;

pub use favorites_service::{
    FavoriteDetail, FavoriteMovie, FavoritesError, FavoritesService, RemovedFavorite,
    fold_movie_rows,
};
pub use favorites_service_impl::SeaOrmFavoritesService;
