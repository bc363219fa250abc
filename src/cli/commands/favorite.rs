//! Favorite / unfavorite command handlers

use tracing::warn;

use crate::config::Config;
use crate::db::Store;
use crate::domain::MovieId;
use crate::services::FavoritesService;

use super::{catalog_client, fetch_in_background};

pub async fn cmd_favorite(config: &Config, id: MovieId) -> anyhow::Result<()> {
    let client = catalog_client(config)?;
    let store = Store::from_config(&config.general).await?;

    let fetch_client = client.clone();
    let detail = fetch_in_background(move || {
        let client = fetch_client.clone();
        async move { client.movie_details(id).await }
    })
    .await?;

    // A missing poster does not block the favorite.
    let poster = match &detail.poster_url {
        Some(url) => match client.fetch_poster(url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(%id, error = %e, "Failed to fetch poster");
                None
            }
        },
        None => None,
    };

    println!("Adding favorite movie into database...");
    store.favorites().add_favorite(&detail, poster).await?;

    println!(
        "✓ Added: {} ({} trailers, {} reviews)",
        detail.original_title,
        detail.trailers.len(),
        detail.reviews.len()
    );
    Ok(())
}

pub async fn cmd_unfavorite(config: &Config, id: MovieId) -> anyhow::Result<()> {
    let store = Store::from_config(&config.general).await?;
    let removed = store.favorites().remove_favorite(id).await?;

    if removed.is_empty() {
        println!("Movie {id} is not in your favorites.");
    } else {
        println!(
            "✓ Removed movie {id} ({} trailers, {} reviews)",
            removed.trailers, removed.reviews
        );
    }
    Ok(())
}
