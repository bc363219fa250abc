//! Stored favorites command handlers

use crate::config::Config;
use crate::db::Store;
use crate::domain::MovieId;
use crate::models::movie::release_year;
use crate::services::FavoritesService;

pub async fn cmd_list_favorites(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(&config.general).await?;
    let favorites = store.favorites().list_favorites().await?;

    if favorites.is_empty() {
        println!("No favorite movies.");
        println!();
        println!("Add one with: popmovies favorite <id>");
        return Ok(());
    }

    println!("Favorite Movies ({} total)", favorites.len());
    println!("{:-<70}", "");

    for movie in favorites {
        let year = movie
            .release_date
            .as_deref()
            .and_then(release_year)
            .map_or_else(|| "????".to_string(), |y| y.to_string());
        let rating = movie
            .vote_average
            .map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
        println!(
            "{:>8}  {} ({}) ★ {}{}",
            movie.id,
            movie.original_title.as_deref().unwrap_or("(untitled)"),
            year,
            rating,
            if movie.poster_image.is_some() { "" } else { "  [no poster]" }
        );
    }

    Ok(())
}

pub async fn cmd_show_favorite(config: &Config, id: MovieId) -> anyhow::Result<()> {
    let store = Store::from_config(&config.general).await?;

    let Some(favorite) = store.favorites().get_favorite(id).await? else {
        println!("Movie {id} is not in your favorites.");
        println!("Use 'popmovies favorites' to see stored movies.");
        return Ok(());
    };

    let movie = &favorite.movie;
    println!("{}", movie.original_title.as_deref().unwrap_or("(untitled)"));
    println!("{:-<70}", "");
    println!("ID:       {}", movie.id);
    println!("Released: {}", movie.release_date.as_deref().unwrap_or("?"));
    println!(
        "Runtime:  {}",
        movie
            .runtime
            .filter(|r| *r > 0)
            .map_or_else(|| "?".to_string(), |r| format!("{r} min"))
    );
    if let Some(vote) = movie.vote_average {
        println!("Rating:   {vote:.1}/10");
    }
    if let Some(poster) = &movie.poster_image {
        println!("Poster:   {} bytes stored", poster.len());
    }
    if let Some(overview) = movie.overview.as_deref().filter(|o| !o.is_empty()) {
        println!();
        println!("{overview}");
    }

    println!();
    println!("Trailers ({})", favorite.trailers.len());
    for trailer in &favorite.trailers {
        println!("  ▶ {} - {}", trailer.name, trailer.url);
    }

    println!();
    println!("Reviews ({})", favorite.reviews.len());
    for review in &favorite.reviews {
        println!("  {} wrote:", review.author);
        for line in review.content.lines().filter(|l| !l.trim().is_empty()) {
            println!("    {}", line.trim());
        }
    }

    Ok(())
}
