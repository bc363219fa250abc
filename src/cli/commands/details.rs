//! Details command handler

use crate::config::Config;
use crate::db::Store;
use crate::domain::MovieId;
use crate::models::movie::MovieDetail;
use crate::services::FavoritesService;

use super::{catalog_client, fetch_in_background};

pub async fn cmd_details(config: &Config, id: MovieId) -> anyhow::Result<()> {
    let client = catalog_client(config)?;

    let detail = fetch_in_background(move || {
        let client = client.clone();
        async move { client.movie_details(id).await }
    })
    .await?;

    let store = Store::from_config(&config.general).await?;
    let is_favorite = store.favorites().is_favorite(id).await?;

    print_detail(&detail, is_favorite);
    Ok(())
}

fn print_detail(detail: &MovieDetail, is_favorite: bool) {
    match detail.release_year() {
        Some(year) => println!("{} ({year})", detail.original_title),
        None => println!("{}", detail.original_title),
    }
    println!("{:-<70}", "");
    println!("ID:       {}", detail.id);
    println!(
        "Released: {}",
        if detail.release_date.is_empty() {
            "?"
        } else {
            detail.release_date.as_str()
        }
    );
    println!(
        "Runtime:  {}",
        detail.runtime_str().unwrap_or_else(|| "?".to_string())
    );
    println!("Rating:   {:.1}/10", detail.vote_average);
    if let Some(poster) = &detail.poster_url {
        println!("Poster:   {poster}");
    }
    println!("Favorite: {}", if is_favorite { "yes" } else { "no" });

    if !detail.overview.is_empty() {
        println!();
        println!("{}", detail.overview);
    }

    println!();
    println!("Trailers ({})", detail.trailers.len());
    for trailer in &detail.trailers {
        println!("  ▶ {} - {}", trailer.name, trailer.url);
    }

    println!();
    println!("Reviews ({})", detail.reviews.len());
    for review in &detail.reviews {
        println!("  {} wrote:", review.author);
        for line in review.content.lines().filter(|l| !l.trim().is_empty()) {
            println!("    {}", line.trim());
        }
    }
}
