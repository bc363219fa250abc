//! Discover command handler

use crate::config::Config;
use crate::constants::limits::OVERVIEW_PREVIEW_CHARS;
use crate::domain::SortOrder;

use super::{catalog_client, fetch_in_background, preview};

pub async fn cmd_discover(config: &Config, sort: Option<SortOrder>) -> anyhow::Result<()> {
    let sort = sort.unwrap_or(config.catalog.sort_order);
    let client = catalog_client(config)?;

    println!("Fetching {} movies...", sort.label().to_lowercase());
    let movies = fetch_in_background(move || {
        let client = client.clone();
        async move { client.discover(sort).await }
    })
    .await?;

    println!("{} ({} movies)", sort.label(), movies.len());
    println!("{:-<70}", "");

    for movie in &movies {
        let year = movie
            .release_year()
            .map_or_else(|| "????".to_string(), |y| y.to_string());
        println!(
            "{:>8}  {} ({}) ★ {:.1}",
            movie.id, movie.original_title, year, movie.vote_average
        );
        if !movie.overview.is_empty() {
            println!("          {}", preview(&movie.overview, OVERVIEW_PREVIEW_CHARS));
        }
    }

    println!();
    println!("Show a movie with: popmovies details <id>");

    Ok(())
}
