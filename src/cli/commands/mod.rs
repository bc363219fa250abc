mod details;
mod discover;
mod favorite;
mod favorites;
mod init;

pub use details::cmd_details;
pub use discover::cmd_discover;
pub use favorite::{cmd_favorite, cmd_unfavorite};
pub use favorites::{cmd_list_favorites, cmd_show_favorite};
pub use init::cmd_init;

use std::future::Future;
use tracing::warn;

use crate::clients::{CatalogError, TmdbClient};
use crate::config::Config;
use crate::loader::Loader;

fn catalog_client(config: &Config) -> anyhow::Result<TmdbClient> {
    config.require_api_key()?;
    Ok(TmdbClient::new(&config.catalog)?)
}

/// Runs a catalog request as a background load and waits for its result.
async fn fetch_in_background<T, F, Fut>(fetch: F) -> anyhow::Result<T>
where
    T: Clone + Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, CatalogError>> + Send + 'static,
{
    let mut loader = Loader::new(fetch);
    loader.start();

    match loader.result().await {
        Some(Ok(value)) => Ok(value.clone()),
        Some(Err(e)) => {
            warn!(error = %e, "Catalog request failed");
            anyhow::bail!("{}", e.user_message())
        }
        None => anyhow::bail!("Catalog request was cancelled"),
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundaries() {
        assert_eq!(preview("Amélie", 3), "Amé…");
        assert_eq!(preview("Heat", 10), "Heat");
    }
}
