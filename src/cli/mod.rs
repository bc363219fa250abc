//! CLI module - Command-line interface for PopMovies
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{MovieId, SortOrder};

/// PopMovies - browse the movie catalog and keep favorites offline
#[derive(Parser, Debug)]
#[command(name = "popmovies")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config.toml (default: search the usual locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List movies from the catalog
    #[command(alias = "d")]
    Discover {
        /// popular or top-rated (default: catalog.sort_order)
        #[arg(long, short)]
        sort: Option<SortOrder>,
    },

    /// Show a catalog movie with trailers and reviews
    #[command(alias = "i", alias = "info")]
    Details {
        /// Catalog movie ID
        id: MovieId,
    },

    /// Mark a movie as favorite and store it offline
    #[command(alias = "fav", alias = "add")]
    Favorite {
        /// Catalog movie ID
        id: MovieId,
    },

    /// Remove a movie from favorites
    #[command(alias = "unfav", alias = "rm")]
    Unfavorite {
        /// Catalog movie ID
        id: MovieId,
    },

    /// List stored favorites
    #[command(alias = "ls", alias = "l")]
    Favorites,

    /// Show a stored favorite without contacting the catalog
    #[command(alias = "s")]
    Show {
        /// Catalog movie ID
        id: MovieId,
    },

    /// Create default config file and database
    Init,
}

pub use commands::*;
