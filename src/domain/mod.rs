//! Domain primitives shared by the catalog client and the favorites store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remote catalog identifier of a movie.
///
/// Favorites are keyed by this value in every table, so it is kept distinct
/// from the local row ids the store hands back after an insert.
///
/// # Examples
///
/// ```rust
/// use popmovies::domain::MovieId;
///
/// let id = MovieId::new(12345);
/// assert_eq!(id.value(), 12345);
/// assert_eq!(id.to_string(), "12345");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MovieId(i64);

impl MovieId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MovieId> for i64 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl FromStr for MovieId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self::new)
    }
}

impl Serialize for MovieId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i64::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Order in which the catalog lists movies.
///
/// Passed explicitly to the catalog client instead of being looked up from
/// ambient preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Popular,
    TopRated,
}

impl SortOrder {
    /// Value of the catalog's `sort_by` query parameter.
    #[must_use]
    pub const fn as_query_value(&self) -> &'static str {
        match self {
            Self::Popular => "popularity.desc",
            Self::TopRated => "vote_average.desc",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Popular => "Most Popular",
            Self::TopRated => "Highest Rated",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "popular" | "popularity" | "most_popular" => Ok(Self::Popular),
            "top_rated" | "rating" | "rated" | "highest_rated" => Ok(Self::TopRated),
            other => Err(format!(
                "unknown sort order '{other}' (expected 'popular' or 'top-rated')"
            )),
        }
    }
}
