//! Resource addresses understood by the favorites provider.

use crate::domain::MovieId;
use crate::entities::{movie, review, trailer};
use sea_orm::{IdenStatic, Iterable};
use std::fmt;
use std::str::FromStr;
use url::Url;

use super::error::StoreError;

pub const CONTENT_SCHEME: &str = "content";
pub const CONTENT_AUTHORITY: &str = "com.popmovies.provider";

pub const PATH_MOVIE: &str = "movie";
pub const PATH_TRAILER: &str = "trailer";
pub const PATH_REVIEW: &str = "review";

/// Physical tables behind the resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Movie,
    Trailer,
    Review,
}

impl Table {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Movie => PATH_MOVIE,
            Self::Trailer => PATH_TRAILER,
            Self::Review => PATH_REVIEW,
        }
    }

    /// Every column of the table, in entity declaration order.
    #[must_use]
    pub fn columns(self) -> Vec<String> {
        match self {
            Self::Movie => movie::Column::iter().map(|c| c.as_str().to_owned()).collect(),
            Self::Trailer => trailer::Column::iter()
                .map(|c| c.as_str().to_owned())
                .collect(),
            Self::Review => review::Column::iter()
                .map(|c| c.as_str().to_owned())
                .collect(),
        }
    }
}

/// A parsed resource address.
///
/// `movie`, `trailer` and `review` name whole tables; `movie/{remoteId}` names
/// one movie expanded with its trailers and reviews. The full
/// `content://com.popmovies.provider/...` spelling is accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Movies,
    MovieWithExtras(MovieId),
    Trailers,
    Reviews,
}

impl Resource {
    /// Table a mutation against this resource writes to.
    #[must_use]
    pub const fn table(&self) -> Table {
        match self {
            Self::Movies | Self::MovieWithExtras(_) => Table::Movie,
            Self::Trailers => Table::Trailer,
            Self::Reviews => Table::Review,
        }
    }

    /// Tables a query against this resource reads from.
    #[must_use]
    pub const fn tables(&self) -> &'static [Table] {
        match self {
            Self::Movies => &[Table::Movie],
            Self::MovieWithExtras(_) => &[Table::Movie, Table::Trailer, Table::Review],
            Self::Trailers => &[Table::Trailer],
            Self::Reviews => &[Table::Review],
        }
    }

    /// Whether live results for `self` go stale when `changed` is mutated.
    #[must_use]
    pub fn observes(&self, changed: &Resource) -> bool {
        changed.tables().iter().any(|t| self.tables().contains(t))
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Movies => PATH_MOVIE.to_string(),
            Self::MovieWithExtras(id) => format!("{PATH_MOVIE}/{id}"),
            Self::Trailers => PATH_TRAILER.to_string(),
            Self::Reviews => PATH_REVIEW.to_string(),
        }
    }

    fn from_segments(address: &str, segments: &[&str]) -> Result<Self, StoreError> {
        match segments {
            [PATH_MOVIE] => Ok(Self::Movies),
            [PATH_MOVIE, id] => id
                .parse::<MovieId>()
                .map(Self::MovieWithExtras)
                .map_err(|_| StoreError::UnsupportedResource(address.to_string())),
            [PATH_TRAILER] => Ok(Self::Trailers),
            [PATH_REVIEW] => Ok(Self::Reviews),
            _ => Err(StoreError::UnsupportedResource(address.to_string())),
        }
    }
}

impl FromStr for Resource {
    type Err = StoreError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let trimmed = address.trim();

        if trimmed.contains("://") {
            let uri = Url::parse(trimmed)
                .map_err(|_| StoreError::UnsupportedResource(address.to_string()))?;
            if uri.scheme() != CONTENT_SCHEME || uri.host_str() != Some(CONTENT_AUTHORITY) {
                return Err(StoreError::UnsupportedResource(address.to_string()));
            }
            let segments: Vec<&str> = uri
                .path_segments()
                .map(|s| s.filter(|seg| !seg.is_empty()).collect())
                .unwrap_or_default();
            return Self::from_segments(address, &segments);
        }

        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        Self::from_segments(address, &segments)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Address of a row created by an insert, in the `<table>/<rowid>` shape.
///
/// The trailing segment is the local row id, not a remote movie id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedRow {
    pub table: Table,
    pub row_id: i64,
}

impl InsertedRow {
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.table.name(), self.row_id)
    }
}

impl fmt::Display for InsertedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CONTENT_SCHEME}://{CONTENT_AUTHORITY}/{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityName;

    #[test]
    fn parses_bare_paths() {
        assert_eq!("movie".parse::<Resource>().unwrap(), Resource::Movies);
        assert_eq!("/trailer/".parse::<Resource>().unwrap(), Resource::Trailers);
        assert_eq!("review".parse::<Resource>().unwrap(), Resource::Reviews);
        assert_eq!(
            "movie/12345".parse::<Resource>().unwrap(),
            Resource::MovieWithExtras(MovieId::new(12345))
        );
    }

    #[test]
    fn parses_content_uris() {
        let resource: Resource = "content://com.popmovies.provider/movie/550".parse().unwrap();
        assert_eq!(resource, Resource::MovieWithExtras(MovieId::new(550)));
        assert_eq!(resource.path(), "movie/550");
    }

    #[test]
    fn rejects_unknown_addresses() {
        for address in [
            "",
            "movies",
            "movie/abc",
            "movie/1/extra",
            "trailer/7",
            "content://other.authority/movie",
            "https://com.popmovies.provider/movie",
        ] {
            let err = address.parse::<Resource>().unwrap_err();
            assert!(
                matches!(err, StoreError::UnsupportedResource(_)),
                "{address} should be unsupported"
            );
        }
    }

    #[test]
    fn join_view_observes_all_three_tables() {
        let single = Resource::MovieWithExtras(MovieId::new(1));
        assert!(single.observes(&Resource::Movies));
        assert!(single.observes(&Resource::Trailers));
        assert!(single.observes(&Resource::Reviews));
        assert!(!Resource::Trailers.observes(&Resource::Reviews));
        assert!(Resource::Movies.observes(&single));
    }

    #[test]
    fn table_columns_follow_entities() {
        assert_eq!(
            Table::Movie.columns(),
            vec![
                "id",
                "movie_id",
                "original_title",
                "poster_image",
                "release_date",
                "runtime",
                "vote_average",
                "overview",
            ]
        );
        assert_eq!(
            Table::Trailer.columns(),
            vec!["id", "movie_key", "trailer_id", "uri", "name"]
        );
        assert_eq!(Table::Movie.name(), movie::Entity.table_name());
        assert_eq!(Table::Trailer.name(), trailer::Entity.table_name());
        assert_eq!(Table::Review.name(), review::Entity.table_name());
    }
}
