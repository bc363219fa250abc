//! Client for the TMDb v3 catalog API.
//!
//! Only two endpoints are used: `/discover/movie` for listings and
//! `/movie/{id}` with videos and reviews appended for the details screen.
//! Parsing is kept in free functions so it can be exercised without a server.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::error::Error as _;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::CatalogConfig;
use crate::constants::{tmdb, youtube};
use crate::domain::{MovieId, SortOrder};
use crate::models::movie::{MovieDetail, MovieSummary, Review, Trailer};

/// Failures of a catalog request, classified the way they are reported.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unable to resolve catalog host: {0}")]
    UnknownHost(String),

    #[error("Catalog authentication failed")]
    AuthenticationFailed,

    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed catalog response: {0}")]
    Parse(String),

    #[error("Catalog returned no movies")]
    NoResults,

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CatalogError {
    fn from_transport(err: &reqwest::Error, host: &str) -> Self {
        if err.is_connect() {
            return Self::UnknownHost(host.to_string());
        }
        if err.is_decode() {
            return Self::Parse(err.to_string());
        }
        let mut message = err.to_string();
        if let Some(source) = err.source() {
            message = format!("{message}: {source}");
        }
        Self::Network(message)
    }

    /// Text shown to the user in place of the raw error.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownHost(_) => {
                "Unable to connect to the movie catalog. Please check your internet connection."
            }
            Self::AuthenticationFailed => {
                "The movie catalog rejected the API key. Please check catalog.api_key."
            }
            Self::NoResults => "No movies found.",
            Self::Status { .. } | Self::Network(_) | Self::Parse(_) | Self::InvalidUrl(_) => {
                "Unable to fetch movie data. Please try again later."
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    results: Vec<RawMovie>,
}

#[derive(Debug, Deserialize)]
struct RawMovie {
    id: i64,
    original_title: String,
    poster_path: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    overview: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    #[serde(flatten)]
    movie: RawMovie,
    runtime: Option<i32>,
    videos: ResultList<RawVideo>,
    reviews: ResultList<RawReview>,
}

#[derive(Debug, Deserialize)]
struct ResultList<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    id: String,
    key: String,
    name: String,
    site: String,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    id: String,
    author: String,
    content: String,
}

/// Where poster images live and at which width they are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterSource {
    pub image_base_url: String,
    pub poster_size: String,
}

impl PosterSource {
    #[must_use]
    pub fn new(image_base_url: impl Into<String>, poster_size: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into(),
            poster_size: poster_size.into(),
        }
    }

    /// `{image base}/{size}/{poster path}` with single separators.
    #[must_use]
    pub fn url_for(&self, poster_path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.image_base_url.trim_end_matches('/'),
            self.poster_size.trim_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }
}

impl Default for PosterSource {
    fn default() -> Self {
        Self::new(tmdb::IMAGE_BASE_URL, tmdb::POSTER_SIZE)
    }
}

impl RawMovie {
    fn into_summary(self, posters: &PosterSource) -> MovieSummary {
        MovieSummary {
            id: MovieId::new(self.id),
            original_title: self.original_title,
            poster_url: self
                .poster_path
                .filter(|p| !p.trim().is_empty())
                .map(|p| posters.url_for(&p)),
            release_date: self.release_date.unwrap_or_default(),
            vote_average: self.vote_average,
            overview: self.overview.unwrap_or_default(),
        }
    }
}

/// Parses a `/discover/movie` body. An empty listing is [`CatalogError::NoResults`].
pub fn parse_discover(body: &str, posters: &PosterSource) -> Result<Vec<MovieSummary>, CatalogError> {
    let response: DiscoverResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Parse(e.to_string()))?;

    if response.results.is_empty() {
        return Err(CatalogError::NoResults);
    }

    Ok(response
        .results
        .into_iter()
        .map(|m| m.into_summary(posters))
        .collect())
}

/// Parses a `/movie/{id}` body fetched with videos and reviews appended.
///
/// Videos hosted anywhere but YouTube are dropped.
pub fn parse_details(body: &str, posters: &PosterSource) -> Result<MovieDetail, CatalogError> {
    let raw: RawDetail =
        serde_json::from_str(body).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let trailers = raw
        .videos
        .results
        .into_iter()
        .filter(|v| v.site == tmdb::TRAILER_SITE)
        .map(|v| Trailer {
            id: v.id,
            url: format!("{}{}", youtube::WATCH_URL, v.key),
            name: v.name,
        })
        .collect();

    let reviews = raw
        .reviews
        .results
        .into_iter()
        .map(|r| Review {
            id: r.id,
            author: r.author,
            content: r.content,
        })
        .collect();

    let summary = raw.movie.into_summary(posters);
    Ok(MovieDetail {
        id: summary.id,
        original_title: summary.original_title,
        poster_url: summary.poster_url,
        release_date: summary.release_date,
        runtime: raw.runtime,
        vote_average: summary.vote_average,
        overview: summary.overview,
        trailers,
        reviews,
    })
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
    posters: PosterSource,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("posters", &self.posters)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    /// Builds a client with its own connection pool and the configured timeout.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent("PopMovies/1.0")
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Self::with_shared_client(client, config)
    }

    pub fn with_shared_client(client: Client, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            posters: PosterSource::new(&config.image_base_url, &config.poster_size),
        })
    }

    #[must_use]
    pub const fn posters(&self) -> &PosterSource {
        &self.posters
    }

    /// Lists movies in the given order.
    pub async fn discover(&self, sort_order: SortOrder) -> Result<Vec<MovieSummary>, CatalogError> {
        let url = self.endpoint(
            &["discover", "movie"],
            &[("sort_by", sort_order.as_query_value())],
        );

        let result = match self.get_text(url).await {
            Ok(body) => parse_discover(&body, &self.posters),
            Err(e) => Err(e),
        };

        match &result {
            Ok(movies) => debug!(count = movies.len(), sort = sort_order.as_query_value(), "discover"),
            Err(e) => warn!(error = %e, "Discover request failed"),
        }
        result
    }

    /// Fetches one movie with its trailers and reviews.
    pub async fn movie_details(&self, id: MovieId) -> Result<MovieDetail, CatalogError> {
        let id_segment = id.to_string();
        let url = self.endpoint(
            &["movie", &id_segment],
            &[("append_to_response", tmdb::APPEND_TO_RESPONSE)],
        );

        let result = match self.get_text(url).await {
            Ok(body) => parse_details(&body, &self.posters),
            Err(e) => Err(e),
        };

        match &result {
            Ok(detail) => debug!(
                %id,
                trailers = detail.trailers.len(),
                reviews = detail.reviews.len(),
                "movie details"
            ),
            Err(e) => warn!(%id, error = %e, "Movie details request failed"),
        }
        result
    }

    /// Downloads a poster image verbatim.
    pub async fn fetch_poster(&self, poster_url: &str) -> Result<Vec<u8>, CatalogError> {
        let url = Url::parse(poster_url)?;
        let response = self.send(url).await?;
        let host = response.url().host_str().unwrap_or_default().to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::from_transport(&e, &host))?;
        Ok(bytes.to_vec())
    }

    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        // `with_shared_client` rejected cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url
    }

    async fn get_text(&self, url: Url) -> Result<String, CatalogError> {
        let response = self.send(url).await?;
        let host = response.url().host_str().unwrap_or_default().to_string();
        response
            .text()
            .await
            .map_err(|e| CatalogError::from_transport(&e, &host))
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response, CatalogError> {
        let host = url.host_str().unwrap_or_default().to_string();
        debug!(host = %host, path = url.path(), "catalog request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::from_transport(&e, &host))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::AuthenticationFailed);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISCOVER_BODY: &str = r#"{
        "page": 1,
        "results": [
            {
                "id": 76341,
                "original_title": "Mad Max: Fury Road",
                "poster_path": "/kqjL17yufvn9OVLyXYpvtyrFfak.jpg",
                "release_date": "2015-05-13",
                "vote_average": 7.4,
                "overview": "An apocalyptic story set in the furthest reaches of our planet."
            },
            {
                "id": 135397,
                "original_title": "Jurassic World",
                "poster_path": null,
                "release_date": "2015-06-09",
                "vote_average": 6.9,
                "overview": "Twenty-two years after the events of Jurassic Park."
            }
        ]
    }"#;

    const DETAILS_BODY: &str = r#"{
        "id": 76341,
        "original_title": "Mad Max: Fury Road",
        "poster_path": "/kqjL17yufvn9OVLyXYpvtyrFfak.jpg",
        "release_date": "2015-05-13",
        "runtime": 120,
        "vote_average": 7.4,
        "overview": "An apocalyptic story.",
        "videos": { "results": [
            { "id": "v1", "key": "hEJnMQG9ev8", "name": "Official Trailer", "site": "YouTube" },
            { "id": "v2", "key": "12345", "name": "Teaser", "site": "Vimeo" }
        ]},
        "reviews": { "results": [
            { "id": "r1", "author": "Phileas Fogg", "content": "Fabulous action movie." }
        ]}
    }"#;

    #[test]
    fn discover_builds_poster_urls() {
        let movies = parse_discover(DISCOVER_BODY, &PosterSource::default()).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, MovieId::new(76341));
        assert_eq!(
            movies[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w185/kqjL17yufvn9OVLyXYpvtyrFfak.jpg")
        );
        assert_eq!(movies[1].poster_url, None);
    }

    #[test]
    fn empty_listing_is_no_results() {
        let err = parse_discover(r#"{"results": []}"#, &PosterSource::default()).unwrap_err();
        assert!(matches!(err, CatalogError::NoResults));
    }

    #[test]
    fn missing_fields_are_parse_errors() {
        let err = parse_discover(r#"{"page": 1}"#, &PosterSource::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));

        let err = parse_details(r#"{"id": 1, "original_title": "x"}"#, &PosterSource::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn details_keep_only_youtube_trailers() {
        let detail = parse_details(DETAILS_BODY, &PosterSource::default()).unwrap();
        assert_eq!(detail.runtime, Some(120));
        assert_eq!(detail.trailers.len(), 1);
        assert_eq!(
            detail.trailers[0].url,
            "https://www.youtube.com/watch?v=hEJnMQG9ev8"
        );
        assert_eq!(detail.reviews.len(), 1);
        assert_eq!(detail.reviews[0].author, "Phileas Fogg");
    }

    #[test]
    fn poster_source_normalises_separators() {
        let posters = PosterSource::new("http://img.example/t/p", "/w342/");
        assert_eq!(posters.url_for("/a.jpg"), "http://img.example/t/p/w342/a.jpg");
    }

    #[test]
    fn endpoints_keep_base_path() {
        let config = CatalogConfig {
            api_key: "k".into(),
            ..CatalogConfig::default()
        };
        let client = TmdbClient::new(&config).unwrap();
        let url = client.endpoint(&["movie", "550"], &[("append_to_response", "videos,reviews")]);
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/550?api_key=k&append_to_response=videos%2Creviews"
        );
    }

    #[test]
    fn user_messages_by_kind() {
        assert!(
            CatalogError::UnknownHost("x".into())
                .user_message()
                .contains("internet connection")
        );
        assert!(CatalogError::AuthenticationFailed.user_message().contains("API key"));
        assert_eq!(
            CatalogError::Parse("x".into()).user_message(),
            CatalogError::Network("y".into()).user_message()
        );
    }
}
