//! Catalog client against a local fake of the TMDb endpoints.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use popmovies::clients::{CatalogError, TmdbClient};
use popmovies::config::CatalogConfig;
use popmovies::domain::{MovieId, SortOrder};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;

const API_KEY: &str = "test-key";
const POSTER_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";

async fn discover(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("api_key").map(String::as_str) != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, "bad key").into_response();
    }
    let title = match params.get("sort_by").map(String::as_str) {
        Some("vote_average.desc") => "The Shawshank Redemption",
        _ => "Mad Max: Fury Road",
    };
    Json(json!({
        "page": 1,
        "results": [
            {
                "id": 76341,
                "original_title": title,
                "poster_path": "/kqjL17yufvn9OVLyXYpvtyrFfak.jpg",
                "release_date": "2015-05-13",
                "vote_average": 7.4,
                "overview": "An apocalyptic story set in the furthest reaches of our planet."
            },
            {
                "id": 550,
                "original_title": "Fight Club",
                "poster_path": null,
                "release_date": "1999-10-15",
                "vote_average": 8.4,
                "overview": "A ticking-time-bomb insomniac."
            }
        ]
    }))
    .into_response()
}

async fn details(Path(id): Path<i64>, Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("append_to_response").map(String::as_str) != Some("videos,reviews") {
        return (StatusCode::BAD_REQUEST, "missing append_to_response").into_response();
    }
    match id {
        76341 => Json(json!({
            "id": 76341,
            "original_title": "Mad Max: Fury Road",
            "poster_path": "/kqjL17yufvn9OVLyXYpvtyrFfak.jpg",
            "release_date": "2015-05-13",
            "runtime": 121,
            "vote_average": 7.4,
            "overview": "An apocalyptic story.",
            "videos": { "results": [
                { "id": "v1", "key": "hEJnMQG9ev8", "name": "Official Trailer", "site": "YouTube" },
                { "id": "v2", "key": "123", "name": "Elsewhere", "site": "Vimeo" }
            ]},
            "reviews": { "results": [
                { "id": "r1", "author": "Zylo", "content": "Loud and glorious." }
            ]}
        }))
        .into_response(),
        500 => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => (StatusCode::OK, "{ not json").into_response(),
    }
}

async fn empty_discover() -> Json<serde_json::Value> {
    Json(json!({ "page": 1, "results": [] }))
}

async fn poster() -> Vec<u8> {
    POSTER_BYTES.to_vec()
}

async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn catalog_config(addr: SocketAddr, api_key: &str) -> CatalogConfig {
    CatalogConfig {
        base_url: format!("http://{addr}/3"),
        image_base_url: format!("http://{addr}/t/p"),
        api_key: api_key.to_string(),
        request_timeout_seconds: 5,
        ..CatalogConfig::default()
    }
}

async fn fake_catalog() -> SocketAddr {
    let router = Router::new()
        .route("/3/discover/movie", get(discover))
        .route("/3/movie/{id}", get(details))
        .route("/t/p/w185/poster.jpg", get(poster));
    spawn_server(router).await
}

#[tokio::test]
async fn discover_lists_movies_with_poster_urls() {
    let addr = fake_catalog().await;
    let client = TmdbClient::new(&catalog_config(addr, API_KEY)).unwrap();

    let movies = client.discover(SortOrder::Popular).await.unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].id, MovieId::new(76341));
    assert_eq!(movies[0].original_title, "Mad Max: Fury Road");
    assert_eq!(
        movies[0].poster_url.as_deref(),
        Some(format!("http://{addr}/t/p/w185/kqjL17yufvn9OVLyXYpvtyrFfak.jpg").as_str())
    );
    assert_eq!(movies[1].poster_url, None);

    let top = client.discover(SortOrder::TopRated).await.unwrap();
    assert_eq!(top[0].original_title, "The Shawshank Redemption");
}

#[tokio::test]
async fn details_keep_only_youtube_trailers() {
    let addr = fake_catalog().await;
    let client = TmdbClient::new(&catalog_config(addr, API_KEY)).unwrap();

    let detail = client.movie_details(MovieId::new(76341)).await.unwrap();
    assert_eq!(detail.runtime, Some(121));
    assert_eq!(detail.trailers.len(), 1);
    assert_eq!(detail.trailers[0].name, "Official Trailer");
    assert_eq!(
        detail.trailers[0].url,
        "https://www.youtube.com/watch?v=hEJnMQG9ev8"
    );
    assert_eq!(detail.reviews.len(), 1);
    assert_eq!(detail.reviews[0].author, "Zylo");
}

#[tokio::test]
async fn wrong_key_is_authentication_failure() {
    let addr = fake_catalog().await;
    let client = TmdbClient::new(&catalog_config(addr, "wrong")).unwrap();

    let err = client.discover(SortOrder::Popular).await.unwrap_err();
    assert!(matches!(err, CatalogError::AuthenticationFailed));
}

#[tokio::test]
async fn server_errors_carry_status_and_body() {
    let addr = fake_catalog().await;
    let client = TmdbClient::new(&catalog_config(addr, API_KEY)).unwrap();

    match client.movie_details(MovieId::new(500)).await.unwrap_err() {
        CatalogError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let addr = fake_catalog().await;
    let client = TmdbClient::new(&catalog_config(addr, API_KEY)).unwrap();

    let err = client.movie_details(MovieId::new(1)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[tokio::test]
async fn empty_listing_is_no_results() {
    let router = Router::new().route("/3/discover/movie", get(empty_discover));
    let addr = spawn_server(router).await;
    let client = TmdbClient::new(&catalog_config(addr, API_KEY)).unwrap();

    let err = client.discover(SortOrder::Popular).await.unwrap_err();
    assert!(matches!(err, CatalogError::NoResults));
}

#[tokio::test]
async fn unreachable_host_is_reported_as_unknown_host() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TmdbClient::new(&catalog_config(addr, API_KEY)).unwrap();
    let err = client.discover(SortOrder::Popular).await.unwrap_err();
    assert!(matches!(err, CatalogError::UnknownHost(ref host) if host == "127.0.0.1"));
    assert_ne!(err.user_message(), CatalogError::AuthenticationFailed.user_message());
}

#[tokio::test]
async fn poster_bytes_are_returned_verbatim() {
    let addr = fake_catalog().await;
    let client = TmdbClient::new(&catalog_config(addr, API_KEY)).unwrap();

    let url = client.posters().url_for("/poster.jpg");
    assert_eq!(url, format!("http://{addr}/t/p/w185/poster.jpg"));
    let bytes = client.fetch_poster(&url).await.unwrap();
    assert_eq!(bytes, POSTER_BYTES);
}
