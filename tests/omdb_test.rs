//! OMDb API client tests
//!
//! Tests search, detail retrieval, and error classification against a
//! mock server.

use mockito::{Matcher, Server};
use moviefinder::api::{LookupError, MetadataClient, OmdbClient, TransportKind};
use moviefinder::models::MediaType;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

const SEARCH_BODY: &str = r#"{
    "Search": [
        {
            "Title": "Blade Runner",
            "Year": "1982",
            "imdbID": "tt0083658",
            "Type": "movie",
            "Poster": "https://m.media-amazon.com/images/M/blade.jpg"
        },
        {
            "Title": "Blade Runner 2049",
            "Year": "2017",
            "imdbID": "tt1856101",
            "Type": "movie",
            "Poster": "N/A"
        },
        {
            "Title": "Blade Runner: Black Lotus",
            "Year": "2021–2022",
            "imdbID": "tt10627720",
            "Type": "series",
            "Poster": "N/A"
        }
    ],
    "totalResults": "47",
    "Response": "True"
}"#;

const DETAIL_BODY: &str = r#"{
    "Title": "Blade Runner",
    "Year": "1982",
    "Rated": "R",
    "Released": "25 Jun 1982",
    "Runtime": "117 min",
    "Genre": "Action, Drama, Sci-Fi",
    "Director": "Ridley Scott",
    "Writer": "Hampton Fancher, David Webb Peoples, Philip K. Dick",
    "Actors": "Harrison Ford, Rutger Hauer, Sean Young",
    "Plot": "A blade runner must pursue and terminate four replicants.",
    "Language": "English, German, Cantonese, Japanese, Hungarian, Arabic, Korean",
    "Country": "United States",
    "Awards": "N/A",
    "Poster": "https://m.media-amazon.com/images/M/blade.jpg",
    "imdbRating": "8.1",
    "imdbID": "tt0083658",
    "Type": "movie",
    "Response": "True"
}"#;

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_parses_results() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test_key".into()),
            Matcher::UrlEncoded("s".into(), "blade runner".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SEARCH_BODY)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let page = client.search("blade runner").await.unwrap();

    mock.assert_async().await;

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_results, Some(47));

    assert_eq!(page.items[0].title, "Blade Runner");
    assert_eq!(page.items[0].imdb_id, "tt0083658");
    assert_eq!(page.items[0].media_type, Some(MediaType::Movie));
    assert!(page.items[0].poster.is_some());

    // "N/A" posters are dropped
    assert_eq!(page.items[1].poster, None);

    // Series keep their year range verbatim
    assert_eq!(page.items[2].year, "2021–2022");
    assert_eq!(page.items[2].media_type, Some(MediaType::Series));
}

#[tokio::test]
async fn test_search_encodes_special_characters() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("s".into(), "amélie & co".into()))
        .with_status(200)
        .with_body(r#"{"Search":[],"totalResults":"0","Response":"True"}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let page = assert_ok!(client.search("amélie & co").await);

    mock.assert_async().await;
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_search_tolerates_missing_list() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Search":null,"Response":"True"}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let page = client.search("nothing").await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total_results, None);
}

#[tokio::test]
async fn test_search_not_found_is_rejection() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Response":"False","Error":"Movie not found!"}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let err = assert_err!(client.search("zzqxy").await);

    assert_eq!(err, LookupError::Rejected("Movie not found!".into()));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_search_rejection_without_message() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Response":"False"}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let err = client.search("zzqxy").await.unwrap_err();

    assert!(matches!(err, LookupError::Rejected(_)));
}

// =============================================================================
// Detail Tests
// =============================================================================

#[tokio::test]
async fn test_get_details_parses_record() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test_key".into()),
            Matcher::UrlEncoded("i".into(), "tt0083658".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DETAIL_BODY)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let detail = client.get_details("tt0083658").await.unwrap();

    mock.assert_async().await;

    assert_eq!(detail.imdb_id, "tt0083658");
    assert_eq!(detail.title.as_deref(), Some("Blade Runner"));
    assert_eq!(detail.director.as_deref(), Some("Ridley Scott"));
    assert_eq!(detail.runtime.as_deref(), Some("117 min"));
    assert_eq!(detail.imdb_rating.as_deref(), Some("8.1"));
    assert_eq!(detail.awards, None);
    assert_eq!(detail.to_string(), "Blade Runner (1982) - ⭐ 8.1");
}

#[tokio::test]
async fn test_get_details_unknown_id() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let err = client.get_details("tt0000000").await.unwrap_err();

    assert_eq!(err, LookupError::Rejected("Incorrect IMDb ID.".into()));
}

#[tokio::test]
async fn test_concurrent_detail_requests() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(DETAIL_BODY)
        .expect(3)
        .create_async()
        .await;

    let client: Arc<dyn MetadataClient> =
        Arc::new(OmdbClient::with_base_url("test_key", server.url()));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.get_details("tt0083658").await })
        })
        .collect();

    let results: Vec<_> = futures::future::join_all(handles).await;
    for result in results {
        let detail = result.unwrap().unwrap();
        assert_eq!(detail.imdb_id, "tt0083658");
    }
}

// =============================================================================
// Error Classification Tests
// =============================================================================

#[tokio::test]
async fn test_invalid_api_key() {
    let mut server = Server::new_async().await;

    // OMDb answers a bad key with 401 and a normal envelope
    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"Response":"False","Error":"Invalid API key!"}"#)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("bad_key", server.url());
    let err = client.search("alien").await.unwrap_err();

    assert_eq!(err, LookupError::Rejected("Invalid API key!".into()));
}

#[tokio::test]
async fn test_invalid_json_is_unexpected() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let err = client.search("alien").await.unwrap_err();

    match err {
        LookupError::Unexpected(msg) => assert!(msg.starts_with("Invalid response")),
        other => panic!("expected Unexpected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_page_is_unexpected() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("<html>Service Unavailable</html>")
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", server.url());
    let err = client.get_details("tt0083658").await.unwrap_err();

    assert_eq!(
        err,
        LookupError::Unexpected("HTTP 503 from metadata service".into())
    );
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_unreachable_host_is_transport() {
    // Nothing listens on port 1
    let client = OmdbClient::with_base_url("test_key", "http://127.0.0.1:1");
    let err = client.search("alien").await.unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {:?}", err);
    assert!(matches!(
        err,
        LookupError::Transport {
            kind: TransportKind::Unreachable,
            ..
        }
    ));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(SEARCH_BODY)
        .create_async()
        .await;

    let client = OmdbClient::with_base_url("test_key", format!("{}/", server.url()));
    assert_ok!(client.search("blade runner").await);

    mock.assert_async().await;
}
