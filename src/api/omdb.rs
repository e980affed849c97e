//! OMDb (Open Movie Database) API client
//!
//! Title search and per-title details.
//! API docs: https://www.omdbapi.com/

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{LookupError, MetadataClient};
use crate::models::{available, DetailRecord, MediaType, SearchPage, SearchResultItem};

/// Public OMDb endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Key bundled with the application
pub const DEFAULT_API_KEY: &str = "357576b4";

/// Connect/read timeout applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote message used when a negative answer carries no `Error` text
const FALLBACK_REJECTION: &str = "Movie not found!";

/// OMDb API client
pub struct OmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OmdbClient {
    /// Create a new OMDb client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_config(api_key, base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with every knob set explicitly
    pub fn with_config(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .connect_timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one GET with the API key attached and decode the OMDb envelope
    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, LookupError> {
        let mut url = format!(
            "{}/?apikey={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        debug!(?params, "omdb request");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // OMDb signals failure in the body, sometimes alongside a 4xx status
        let envelope: Envelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(LookupError::Unexpected(format!(
                    "Invalid response: JSON parse error: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(LookupError::Unexpected(format!(
                    "HTTP {} from metadata service",
                    status.as_u16()
                )));
            }
        };

        if !envelope.is_success() {
            let message = envelope
                .error
                .unwrap_or_else(|| FALLBACK_REJECTION.to_string());
            warn!(status = status.as_u16(), %message, "omdb rejected request");
            return Err(LookupError::Rejected(message));
        }

        serde_json::from_str(&body).map_err(|e| {
            LookupError::Unexpected(format!("Invalid response: JSON parse error: {}", e))
        })
    }

    /// Search titles (first page)
    pub async fn search(&self, title: &str) -> Result<SearchPage, LookupError> {
        let response: SearchResponse = self.get(&[("s", title), ("page", "1")]).await?;
        Ok(response.into_page())
    }

    /// Get the full record for an IMDb id
    pub async fn get_details(&self, imdb_id: &str) -> Result<DetailRecord, LookupError> {
        let response: DetailResponse = self.get(&[("i", imdb_id)]).await?;
        Ok(response.into_detail())
    }
}

impl Default for OmdbClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY)
    }
}

#[async_trait]
impl MetadataClient for OmdbClient {
    async fn search(&self, title: &str) -> Result<SearchPage, LookupError> {
        OmdbClient::search(self, title).await
    }

    async fn get_details(&self, imdb_id: &str) -> Result<DetailRecord, LookupError> {
        OmdbClient::get_details(self, imdb_id).await
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl Envelope {
    fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Search")]
    search: Option<Vec<SearchItemRaw>>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

impl SearchResponse {
    fn into_page(self) -> SearchPage {
        SearchPage {
            items: self
                .search
                .unwrap_or_default()
                .into_iter()
                .map(SearchItemRaw::into_item)
                .collect(),
            total_results: self.total_results.and_then(|t| t.trim().parse().ok()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchItemRaw {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
}

impl SearchItemRaw {
    fn into_item(self) -> SearchResultItem {
        SearchResultItem {
            title: self.title,
            year: self.year,
            imdb_id: self.imdb_id,
            poster: available(self.poster),
            media_type: self.kind.as_deref().and_then(MediaType::from_omdb),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetailResponse {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    title: Option<String>,
    year: Option<String>,
    rated: Option<String>,
    released: Option<String>,
    runtime: Option<String>,
    genre: Option<String>,
    director: Option<String>,
    writer: Option<String>,
    actors: Option<String>,
    plot: Option<String>,
    language: Option<String>,
    country: Option<String>,
    awards: Option<String>,
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
}

impl DetailResponse {
    fn into_detail(self) -> DetailRecord {
        DetailRecord {
            imdb_id: self.imdb_id,
            title: available(self.title),
            year: available(self.year),
            rated: available(self.rated),
            released: available(self.released),
            runtime: available(self.runtime),
            genre: available(self.genre),
            director: available(self.director),
            writer: available(self.writer),
            actors: available(self.actors),
            plot: available(self.plot),
            language: available(self.language),
            country: available(self.country),
            awards: available(self.awards),
            poster: available(self.poster),
            imdb_rating: available(self.imdb_rating),
        }
    }
}
