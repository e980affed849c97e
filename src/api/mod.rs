//! Metadata service clients
//!
//! - `MetadataClient`: the two lookups a search session needs
//! - OMDb: the production implementation

pub mod error;
pub mod omdb;

use async_trait::async_trait;

use crate::models::{DetailRecord, SearchPage};

pub use error::{LookupError, TransportKind};
pub use omdb::OmdbClient;

/// Remote title lookups consumed by [`crate::session::SearchSession`].
///
/// Implementations own timeouts and authentication. Both calls are
/// idempotent reads.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Search titles matching `title` (first page only)
    async fn search(&self, title: &str) -> Result<SearchPage, LookupError>;

    /// Fetch the full record for an IMDb id
    async fn get_details(&self, imdb_id: &str) -> Result<DetailRecord, LookupError>;
}
