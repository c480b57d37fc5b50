/// Catalog data source abstraction
///
/// An aggregation pass talks to two external APIs: a primary catalog that lists what
/// each provider streams (TMDB), and an enrichment source keyed by IMDb id (OMDb).
/// Both are plain request/response wrappers; pacing and failure handling live in the
/// aggregation engine.
use crate::{
    error::{AppError, AppResult},
    models::{ContentCategory, ContentDetails, DiscoverPage, ExternalIds, ImdbRating},
};

pub mod omdb;
pub mod tmdb;

pub use omdb::OmdbClient;
pub use tmdb::TmdbClient;

/// Primary catalog source
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// List one page of titles a provider streams in the given category
    async fn discover(
        &self,
        category: ContentCategory,
        provider_id: u32,
        page: u32,
    ) -> AppResult<DiscoverPage>;

    /// Fetch title details (genres and friends)
    async fn fetch_details(&self, category: ContentCategory, id: u64) -> AppResult<ContentDetails>;

    /// Fetch cross-reference ids for a title
    async fn fetch_external_ids(&self, category: ContentCategory, id: u64)
        -> AppResult<ExternalIds>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Rating enrichment source
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingSource: Send + Sync {
    /// Fetch rating and vote count for an IMDb id
    ///
    /// Callers only invoke this with a resolved, non-empty id.
    async fn fetch_rating(&self, imdb_id: &str) -> AppResult<ImdbRating>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Turns a non-2xx response into an `ExternalApi` error, keeping the body for context
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    source: &str,
) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::ExternalApi(format!(
        "{} API returned status {}: {}",
        source, status, body
    )))
}
