/// TMDB API client
///
/// Primary catalog source. Lists titles per watch provider and resolves each title's
/// genres and IMDb id.
///
/// API Flow:
/// 1. Discover: /discover/{movie|tv}?with_watch_providers=… → page of titles
/// 2. Details: /{movie|tv}/{id} → genres
/// 3. External ids: /{movie|tv}/{id}/external_ids → IMDb id
use crate::{
    error::{AppError, AppResult},
    models::{ContentCategory, ContentDetails, DiscoverPage, ExternalIds},
    services::sources::{ensure_success, CatalogSource},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const SOURCE_NAME: &str = "tmdb";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    region: String,
}

impl TmdbClient {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String, region: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            region,
        }
    }

    fn discover_url(&self, category: ContentCategory) -> String {
        format!("{}/discover/{}", self.api_url, category.api_path())
    }

    fn details_url(&self, category: ContentCategory, id: u64) -> String {
        format!("{}/{}/{}", self.api_url, category.api_path(), id)
    }

    fn external_ids_url(&self, category: ContentCategory, id: u64) -> String {
        format!("{}/external_ids", self.details_url(category, id))
    }

    /// GET with the API key attached, decoding the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let response = ensure_success(response, SOURCE_NAME).await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(error = %e, url = %url, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogSource for TmdbClient {
    async fn discover(
        &self,
        category: ContentCategory,
        provider_id: u32,
        page: u32,
    ) -> AppResult<DiscoverPage> {
        if page == 0 {
            return Err(AppError::Configuration(
                "Discover pages start at 1".to_string(),
            ));
        }

        let url = self.discover_url(category);
        let page_data: DiscoverPage = self
            .get_json(
                &url,
                &[
                    ("with_watch_providers", provider_id.to_string()),
                    ("watch_region", self.region.clone()),
                    ("page", page.to_string()),
                ],
            )
            .await?;

        tracing::debug!(
            category = %category,
            provider_id = provider_id,
            page = page,
            results = page_data.results.len(),
            total_pages = page_data.total_pages,
            source = SOURCE_NAME,
            "Discover page fetched"
        );

        Ok(page_data)
    }

    async fn fetch_details(&self, category: ContentCategory, id: u64) -> AppResult<ContentDetails> {
        self.get_json(&self.details_url(category, id), &[]).await
    }

    async fn fetch_external_ids(
        &self,
        category: ContentCategory,
        id: u64,
    ) -> AppResult<ExternalIds> {
        self.get_json(&self.external_ids_url(category, id), &[])
            .await
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> TmdbClient {
        TmdbClient::new(
            reqwest::Client::new(),
            "test_key".to_string(),
            "http://test.local/3/".to_string(),
            "US".to_string(),
        )
    }

    #[test]
    fn test_discover_url_per_category() {
        let client = create_test_client();
        assert_eq!(
            client.discover_url(ContentCategory::Movie),
            "http://test.local/3/discover/movie"
        );
        assert_eq!(
            client.discover_url(ContentCategory::TvShow),
            "http://test.local/3/discover/tv"
        );
    }

    #[test]
    fn test_details_and_external_ids_urls() {
        let client = create_test_client();
        assert_eq!(
            client.details_url(ContentCategory::TvShow, 1396),
            "http://test.local/3/tv/1396"
        );
        assert_eq!(
            client.external_ids_url(ContentCategory::Movie, 27205),
            "http://test.local/3/movie/27205/external_ids"
        );
    }

    #[tokio::test]
    async fn test_discover_rejects_page_zero() {
        let client = create_test_client();
        let result = client.discover(ContentCategory::Movie, 8, 0).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = TmdbClient::new(
            reqwest::Client::new(),
            "test_key".to_string(),
            "http://127.0.0.1:9".to_string(),
            "US".to_string(),
        );

        let err = client
            .fetch_details(ContentCategory::Movie, 27205)
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
