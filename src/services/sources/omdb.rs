/// OMDb API client
///
/// Enrichment source: resolves IMDb rating and vote count by IMDb id.
use crate::{
    error::{AppError, AppResult},
    models::{ImdbRating, OmdbTitle},
    services::sources::{ensure_success, RatingSource},
};
use reqwest::Client as HttpClient;

const SOURCE_NAME: &str = "omdb";

#[derive(Clone)]
pub struct OmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbClient {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl RatingSource for OmdbClient {
    async fn fetch_rating(&self, imdb_id: &str) -> AppResult<ImdbRating> {
        if imdb_id.trim().is_empty() {
            return Err(AppError::Configuration(
                "IMDb id cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("i", imdb_id), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let response = ensure_success(response, SOURCE_NAME).await?;
        let title: OmdbTitle = response.json().await?;

        if let Some(error) = &title.error {
            // OMDb answers 200 with Response=False for unknown ids
            tracing::debug!(imdb_id = %imdb_id, error = %error, "OMDb lookup returned no match");
        }

        Ok(ImdbRating::from(title))
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}
