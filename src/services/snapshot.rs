/// Snapshot service
///
/// Decides per request whether the latest snapshot on disk can be handed back as-is
/// or a fresh aggregation pass has to run:
///
/// CheckExisting → Reuse  → Ready   (not forced, latest snapshot loads)
/// CheckExisting → Rebuild → Ready  (forced, nothing on disk, or load failed)
///
/// Credentials are threaded through each request; nothing here outlives a call.
use std::fmt;
use std::sync::Arc;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ProviderCatalog, Snapshot, SnapshotOrigin},
    services::{
        aggregation::{AggregationEngine, ProgressFn},
        pacing::{FixedDelayPacing, PacingPolicy},
        snapshot_store::SnapshotStore,
        sources::{CatalogSource, OmdbClient, RatingSource, TmdbClient},
    },
};

/// API keys for the two external sources
#[derive(Clone, Default)]
pub struct Credentials {
    pub tmdb_api_key: String,
    pub omdb_api_key: String,
}

impl Credentials {
    pub fn new(tmdb_api_key: impl Into<String>, omdb_api_key: impl Into<String>) -> Self {
        Self {
            tmdb_api_key: tmdb_api_key.into(),
            omdb_api_key: omdb_api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tmdb_api_key.clone(), config.omdb_api_key.clone())
    }

    /// Both keys must be non-blank before any outbound call is made
    pub fn ensure_present(&self) -> AppResult<()> {
        if self.tmdb_api_key.trim().is_empty() {
            return Err(AppError::Credential("TMDB API key is empty".to_string()));
        }
        if self.omdb_api_key.trim().is_empty() {
            return Err(AppError::Credential("OMDb API key is empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tmdb_api_key", &redact(&self.tmdb_api_key))
            .field("omdb_api_key", &redact(&self.omdb_api_key))
            .finish()
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// Parameters of one load-or-build request
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub credentials: Credentials,
    pub force_refresh: bool,
    pub max_pages: u32,
}

/// Builds source clients for a set of credentials
pub trait SourceFactory: Send + Sync {
    fn catalog_source(&self, credentials: &Credentials) -> Arc<dyn CatalogSource>;

    fn rating_source(&self, credentials: &Credentials) -> Arc<dyn RatingSource>;
}

/// Factory for the real TMDB and OMDb clients, sharing one HTTP connection pool
#[derive(Clone)]
pub struct HttpSourceFactory {
    http_client: HttpClient,
    tmdb_api_url: String,
    omdb_api_url: String,
    region: String,
}

impl HttpSourceFactory {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http_client: HttpClient::new(),
            tmdb_api_url: config.tmdb_api_url.clone(),
            omdb_api_url: config.omdb_api_url.clone(),
            region: config.watch_region.clone(),
        }
    }
}

impl SourceFactory for HttpSourceFactory {
    fn catalog_source(&self, credentials: &Credentials) -> Arc<dyn CatalogSource> {
        Arc::new(TmdbClient::new(
            self.http_client.clone(),
            credentials.tmdb_api_key.clone(),
            self.tmdb_api_url.clone(),
            self.region.clone(),
        ))
    }

    fn rating_source(&self, credentials: &Credentials) -> Arc<dyn RatingSource> {
        Arc::new(OmdbClient::new(
            self.http_client.clone(),
            credentials.omdb_api_key.clone(),
            self.omdb_api_url.clone(),
        ))
    }
}

pub struct SnapshotService {
    store: SnapshotStore,
    sources: Arc<dyn SourceFactory>,
    pacing: Arc<dyn PacingPolicy>,
    catalog: ProviderCatalog,
}

impl SnapshotService {
    pub fn new(
        store: SnapshotStore,
        sources: Arc<dyn SourceFactory>,
        pacing: Arc<dyn PacingPolicy>,
        catalog: ProviderCatalog,
    ) -> Self {
        Self {
            store,
            sources,
            pacing,
            catalog,
        }
    }

    /// Service wired to the real HTTP sources, fixed-delay pacing and the default catalog
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            SnapshotStore::new(config.snapshot_dir.clone()),
            Arc::new(HttpSourceFactory::from_config(config)),
            Arc::new(FixedDelayPacing::new(
                config.item_delay(),
                config.page_delay(),
            )),
            ProviderCatalog::default(),
        )
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Returns the latest snapshot, or builds and writes a new one
    pub async fn load_or_build(
        &self,
        request: &BuildRequest,
        progress: Option<&ProgressFn<'_>>,
    ) -> AppResult<(Snapshot, SnapshotOrigin)> {
        if !request.force_refresh {
            if let Some(snapshot) = self.check_existing() {
                tracing::info!(
                    filename = %snapshot.filename,
                    records = snapshot.len(),
                    "Reusing existing snapshot"
                );
                return Ok((snapshot, SnapshotOrigin::Reused));
            }
        }

        let snapshot = self.rebuild(request, progress).await?;
        Ok((snapshot, SnapshotOrigin::Rebuilt))
    }

    /// Latest snapshot that loads cleanly; any failure means "rebuild"
    fn check_existing(&self) -> Option<Snapshot> {
        let latest = match self.store.find_latest() {
            Ok(Some(filename)) => filename,
            Ok(None) => {
                tracing::info!(dir = %self.store.dir().display(), "No existing snapshot");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list snapshots");
                return None;
            }
        };

        match self.store.load(&latest) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(
                    filename = %latest,
                    error = %e,
                    "Existing snapshot unusable, rebuilding"
                );
                None
            }
        }
    }

    async fn rebuild(
        &self,
        request: &BuildRequest,
        progress: Option<&ProgressFn<'_>>,
    ) -> AppResult<Snapshot> {
        request.credentials.ensure_present()?;

        if request.max_pages == 0 {
            return Err(AppError::Configuration(
                "max_pages must be at least 1".to_string(),
            ));
        }

        let catalog_source = self.sources.catalog_source(&request.credentials);
        let rating_source = self.sources.rating_source(&request.credentials);

        tracing::info!(
            catalog_source = catalog_source.name(),
            rating_source = rating_source.name(),
            max_pages = request.max_pages,
            force_refresh = request.force_refresh,
            "Rebuilding snapshot"
        );

        let engine = AggregationEngine::new(catalog_source, rating_source, self.pacing.clone());
        let report = engine
            .build_with_report(
                self.catalog.categories(),
                &self.catalog,
                request.max_pages,
                progress,
            )
            .await;

        if report.all_combinations_failed() {
            return Err(AppError::Rebuild(format!(
                "All {} provider/category combinations failed; check the API keys",
                report.combinations_total
            )));
        }

        let filename = self.store.write(&report.records)?;

        Ok(Snapshot {
            filename,
            records: report.records,
        })
    }
}
