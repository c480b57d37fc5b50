#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stream_catalog::{
    error::{AppError, AppResult},
    models::{
        ContentCategory, ContentDetails, DiscoverItem, DiscoverPage, ExternalIds, Genre,
        ImdbRating, ProviderCatalog, ProviderEntry,
    },
    services::{
        sources::{CatalogSource, RatingSource},
        Credentials, NoPacing, SnapshotService, SnapshotStore, SourceFactory,
    },
};

/// Catalog source serving `items_per_page` synthetic titles on every page
pub struct FakeCatalog {
    pub total_pages: u32,
    pub items_per_page: u64,
    pub fail_discover: bool,
    pub discover_calls: AtomicUsize,
    pub other_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new(total_pages: u32, items_per_page: u64) -> Self {
        Self {
            total_pages,
            items_per_page,
            fail_discover: false,
            discover_calls: AtomicUsize::new(0),
            other_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_discover: true,
            ..Self::new(1, 0)
        }
    }

    pub fn total_calls(&self) -> usize {
        self.discover_calls.load(Ordering::SeqCst) + self.other_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CatalogSource for FakeCatalog {
    async fn discover(
        &self,
        _category: ContentCategory,
        provider_id: u32,
        page: u32,
    ) -> AppResult<DiscoverPage> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_discover {
            return Err(AppError::ExternalApi(
                "tmdb API returned status 401 Unauthorized".to_string(),
            ));
        }

        let results = (0..self.items_per_page)
            .map(|n| {
                let id = provider_id as u64 * 100_000 + page as u64 * 100 + n;
                DiscoverItem {
                    id: Some(id),
                    title: Some(format!("Movie {}", id)),
                    name: Some(format!("Show {}", id)),
                    overview: Some("Synthetic title".to_string()),
                    release_date: Some("2020-01-01".to_string()),
                    first_air_date: Some("2019-09-01".to_string()),
                    vote_average: Some(7.0),
                    popularity: Some(12.5),
                    poster_path: None,
                }
            })
            .collect();

        Ok(DiscoverPage {
            results,
            total_pages: self.total_pages,
        })
    }

    async fn fetch_details(
        &self,
        _category: ContentCategory,
        _id: u64,
    ) -> AppResult<ContentDetails> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ContentDetails {
            genres: vec![Genre {
                id: 18,
                name: "Drama".to_string(),
            }],
        })
    }

    async fn fetch_external_ids(
        &self,
        _category: ContentCategory,
        id: u64,
    ) -> AppResult<ExternalIds> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ExternalIds {
            imdb_id: Some(format!("tt{:07}", id)),
        })
    }

    fn name(&self) -> &'static str {
        "fake-catalog"
    }
}

pub struct FakeRatings {
    pub calls: AtomicUsize,
}

#[async_trait::async_trait]
impl RatingSource for FakeRatings {
    async fn fetch_rating(&self, _imdb_id: &str) -> AppResult<ImdbRating> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ImdbRating {
            rating: "7.5".to_string(),
            votes: "1,234".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "fake-ratings"
    }
}

/// Hands out the same fakes for every credential set, counting how often it was asked
pub struct FakeFactory {
    pub catalog: Arc<FakeCatalog>,
    pub ratings: Arc<FakeRatings>,
    pub created: AtomicUsize,
}

impl FakeFactory {
    pub fn new(catalog: FakeCatalog) -> Arc<Self> {
        Arc::new(Self {
            catalog: Arc::new(catalog),
            ratings: Arc::new(FakeRatings {
                calls: AtomicUsize::new(0),
            }),
            created: AtomicUsize::new(0),
        })
    }

    pub fn outbound_calls(&self) -> usize {
        self.catalog.total_calls() + self.ratings.calls.load(Ordering::SeqCst)
    }
}

impl SourceFactory for FakeFactory {
    fn catalog_source(&self, _credentials: &Credentials) -> Arc<dyn CatalogSource> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.catalog.clone()
    }

    fn rating_source(&self, _credentials: &Credentials) -> Arc<dyn RatingSource> {
        self.ratings.clone()
    }
}

pub fn single_combination_catalog() -> ProviderCatalog {
    ProviderCatalog::new(
        vec![ProviderEntry::new(8, "Netflix")],
        vec![ContentCategory::Movie],
    )
    .unwrap()
}

pub fn service(
    store: SnapshotStore,
    factory: Arc<FakeFactory>,
    catalog: ProviderCatalog,
) -> SnapshotService {
    SnapshotService::new(store, factory, Arc::new(NoPacing), catalog)
}

pub fn valid_credentials() -> Credentials {
    Credentials::new("tmdb-key", "omdb-key")
}
