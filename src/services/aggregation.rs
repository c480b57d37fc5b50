/// Aggregation engine
///
/// Walks every (category, provider) combination, pages through the catalog source,
/// enriches each title with its genres and IMDb rating, and folds the results into one
/// flat list of records. Everything is sequential: one outbound call finishes before
/// the next starts, with a pacing policy consulted after every item and page.
///
/// Failure handling is layered:
/// - an enrichment call that fails leaves its fields at "N/A"/absent/empty
/// - an item that cannot form a record (no id or title) is dropped
/// - a later page that fails to load is skipped
/// - a failed first page skips the whole combination
///
/// None of these abort the pass; `build` always returns whatever was collected.
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        ContentCategory, ContentRecord, DiscoverItem, DiscoverPage, ImdbRating, ProviderCatalog,
        ProviderEntry,
    },
    services::{
        pacing::{CallBoundary, PacingPolicy},
        sources::{CatalogSource, RatingSource},
    },
};

/// Progress callback: `(message, fraction_complete)` with the fraction in [0, 1]
pub type ProgressFn<'a> = dyn Fn(&str, f64) + Send + Sync + 'a;

/// One (category, provider) pair of an aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    pub category: ContentCategory,
    pub provider: ProviderEntry,
    /// Position in the pass, which is also the number of combinations already done
    pub index: usize,
}

/// Enumerates combinations category-major, in catalog order
pub fn combinations<'a>(
    categories: &'a [ContentCategory],
    catalog: &'a ProviderCatalog,
) -> impl Iterator<Item = Combination> + 'a {
    categories
        .iter()
        .flat_map(move |category| {
            catalog
                .providers()
                .iter()
                .map(move |provider| (*category, provider.clone()))
        })
        .enumerate()
        .map(|(index, (category, provider))| Combination {
            category,
            provider,
            index,
        })
}

/// A combination that produced nothing because its first page could not be loaded
#[derive(Debug, thiserror::Error)]
#[error("{category} on {provider}: {source}")]
pub struct CombinationError {
    pub category: ContentCategory,
    pub provider: String,
    #[source]
    pub source: AppError,
}

/// Records from one combination plus what was skipped along the way
#[derive(Debug, Default)]
pub struct CombinationOutcome {
    pub records: Vec<ContentRecord>,
    pub pages_processed: u32,
    pub pages_skipped: u32,
    pub items_skipped: usize,
}

/// Result of a full aggregation pass
#[derive(Debug, Default)]
pub struct AggregationReport {
    pub records: Vec<ContentRecord>,
    pub combinations_total: usize,
    pub combinations_failed: usize,
    pub pages_processed: u32,
    pub pages_skipped: u32,
    pub items_skipped: usize,
}

impl AggregationReport {
    /// True when there was work to do and every combination failed outright
    pub fn all_combinations_failed(&self) -> bool {
        self.combinations_total > 0 && self.combinations_failed == self.combinations_total
    }
}

#[derive(Clone)]
pub struct AggregationEngine {
    catalog_source: Arc<dyn CatalogSource>,
    rating_source: Arc<dyn RatingSource>,
    pacing: Arc<dyn PacingPolicy>,
}

impl AggregationEngine {
    pub fn new(
        catalog_source: Arc<dyn CatalogSource>,
        rating_source: Arc<dyn RatingSource>,
        pacing: Arc<dyn PacingPolicy>,
    ) -> Self {
        Self {
            catalog_source,
            rating_source,
            pacing,
        }
    }

    /// Builds the full record list; never fails
    pub async fn build(
        &self,
        categories: &[ContentCategory],
        catalog: &ProviderCatalog,
        max_pages: u32,
        progress: Option<&ProgressFn<'_>>,
    ) -> Vec<ContentRecord> {
        self.build_with_report(categories, catalog, max_pages, progress)
            .await
            .records
    }

    /// Builds the full record list along with per-combination bookkeeping
    pub async fn build_with_report(
        &self,
        categories: &[ContentCategory],
        catalog: &ProviderCatalog,
        max_pages: u32,
        progress: Option<&ProgressFn<'_>>,
    ) -> AggregationReport {
        let max_pages = if max_pages == 0 {
            tracing::warn!("max_pages must be at least 1, using 1");
            1
        } else {
            max_pages
        };

        let total = categories.len() * catalog.providers().len();
        let mut report = AggregationReport {
            combinations_total: total,
            ..Default::default()
        };

        tracing::info!(
            combinations = total,
            max_pages = max_pages,
            "Starting aggregation pass"
        );

        for combination in combinations(categories, catalog) {
            match self
                .aggregate_combination(&combination, max_pages, total, progress)
                .await
            {
                Ok(outcome) => {
                    tracing::info!(
                        category = %combination.category,
                        provider = %combination.provider.display_name,
                        records = outcome.records.len(),
                        pages = outcome.pages_processed,
                        items_skipped = outcome.items_skipped,
                        "Combination aggregated"
                    );
                    report.pages_processed += outcome.pages_processed;
                    report.pages_skipped += outcome.pages_skipped;
                    report.items_skipped += outcome.items_skipped;
                    report.records.extend(outcome.records);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Skipping combination");
                    report.combinations_failed += 1;
                }
            }
        }

        report_progress(progress, "Aggregation complete", 1.0);

        if report.combinations_failed > 0 || report.items_skipped > 0 {
            tracing::warn!(
                failed_combinations = report.combinations_failed,
                skipped_pages = report.pages_skipped,
                skipped_items = report.items_skipped,
                "Partial aggregation failure"
            );
        }

        tracing::info!(
            records = report.records.len(),
            combinations = total,
            "Aggregation pass finished"
        );

        report
    }

    async fn aggregate_combination(
        &self,
        combination: &Combination,
        max_pages: u32,
        total: usize,
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<CombinationOutcome, CombinationError> {
        let category = combination.category;
        let provider = &combination.provider;

        let first_page = self
            .catalog_source
            .discover(category, provider.provider_id, 1)
            .await
            .map_err(|source| CombinationError {
                category,
                provider: provider.display_name.clone(),
                source,
            })?;

        let pages = first_page.total_pages.clamp(1, max_pages);
        let fraction = combination.index as f64 / total as f64;
        let mut first_page = Some(first_page);
        let mut outcome = CombinationOutcome::default();

        for page in 1..=pages {
            report_progress(
                progress,
                &format!(
                    "Processing {} {} - page {}/{}",
                    provider.display_name,
                    category.plural(),
                    page,
                    pages
                ),
                fraction,
            );

            let page_data = match first_page.take() {
                Some(data) => data,
                None => match self.fetch_page(combination, page).await {
                    Ok(data) => data,
                    Err(e) => {
                        tracing::warn!(
                            category = %category,
                            provider = %provider.display_name,
                            page = page,
                            error = %e,
                            "Skipping page"
                        );
                        outcome.pages_skipped += 1;
                        self.pacing.wait_before_next_call(CallBoundary::Page).await;
                        continue;
                    }
                },
            };

            for item in page_data.results {
                match self.assemble_record(combination, item).await {
                    Ok(record) => outcome.records.push(record),
                    Err(e) => {
                        tracing::warn!(
                            category = %category,
                            provider = %provider.display_name,
                            page = page,
                            error = %e,
                            "Skipping item"
                        );
                        outcome.items_skipped += 1;
                    }
                }
                self.pacing.wait_before_next_call(CallBoundary::Item).await;
            }

            outcome.pages_processed += 1;
            self.pacing.wait_before_next_call(CallBoundary::Page).await;
        }

        Ok(outcome)
    }

    async fn fetch_page(&self, combination: &Combination, page: u32) -> AppResult<DiscoverPage> {
        self.catalog_source
            .discover(
                combination.category,
                combination.provider.provider_id,
                page,
            )
            .await
    }

    /// Turns one discover item into a record, degrading failed enrichment to placeholders
    async fn assemble_record(
        &self,
        combination: &Combination,
        item: DiscoverItem,
    ) -> AppResult<ContentRecord> {
        let category = combination.category;

        let tmdb_id = item
            .id
            .ok_or_else(|| AppError::ExternalApi("Discover item has no id".to_string()))?;

        let title = item
            .display_title(category)
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| {
                AppError::ExternalApi(format!("Discover item {} has no title", tmdb_id))
            })?
            .to_string();

        let genres = match self.catalog_source.fetch_details(category, tmdb_id).await {
            Ok(details) => details.genre_names(),
            Err(e) => {
                tracing::warn!(tmdb_id = tmdb_id, error = %e, "Details lookup failed");
                Vec::new()
            }
        };

        let imdb_id = match self
            .catalog_source
            .fetch_external_ids(category, tmdb_id)
            .await
        {
            Ok(ids) => ids.resolved_imdb_id().map(str::to_string),
            Err(e) => {
                tracing::warn!(tmdb_id = tmdb_id, error = %e, "External id lookup failed");
                None
            }
        };

        let rating = match &imdb_id {
            Some(imdb_id) => match self.rating_source.fetch_rating(imdb_id).await {
                Ok(rating) => rating,
                Err(e) => {
                    tracing::warn!(imdb_id = %imdb_id, error = %e, "Rating lookup failed");
                    ImdbRating::not_available()
                }
            },
            None => ImdbRating::not_available(),
        };

        Ok(ContentRecord {
            category,
            release_date: item.date_for(category).map(str::to_string),
            title,
            overview: non_blank(item.overview),
            tmdb_id,
            imdb_id,
            provider: combination.provider.display_name.clone(),
            tmdb_rating: item.vote_average,
            popularity: item.popularity,
            poster_path: non_blank(item.poster_path),
            genres,
            imdb_rating: rating.rating,
            imdb_votes: rating.votes,
        })
    }
}

/// Blank text cannot survive a CSV round trip, so it is stored as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn report_progress(progress: Option<&ProgressFn<'_>>, message: &str, fraction: f64) {
    if let Some(callback) = progress {
        callback(message, fraction.clamp(0.0, 1.0));
    }
}
