use serde::{Deserialize, Serialize};

pub mod content;
pub mod provider_catalog;

pub use content::{ContentCategory, ContentRecord, NOT_AVAILABLE};
pub use provider_catalog::{ProviderCatalog, ProviderEntry};

/// A persisted aggregation result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub filename: String,
    pub records: Vec<ContentRecord>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// How a snapshot handed to the caller was obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotOrigin {
    /// An existing snapshot file was loaded
    Reused,
    /// A fresh aggregation pass was run and written
    Rebuilt,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from GET /discover/{movie|tv}
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverPage {
    #[serde(default)]
    pub results: Vec<DiscoverItem>,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
}

fn default_total_pages() -> u32 {
    1
}

/// One discover result; movies carry `title`/`release_date`, TV shows
/// carry `name`/`first_air_date`
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverItem {
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl DiscoverItem {
    pub fn display_title(&self, category: ContentCategory) -> Option<&str> {
        match category {
            ContentCategory::Movie => self.title.as_deref(),
            ContentCategory::TvShow => self.name.as_deref(),
        }
    }

    pub fn date_for(&self, category: ContentCategory) -> Option<&str> {
        match category {
            ContentCategory::Movie => self.release_date.as_deref(),
            ContentCategory::TvShow => self.first_air_date.as_deref(),
        }
        .filter(|date| !date.is_empty())
    }
}

/// Raw response from GET /{movie|tv}/{id}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl ContentDetails {
    pub fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|genre| genre.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Raw response from GET /{movie|tv}/{id}/external_ids
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl ExternalIds {
    /// IMDb id, treating an empty string as unresolved
    pub fn resolved_imdb_id(&self) -> Option<&str> {
        self.imdb_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Raw response from GET /?i={imdb_id}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbTitle {
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(default, rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Rating fields taken from the enrichment source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImdbRating {
    pub rating: String,
    pub votes: String,
}

impl ImdbRating {
    pub fn not_available() -> Self {
        Self {
            rating: NOT_AVAILABLE.to_string(),
            votes: NOT_AVAILABLE.to_string(),
        }
    }
}

impl From<OmdbTitle> for ImdbRating {
    fn from(title: OmdbTitle) -> Self {
        Self {
            rating: title
                .imdb_rating
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            votes: title.imdb_votes.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}
