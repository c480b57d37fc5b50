use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;

/// Placeholder for an enrichment field that could not be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// Category of catalog content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl ContentCategory {
    /// Path segment used by the catalog API
    pub fn api_path(&self) -> &'static str {
        match self {
            ContentCategory::Movie => "movie",
            ContentCategory::TvShow => "tv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentCategory::Movie => "Movie",
            ContentCategory::TvShow => "TV Show",
        }
    }

    /// Plural form for progress messages
    pub fn plural(&self) -> &'static str {
        match self {
            ContentCategory::Movie => "movies",
            ContentCategory::TvShow => "TV shows",
        }
    }
}

impl Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of an aggregated snapshot
///
/// Field order is the snapshot column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentRecord {
    #[serde(rename = "type")]
    pub category: ContentCategory,
    pub title: String,
    pub overview: Option<String>,
    pub tmdb_id: u64,
    pub imdb_id: Option<String>,
    pub provider: String,
    pub release_date: Option<String>,
    pub tmdb_rating: Option<f64>,
    pub popularity: Option<f64>,
    pub poster_path: Option<String>,
    #[serde(
        serialize_with = "serialize_genres",
        deserialize_with = "deserialize_genres",
        default
    )]
    pub genres: Vec<String>,
    pub imdb_rating: String,
    pub imdb_votes: String,
}

impl ContentRecord {
    /// Numeric IMDb rating, `None` for the sentinel or unparsable text
    pub fn imdb_rating_value(&self) -> Option<f64> {
        if self.imdb_rating == NOT_AVAILABLE {
            return None;
        }
        self.imdb_rating.trim().parse().ok()
    }

    /// Genres as the single text column written to snapshots
    pub fn genres_joined(&self) -> String {
        join_genres(&self.genres)
    }
}

fn join_genres(genres: &[String]) -> String {
    genres.join(", ")
}

fn serialize_genres<S>(genres: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&join_genres(genres))
}

fn deserialize_genres<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let joined = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(joined
        .split(',')
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect())
}
