use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key (primary catalog source)
    #[serde(default)]
    pub tmdb_api_key: String,

    /// OMDb API key (rating enrichment source)
    #[serde(default)]
    pub omdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Region used for watch provider discovery
    #[serde(default = "default_watch_region")]
    pub watch_region: String,

    /// Directory holding snapshot files
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,

    /// Page cap per (category, provider) combination
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause after each item, in milliseconds
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,

    /// Pause after each page, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com".to_string()
}

fn default_watch_region() -> String {
    "US".to_string()
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_pages() -> u32 {
    2
}

fn default_item_delay_ms() -> u64 {
    500
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.max_pages == 0 {
            anyhow::bail!("MAX_PAGES must be at least 1");
        }

        Ok(config)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}
