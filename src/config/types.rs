use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
}

/// Connection settings for the movie catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the API (e.g., "https://api.themoviedb.org/3").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Prefix prepended to poster, backdrop, logo and profile paths.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Direct API key. Takes precedence over `api_key_env`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is not set.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Response language sent with every request.
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

impl CatalogConfig {
    /// The configured key, else the value of `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }
}

/// Pagination policy for the movie list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Movies rated below this are filtered out (default: 7.0).
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
    /// Stop paging as soon as a page loses any movie to the rating filter
    /// (default: true).
    #[serde(default = "default_require_full_page")]
    pub require_full_page: bool,
    /// First page number (default: 1).
    #[serde(default = "default_initial_key")]
    pub initial_key: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// How long alerts stay visible in milliseconds (default: 4000).
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Undelivered navigation events kept for late subscribers (default: 10).
    #[serde(default = "default_replay_capacity")]
    pub replay_capacity: usize,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_api_key_env() -> String {
    "TMDB_API_KEY".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_min_rating() -> f64 {
    7.0
}

fn default_require_full_page() -> bool {
    true
}

fn default_initial_key() -> u32 {
    1
}

fn default_display_ms() -> u64 {
    4_000
}

fn default_replay_capacity() -> usize {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            api_key_env: default_api_key_env(),
            language: default_language(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            min_rating: default_min_rating(),
            require_full_page: default_require_full_page(),
            initial_key: default_initial_key(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            replay_capacity: default_replay_capacity(),
        }
    }
}
