use chrono::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_CACHE_KEY: &str = "BOARD_QUERY_OFFLINE_CACHE";

/// Client-wide settings shared by the browser and terminal front-ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    /// Storage key the credential is read from.
    pub token_key: String,
    /// Storage key of the persisted query cache.
    pub cache_key: String,
    /// How long an entry stays in the cache after it was last written.
    pub cache_time: Duration,
    /// How long a cached value counts as fresh.
    pub stale_time: Duration,
    /// Persisted snapshots older than this are discarded on restore.
    pub max_age: Duration,
    /// Snapshots written with a different buster are discarded on restore.
    pub buster: String,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            cache_time: Duration::hours(24),
            stale_time: Duration::zero(),
            max_age: Duration::hours(24),
            buster: String::new(),
        }
    }
}
