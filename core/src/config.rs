//! Client configuration.

/// Endpoint of the hosted store.
pub const DEFAULT_BASE_URL: &str = "https://strapi-production-456d.up.railway.app/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
