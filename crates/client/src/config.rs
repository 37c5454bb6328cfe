//! Client configuration.

/// Service address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Environment variable holding the service address.
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

/// Where the recommendation service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: String,
}

impl ClientConfig {
    /// Build a config, trimming whitespace and trailing slashes so paths can be
    /// appended verbatim.
    pub fn new(api_url: impl Into<String>) -> Self {
        let raw = api_url.into();
        let api_url = raw.trim().trim_end_matches('/').to_string();
        Self { api_url }
    }

    /// Read `STOREFRONT_API_URL` at run time (native targets).
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Read `STOREFRONT_API_URL` at compile time (the browser has no process
    /// environment).
    pub fn from_build_env() -> Self {
        match option_env!("STOREFRONT_API_URL") {
            Some(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Absolute URL for a path beginning with `/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
