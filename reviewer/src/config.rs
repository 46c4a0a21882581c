//! Reviewer configuration
//!
//! Defaults, then `.env`, then environment variables; the binary applies
//! command line flags on top.

use std::time::Duration;
use url::Url;

use crate::core::classifier::DEFAULT_ATTENTION_THRESHOLD;
use crate::error::{ReviewError, ReviewResult};
use crate::types::Page;

pub const ENV_API_URL: &str = "PRICEMATCH_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "PRICEMATCH_TIMEOUT_SECS";
pub const ENV_PAGE_LIMIT: &str = "PRICEMATCH_PAGE_LIMIT";
pub const ENV_ATTENTION_THRESHOLD: &str = "PRICEMATCH_ATTENTION_THRESHOLD";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewConfig {
    /// Base URL of the matching service, always ending with `/`
    pub api_url: Url,
    /// Upper bound for every request
    pub request_timeout: Duration,
    /// Window applied to list endpoints
    pub page: Page,
    /// Confidence below which a match is highlighted
    pub attention_threshold: u8,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            request_timeout: DEFAULT_TIMEOUT,
            page: Page::default(),
            attention_threshold: DEFAULT_ATTENTION_THRESHOLD,
        }
    }
}

impl ReviewConfig {
    /// Load from `.env` and the process environment
    pub fn from_env() -> ReviewResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ReviewResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_API_URL) {
            config = config.with_api_url(&raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = parse_number::<u64>(ENV_TIMEOUT_SECS, &raw)?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(ENV_PAGE_LIMIT) {
            config = config.with_page_limit(parse_number(ENV_PAGE_LIMIT, &raw)?);
        }
        if let Some(raw) = lookup(ENV_ATTENTION_THRESHOLD) {
            config = config.with_attention_threshold(parse_number(ENV_ATTENTION_THRESHOLD, &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_url(mut self, raw: &str) -> ReviewResult<Self> {
        self.api_url = parse_api_url(raw)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page.limit = limit;
        self
    }

    pub fn with_attention_threshold(mut self, threshold: u8) -> Self {
        self.attention_threshold = threshold;
        self
    }

    pub fn validate(&self) -> ReviewResult<()> {
        if self.request_timeout.is_zero() {
            return Err(ReviewError::config("request_timeout", "must be greater than zero"));
        }
        if self.page.limit == 0 {
            return Err(ReviewError::config("page_limit", "must be greater than zero"));
        }
        if self.attention_threshold > 100 {
            return Err(ReviewError::config("attention_threshold", "must be within 0..=100"));
        }
        Ok(())
    }
}

fn parse_api_url(raw: &str) -> ReviewResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| ReviewError::config("api_url", e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ReviewError::config(
            "api_url",
            format!("unsupported scheme {}", url.scheme()),
        ));
    }

    // Relative joins replace the last segment unless the path ends with a slash
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> ReviewResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ReviewError::config(field, format!("not a number: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ReviewConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.page, Page { skip: 0, limit: 100 });
        assert_eq!(config.attention_threshold, 90);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ReviewConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://matcher.internal/v1"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_PAGE_LIMIT, "500"),
            (ENV_ATTENTION_THRESHOLD, "75"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.as_str(), "https://matcher.internal/v1/");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.page.limit, 500);
        assert_eq!(config.attention_threshold, 75);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_number = ReviewConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")]));
        assert!(matches!(bad_number, Err(ReviewError::Config { .. })));

        let zero_timeout = ReviewConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")]));
        assert!(zero_timeout.is_err());

        let bad_scheme = ReviewConfig::default().with_api_url("ftp://example.com");
        assert!(bad_scheme.is_err());

        let threshold = ReviewConfig::default().with_attention_threshold(101);
        assert!(threshold.validate().is_err());
    }
}
