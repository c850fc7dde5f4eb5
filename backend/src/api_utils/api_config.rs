//! Connection settings for the remote search API.

use anyhow::Context;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.egdata.app";
pub const DEFAULT_COUNTRY: &str = "US";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Root of the REST API; endpoint paths are appended to it.
    pub base_url: Url,
    /// Sent as the `country` query parameter on price-sensitive endpoints.
    pub country: String,
}

impl ApiConfig {
    pub fn new(base_url: &str, country: impl Into<String>) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("invalid API url: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API url cannot be used as a base: {base_url}");
        }
        Ok(Self { base_url, country: country.into() })
    }

    /// Reads `OFFERS_API_URL` and `OFFERS_API_COUNTRY`, falling back to the public API.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("OFFERS_API_URL").unwrap_or(DEFAULT_API_URL.to_string());
        let country = std::env::var("OFFERS_API_COUNTRY").unwrap_or(DEFAULT_COUNTRY.to_string());
        Self::new(&base_url, country)
    }
}
