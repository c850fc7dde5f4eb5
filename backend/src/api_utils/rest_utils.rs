//! JSON-over-HTTP helpers shared by the endpoint modules.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::api_utils::api_config::ApiConfig;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { http: reqwest::Client::new(), config: Arc::new(config) }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(ApiConfig::from_env()?))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn country(&self) -> &str {
        &self.config.country
    }

    /// Appends percent-encoded path segments and query pairs to the base url.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> anyhow::Result<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API url cannot be used as a base: {}", self.config.base_url))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, &str)]) -> anyhow::Result<T> {
        let url = self.endpoint(segments, query)?;
        let request = self.http.get(url.clone());
        send_json(request, &url).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        body: &B,
    ) -> anyhow::Result<T> {
        let url = self.endpoint(segments, query)?;
        let request = self.http.post(url.clone()).json(body);
        send_json(request, &url).await
    }
}

async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder, url: &Url) -> anyhow::Result<T> {
    let t0 = std::time::Instant::now();
    let response = request.send().await?;
    let status = response.status();
    let response_txt = response.text().await?;
    let dt_ms = t0.elapsed().as_millis() as u64;
    if status.is_client_error() || status.is_server_error() {
        tracing::debug!(%url, %status, dt_ms, "API request failed");
        anyhow::bail!("{}: {}", status, response_txt);
    }
    tracing::debug!(%url, %status, dt_ms, len = response_txt.len(), "API response");
    let response: T = serde_json::from_str(&response_txt)?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(ApiConfig::new(base, "US").unwrap())
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let url = client("http://localhost:4000").endpoint(&["search", "abc123", "count"], &[("country", "US")]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/search/abc123/count?country=US");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = client("http://localhost:4000/v2/").endpoint(&["search"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/v2/search");
    }

    #[test]
    fn test_endpoint_encodes_hash_segment() {
        let url = client("http://localhost:4000").endpoint(&["search", "a/b c"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/search/a%2Fb%20c");
    }
}
