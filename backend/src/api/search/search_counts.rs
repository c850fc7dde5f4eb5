//! `GET /search/{hash}/count`: facet counts for a resolved hash.

use common::search_result::FacetCounts;

use crate::api_utils::rest_utils::ApiClient;

pub async fn search_counts(client: &ApiClient, hash: &str) -> anyhow::Result<FacetCounts> {
    let country = client.country().to_string();
    client
        .get_json(&["search", hash, "count"], &[("country", country.as_str())])
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_utils::api_config::ApiConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn fetches_counts_for_hash() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = ApiClient::new(ApiConfig::new(&server.base_url(), "US")?);

        let counts_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/search/abc123/count").query_param("country", "US");
                then.status(200).json_body(json!({
                    "tagCounts": [{ "_id": "1216", "count": 12 }],
                    "offerTypeCounts": [{ "_id": "BASE_GAME", "count": 10 }, { "_id": "DLC", "count": 2 }],
                    "total": 12,
                }));
            })
            .await;

        let counts = search_counts(&client, "abc123").await?;
        counts_mock.assert_async().await;

        assert_eq!(counts.total, 12);
        assert_eq!(counts.tag_count("1216"), Some(12));
        assert_eq!(counts.offer_type_count("DLC"), Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn missing_hash_is_an_error() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = ApiClient::new(ApiConfig::new(&server.base_url(), "US")?);
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search/gone/count");
                then.status(404).body("not found");
            })
            .await;

        assert!(search_counts(&client, "gone").await.is_err());
        Ok(())
    }
}
