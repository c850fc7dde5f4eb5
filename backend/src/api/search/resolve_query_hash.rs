//! `GET /search/{hash}`: the filter object a hash was issued for.

use common::search_query::SearchRequest;

use crate::api_utils::rest_utils::ApiClient;

pub async fn resolve_query_hash(client: &ApiClient, hash: &str) -> anyhow::Result<SearchRequest> {
    let country = client.country().to_string();
    client
        .get_json(&["search", hash], &[("country", country.as_str())])
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_utils::api_config::ApiConfig;
    use common::search_query::{SortDir, SortField};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn resolves_bookmarked_hash() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let client = ApiClient::new(ApiConfig::new(&server.base_url(), "US")?);

        let resolve_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/search/abc123").query_param("country", "US");
                then.status(200).json_body(json!({
                    "title": "halo",
                    "sortBy": "price",
                    "sortDir": "asc",
                    "tags": ["1216"],
                    "page": 1,
                    "limit": 32,
                }));
            })
            .await;

        let request = resolve_query_hash(&client, "abc123").await?;
        resolve_mock.assert_async().await;

        assert_eq!(request.title.as_deref(), Some("halo"));
        assert_eq!(request.sort_by, SortField::Price);
        assert_eq!(request.sort_dir, SortDir::Asc);
        assert_eq!(request.tags, Some(vec!["1216".to_string()]));
        Ok(())
    }
}
