//! `POST /search`: one page of offers for a filter set.

use common::{search_query::SearchRequest, search_result::SearchResponse};

use crate::api_utils::rest_utils::ApiClient;

pub async fn search_offers(client: &ApiClient, request: &SearchRequest) -> anyhow::Result<SearchResponse> {
    let country = client.country().to_string();
    let response: SearchResponse = client
        .post_json(&["search"], &[("country", country.as_str())], request)
        .await?;
    tracing::debug!(
        hash = %response.query,
        total = response.total,
        page = response.page,
        "search resolved"
    );
    Ok(response)
}
