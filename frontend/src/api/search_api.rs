//! Client API calls for search endpoints.

use async_trait::async_trait;
use backend::api_utils::rest_utils::ApiClient;
use common::{
    search_query::SearchRequest,
    search_result::{FacetCounts, OfferTypeCount, SearchResponse, Tag},
};


/// Remote search operations the controller depends on.
#[async_trait]
pub trait SearchApi: Send + Sync + 'static {
    async fn search_for_results(&self, request: SearchRequest) -> anyhow::Result<SearchResponse>;

    async fn search_counts(&self, hash: String) -> anyhow::Result<FacetCounts>;

    /// Filter object a previously issued hash stands for.
    async fn resolve_query_hash(&self, hash: String) -> anyhow::Result<SearchRequest>;

    async fn search_filter_catalog(&self) -> anyhow::Result<(Vec<Tag>, Vec<OfferTypeCount>)>;
}

#[async_trait]
impl SearchApi for ApiClient {
    async fn search_for_results(&self, request: SearchRequest) -> anyhow::Result<SearchResponse> {
        backend::api::search::search_offers(self, &request).await
    }

    async fn search_counts(&self, hash: String) -> anyhow::Result<FacetCounts> {
        backend::api::search::search_counts(self, &hash).await
    }

    async fn resolve_query_hash(&self, hash: String) -> anyhow::Result<SearchRequest> {
        backend::api::search::resolve_query_hash(self, &hash).await
    }

    async fn search_filter_catalog(&self) -> anyhow::Result<(Vec<Tag>, Vec<OfferTypeCount>)> {
        backend::api::search::search_filter_catalog(self).await
    }
}
