//! `GET /search/tags` and `GET /search/offer-types`: filter catalogs.

use common::search_result::{OfferTypeCount, Tag};

use crate::api_utils::rest_utils::ApiClient;

/// Full tag catalog; `raw` asks for the unprocessed list.
pub async fn search_tags(client: &ApiClient, raw: bool) -> anyhow::Result<Vec<Tag>> {
    if raw {
        client.get_json(&["search", "tags"], &[("raw", "true")]).await
    } else {
        client.get_json(&["search", "tags"], &[]).await
    }
}

pub async fn search_offer_types(client: &ApiClient) -> anyhow::Result<Vec<OfferTypeCount>> {
    client.get_json(&["search", "offer-types"], &[]).await
}

/// Tags and offer types, fetched concurrently.
pub async fn search_filter_catalog(client: &ApiClient) -> anyhow::Result<(Vec<Tag>, Vec<OfferTypeCount>)> {
    futures::try_join!(search_tags(client, true), search_offer_types(client))
}
