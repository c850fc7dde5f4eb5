use serde::{Deserialize, Deserializer, Serialize};

/// Reads `null` as the type's default; the offers API sends it for blank fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}


/// One page of offers, plus the hash the server assigned to the filter combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub elements: Vec<Offer>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    /// Opaque hash identifying the resolved filter set.
    pub query: String,
}

impl SearchResponse {
    pub fn hash(&self) -> &str {
        &self.query
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.limit)
    }
}

/// `ceil(total / limit)`, zero when there is no limit.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64).min(u32::MAX as u64) as u32
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Offer {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub namespace: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub offer_type: Option<String>,
    pub effective_date: Option<String>,
    pub creation_date: Option<String>,
    pub last_modified_date: Option<String>,
    pub release_date: Option<String>,
    pub seller: Option<OfferSeller>,
    pub price: Option<OfferPrice>,
    #[serde(deserialize_with = "null_as_default")]
    pub key_images: Vec<OfferKeyImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OfferSeller {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct OfferPrice {
    #[serde(deserialize_with = "null_as_default")]
    pub currency_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub original_price: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_price: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub discount: u64,
}

impl OfferPrice {
    pub fn is_discounted(&self) -> bool {
        self.discount_price < self.original_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OfferKeyImage {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    #[serde(rename = "_id")]
    pub id: String,
    pub count: u64,
}

/// Per-facet match counts for a resolved hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct FacetCounts {
    pub tag_counts: Vec<FacetCount>,
    pub offer_type_counts: Vec<FacetCount>,
    pub total: u64,
}

impl FacetCounts {
    pub fn tag_count(&self, tag_id: &str) -> Option<u64> {
        self.tag_counts.iter().find(|c| c.id == tag_id).map(|c| c.count)
    }

    pub fn offer_type_count(&self, offer_type: &str) -> Option<u64> {
        self.offer_type_counts.iter().find(|c| c.id == offer_type).map(|c| c.count)
    }

    /// With no tag counts at all every tag stays visible.
    pub fn is_tag_visible(&self, tag_id: &str, selected: bool) -> bool {
        if selected || self.tag_counts.is_empty() {
            return true;
        }
        self.tag_count(tag_id).unwrap_or(0) > 0
    }

    pub fn is_offer_type_visible(&self, offer_type: &str, selected: bool) -> bool {
        if selected || self.offer_type_counts.is_empty() {
            return true;
        }
        self.offer_type_count(offer_type).unwrap_or(0) > 0
    }
}


/// Entry of the tag catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub group_name: Option<String>,
    pub aliases: Vec<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTypeCount {
    #[serde(rename = "_id")]
    pub id: String,
    pub count: u64,
}
