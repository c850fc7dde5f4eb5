//! Shared search query models and helpers.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::search_const::PAGE_SIZE;


/// Field the server orders results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    ReleaseDate,
    #[default]
    LastModifiedDate,
    EffectiveDate,
    CreationDate,
    ViewableDate,
    PcReleaseDate,
    Upcoming,
    Price,
    Discount,
    DiscountPercent,
}

impl SortField {
    pub const ALL: [SortField; 10] = [
        SortField::ReleaseDate,
        SortField::LastModifiedDate,
        SortField::EffectiveDate,
        SortField::CreationDate,
        SortField::ViewableDate,
        SortField::PcReleaseDate,
        SortField::Upcoming,
        SortField::Price,
        SortField::Discount,
        SortField::DiscountPercent,
    ];

    /// Name used on the wire and in the URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::ReleaseDate => "releaseDate",
            SortField::LastModifiedDate => "lastModifiedDate",
            SortField::EffectiveDate => "effectiveDate",
            SortField::CreationDate => "creationDate",
            SortField::ViewableDate => "viewableDate",
            SortField::PcReleaseDate => "pcReleaseDate",
            SortField::Upcoming => "upcoming",
            SortField::Price => "price",
            SortField::Discount => "discount",
            SortField::DiscountPercent => "discountPercent",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortField::ReleaseDate => "Release Date",
            SortField::LastModifiedDate => "Last Modified",
            SortField::EffectiveDate => "Effective Date",
            SortField::CreationDate => "Creation Date",
            SortField::ViewableDate => "Viewable Date",
            SortField::PcReleaseDate => "PC Release Date",
            SortField::Upcoming => "Upcoming",
            SortField::Price => "Price",
            SortField::Discount => "Discount",
            SortField::DiscountPercent => "Discount %",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown sort field: {s}"))
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

impl Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            _ => Err(format!("unknown sort direction: {s}")),
        }
    }
}


/// Price bounds in minor currency units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PriceRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl PriceRange {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}


/// Client-held facet selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Settled free-text query.
    pub query: String,
    /// Selected tag ids, in the order they were picked.
    pub selected_tags: Vec<String>,
    pub categories: Vec<String>,
    pub selected_offer_type: Option<String>,
    pub sort_by: SortField,
    pub sort_dir: SortDir,
    pub is_code_redemption_only: Option<bool>,
    pub is_sale: Option<bool>,
    pub price_range: PriceRange,
    /// 1-indexed.
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_sort(SortField::default())
    }
}

impl FilterState {
    /// Empty filters ordered by `sort_by`, newest first.
    pub fn with_sort(sort_by: SortField) -> Self {
        Self {
            query: String::new(),
            selected_tags: Vec::new(),
            categories: Vec::new(),
            selected_offer_type: None,
            sort_by,
            sort_dir: SortDir::Desc,
            is_code_redemption_only: None,
            is_sale: None,
            price_range: PriceRange::default(),
            page: 1,
        }
    }

    /// Adds the tag if absent, removes it otherwise.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.selected_tags.iter().position(|t| t == tag) {
            self.selected_tags.remove(pos);
        } else {
            self.selected_tags.push(tag.to_string());
        }
    }

    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = String>) {
        self.selected_tags.clear();
        for tag in tags {
            if !self.selected_tags.contains(&tag) {
                self.selected_tags.push(tag);
            }
        }
    }

    pub fn toggle_category(&mut self, category: &str) {
        if let Some(pos) = self.categories.iter().position(|c| c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category.to_string());
        }
    }

    /// True when both filters select the same result set, ignoring page and tag order.
    pub fn same_facets(&self, other: &FilterState) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.page = 1;
        b.page = 1;
        a.selected_tags.sort();
        b.selected_tags.sort();
        a == b
    }

    pub fn to_search_request(&self, limit: u32) -> SearchRequest {
        let title = self.query.trim();
        SearchRequest {
            sort_by: self.sort_by,
            sort_dir: self.sort_dir,
            limit,
            page: self.page.max(1),
            title: (!title.is_empty()).then(|| title.to_string()),
            tags: (!self.selected_tags.is_empty()).then(|| self.selected_tags.clone()),
            categories: (!self.categories.is_empty()).then(|| self.categories.clone()),
            is_code_redemption_only: self.is_code_redemption_only,
            offer_type: self.selected_offer_type.clone(),
            on_sale: self.is_sale,
            price: (!self.price_range.is_unbounded()).then_some(self.price_range),
        }
    }

    /// Seeds filters from a filter object the server resolved from a hash.
    pub fn from_search_request(request: &SearchRequest) -> Self {
        let mut filters = Self::with_sort(request.sort_by);
        filters.sort_dir = request.sort_dir;
        filters.query = request.title.clone().unwrap_or_default();
        filters.set_tags(request.tags.clone().unwrap_or_default());
        filters.categories = request.categories.clone().unwrap_or_default();
        filters.selected_offer_type = request.offer_type.clone();
        filters.is_code_redemption_only = request.is_code_redemption_only;
        filters.is_sale = request.on_sale;
        filters.price_range = request.price.unwrap_or_default();
        filters.page = request.page.max(1);
        filters
    }
}


/// Body of `POST /search`, and the filter object behind a resolved hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_dir: SortDir,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_code_redemption_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_sale: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceRange>,
}

fn default_limit() -> u32 {
    PAGE_SIZE
}

fn default_page() -> u32 {
    1
}

impl SearchRequest {
    /// Identity used for de-duplication and stale response checks; tag order does not count.
    pub fn cache_key(&self) -> SearchRequest {
        let mut key = self.clone();
        if let Some(tags) = key.tags.as_mut() {
            tags.sort();
            tags.dedup();
        }
        key
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_omits_empty_facets() {
        let mut filters = FilterState::default();
        filters.query = "halo".to_string();
        filters.sort_by = SortField::Price;
        filters.sort_dir = SortDir::Asc;

        let body = serde_json::to_value(filters.to_search_request(32)).unwrap();
        assert_eq!(
            body,
            json!({
                "sortBy": "price",
                "sortDir": "asc",
                "limit": 32,
                "page": 1,
                "title": "halo",
            })
        );
    }

    #[test]
    fn test_request_body_with_all_facets() {
        let mut filters = FilterState::with_sort(SortField::DiscountPercent);
        filters.set_tags(vec!["1216".to_string(), "9547".to_string()]);
        filters.categories = vec!["games".to_string()];
        filters.selected_offer_type = Some("BASE_GAME".to_string());
        filters.is_sale = Some(true);
        filters.is_code_redemption_only = Some(false);
        filters.price_range = PriceRange { min: Some(500), max: None };
        filters.page = 3;

        let body = serde_json::to_value(filters.to_search_request(32)).unwrap();
        assert_eq!(
            body,
            json!({
                "sortBy": "discountPercent",
                "sortDir": "desc",
                "limit": 32,
                "page": 3,
                "tags": ["1216", "9547"],
                "categories": ["games"],
                "isCodeRedemptionOnly": false,
                "offerType": "BASE_GAME",
                "onSale": true,
                "price": { "min": 500 },
            })
        );
    }

    #[test]
    fn test_cache_key_ignores_tag_order() {
        let mut a = FilterState::default();
        a.set_tags(vec!["b".to_string(), "a".to_string()]);
        let mut b = FilterState::default();
        b.set_tags(vec!["a".to_string(), "b".to_string()]);

        assert_ne!(a.to_search_request(32), b.to_search_request(32));
        assert_eq!(a.to_search_request(32).cache_key(), b.to_search_request(32).cache_key());
        assert!(a.same_facets(&b));
    }

    #[test]
    fn test_toggle_tag_preserves_insertion_order() {
        let mut filters = FilterState::default();
        filters.toggle_tag("z");
        filters.toggle_tag("a");
        filters.toggle_tag("m");
        filters.toggle_tag("a");
        assert_eq!(filters.selected_tags, vec!["z", "m"]);
    }

    #[test]
    fn test_resolved_filter_object_seeds_state() {
        let request: SearchRequest = serde_json::from_value(json!({
            "title": "portal",
            "tags": ["29088"],
            "sortBy": "releaseDate",
            "sortDir": "asc",
            "onSale": true,
        }))
        .unwrap();
        assert_eq!(request.limit, PAGE_SIZE);
        assert_eq!(request.page, 1);

        let filters = FilterState::from_search_request(&request);
        assert_eq!(filters.query, "portal");
        assert_eq!(filters.selected_tags, vec!["29088"]);
        assert_eq!(filters.sort_by, SortField::ReleaseDate);
        assert_eq!(filters.sort_dir, SortDir::Asc);
        assert_eq!(filters.is_sale, Some(true));
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn test_sort_field_names() {
        for field in SortField::ALL {
            let wire = serde_json::to_value(field).unwrap();
            assert_eq!(wire, json!(field.as_str()));
            assert_eq!(field.as_str().parse::<SortField>(), Ok(field));
        }
        assert!("popularity".parse::<SortField>().is_err());
    }
}
