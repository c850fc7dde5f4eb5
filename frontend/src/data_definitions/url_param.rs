//! URL query parameters mirroring the search filters.

use std::{convert::Infallible, fmt::Display, str::FromStr};

use common::search_query::{FilterState, PriceRange, SortDir, SortField};
use url::form_urlencoded;


/// Durable, shareable subset of [`FilterState`].
///
/// Parsing is lenient: anything malformed is dropped and later defaulted, so a
/// hand-edited or truncated URL still opens a search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlSearchParams {
    pub hash: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub offer_type: Option<String>,
    pub on_sale: Option<bool>,
    pub code_redemption_only: Option<bool>,
    pub price: Option<PriceRange>,
    pub sort_by: Option<SortField>,
    pub sort_dir: Option<SortDir>,
    pub q: Option<String>,
    pub page: Option<u32>,
}

impl UrlSearchParams {
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            match &*key {
                "hash" if !value.is_empty() => params.hash = Some(value.to_string()),
                "tags" => {
                    for tag in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                        if !params.tags.iter().any(|t| t == tag) {
                            params.tags.push(tag.to_string());
                        }
                    }
                }
                "categories" if !value.is_empty() => params.categories.push(value.to_string()),
                "offer_type" if !value.is_empty() => params.offer_type = Some(value.to_string()),
                "on_sale" => params.on_sale = parse_flag(&key, value),
                "code_redemption_only" => params.code_redemption_only = parse_flag(&key, value),
                "price" => params.price = parse_price(value),
                "sort_by" => params.sort_by = value.parse().inspect_err(|e| tracing::debug!("dropping url param: {e}")).ok(),
                "sort_dir" => params.sort_dir = value.parse().inspect_err(|e| tracing::debug!("dropping url param: {e}")).ok(),
                "q" if !value.is_empty() => params.q = Some(value.to_string()),
                "page" => params.page = value.parse::<u32>().ok().filter(|p| *p >= 1),
                _ => tracing::debug!(key = %key, "ignoring url param"),
            }
        }
        params
    }

    /// Params for `filters`; values equal to their defaults are left out.
    pub fn from_filters(filters: &FilterState, hash: Option<&str>, default_sort: SortField) -> Self {
        let query = filters.query.trim();
        Self {
            hash: hash.map(str::to_string),
            tags: filters.selected_tags.clone(),
            categories: filters.categories.clone(),
            offer_type: filters.selected_offer_type.clone(),
            on_sale: filters.is_sale,
            code_redemption_only: filters.is_code_redemption_only,
            price: (!filters.price_range.is_unbounded()).then_some(filters.price_range),
            sort_by: (filters.sort_by != default_sort).then_some(filters.sort_by),
            sort_dir: (filters.sort_dir != SortDir::default()).then_some(filters.sort_dir),
            q: (!query.is_empty()).then(|| query.to_string()),
            page: (filters.page > 1).then_some(filters.page),
        }
    }

    pub fn to_filters(&self, default_sort: SortField) -> FilterState {
        let mut filters = FilterState::with_sort(self.sort_by.unwrap_or(default_sort));
        filters.sort_dir = self.sort_dir.unwrap_or_default();
        filters.query = self.q.clone().unwrap_or_default();
        filters.set_tags(self.tags.iter().cloned());
        filters.categories = self.categories.clone();
        filters.selected_offer_type = self.offer_type.clone();
        filters.is_sale = self.on_sale;
        filters.is_code_redemption_only = self.code_redemption_only;
        filters.price_range = self.price.unwrap_or_default();
        filters.page = self.page.unwrap_or(1).max(1);
        filters
    }

    /// True when any filter besides `hash` and `page` is present.
    pub fn has_facets(&self) -> bool {
        !self.tags.is_empty()
            || !self.categories.is_empty()
            || self.offer_type.is_some()
            || self.on_sale.is_some()
            || self.code_redemption_only.is_some()
            || self.price.is_some()
            || self.sort_by.is_some()
            || self.sort_dir.is_some()
            || self.q.is_some()
    }

    pub fn with_page(&self, page: u32) -> Self {
        let mut params = self.clone();
        params.page = (page > 1).then_some(page);
        params
    }

    pub fn is_empty(&self) -> bool {
        self.hash.is_none() && self.page.is_none() && !self.has_facets()
    }
}

fn parse_flag(key: &str, value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => {
            tracing::debug!(key, value, "dropping url param: not a boolean");
            None
        }
    }
}

/// `"{min}-{max}"`, either side may be empty.
pub(crate) fn parse_price(value: &str) -> Option<PriceRange> {
    let (min, max) = value.split_once('-')?;
    let bound = |s: &str| -> Result<Option<u64>, std::num::ParseIntError> {
        let s = s.trim();
        if s.is_empty() { Ok(None) } else { s.parse().map(Some) }
    };
    match (bound(min), bound(max)) {
        (Ok(min), Ok(max)) => {
            let range = PriceRange { min, max };
            (!range.is_unbounded()).then_some(range)
        }
        _ => {
            tracing::debug!(value, "dropping url param: malformed price");
            None
        }
    }
}

fn format_price(range: &PriceRange) -> String {
    let side = |v: Option<u64>| v.map(|v| v.to_string()).unwrap_or_default();
    format!("{}-{}", side(range.min), side(range.max))
}

// Keys are always written in the same order so equal params give equal URLs.
impl Display for UrlSearchParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(hash) = &self.hash {
            serializer.append_pair("hash", hash);
        }
        if let Some(q) = &self.q {
            serializer.append_pair("q", q);
        }
        for tag in &self.tags {
            serializer.append_pair("tags", tag);
        }
        for category in &self.categories {
            serializer.append_pair("categories", category);
        }
        if let Some(offer_type) = &self.offer_type {
            serializer.append_pair("offer_type", offer_type);
        }
        if let Some(on_sale) = self.on_sale {
            serializer.append_pair("on_sale", if on_sale { "true" } else { "false" });
        }
        if let Some(code_redemption_only) = self.code_redemption_only {
            serializer.append_pair("code_redemption_only", if code_redemption_only { "true" } else { "false" });
        }
        if let Some(price) = &self.price {
            serializer.append_pair("price", &format_price(price));
        }
        if let Some(sort_by) = self.sort_by {
            serializer.append_pair("sort_by", sort_by.as_str());
        }
        if let Some(sort_dir) = self.sort_dir {
            serializer.append_pair("sort_dir", sort_dir.as_str());
        }
        if let Some(page) = self.page {
            serializer.append_pair("page", &page.to_string());
        }
        f.write_str(&serializer.finish())
    }
}

impl FromStr for UrlSearchParams {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_params_default() {
        let params = UrlSearchParams::parse("");
        assert!(params.is_empty());
        let filters = params.to_filters(SortField::CreationDate);
        assert_eq!(filters, FilterState::with_sort(SortField::CreationDate));
    }

    #[test]
    fn test_malformed_params_are_dropped() {
        let params = UrlSearchParams::parse("?sort_by=popularity&page=0&on_sale=maybe&price=cheap&q=halo&page=abc");
        assert_eq!(params.sort_by, None);
        assert_eq!(params.page, None);
        assert_eq!(params.on_sale, None);
        assert_eq!(params.price, None);
        assert_eq!(params.q.as_deref(), Some("halo"));

        let filters = params.to_filters(SortField::LastModifiedDate);
        assert_eq!(filters.sort_by, SortField::LastModifiedDate);
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn test_tags_accept_repeated_and_comma_separated_values() {
        let params = UrlSearchParams::parse("tags=1216&tags=9547,29088&tags=1216&tags=");
        assert_eq!(params.tags, vec!["1216", "9547", "29088"]);
    }

    #[test]
    fn test_price_ranges() {
        assert_eq!(parse_price("500-2000"), Some(PriceRange { min: Some(500), max: Some(2000) }));
        assert_eq!(parse_price("500-"), Some(PriceRange { min: Some(500), max: None }));
        assert_eq!(parse_price("-2000"), Some(PriceRange { min: None, max: Some(2000) }));
        assert_eq!(parse_price("-"), None);
        assert_eq!(parse_price("2000"), None);
        assert_eq!(format_price(&PriceRange { min: None, max: Some(2000) }), "-2000");
    }

    #[test]
    fn test_filters_survive_the_url() {
        let mut filters = FilterState::with_sort(SortField::Price);
        filters.query = "halo wars".to_string();
        filters.sort_dir = SortDir::Asc;
        filters.set_tags(vec!["1216".to_string(), "9547".to_string()]);
        filters.categories = vec!["games/edition".to_string()];
        filters.selected_offer_type = Some("BASE_GAME".to_string());
        filters.is_sale = Some(true);
        filters.price_range = PriceRange { min: Some(100), max: Some(5000) };
        filters.page = 4;

        let params = UrlSearchParams::from_filters(&filters, Some("abc123"), SortField::LastModifiedDate);
        let text = params.to_string();
        assert_eq!(
            text,
            "hash=abc123&q=halo+wars&tags=1216&tags=9547&categories=games%2Fedition&offer_type=BASE_GAME&on_sale=true&price=100-5000&sort_by=price&sort_dir=asc&page=4"
        );

        let parsed: UrlSearchParams = text.parse().unwrap();
        assert_eq!(parsed, params);
        assert_eq!(parsed.to_filters(SortField::LastModifiedDate), filters);
    }

    #[test]
    fn test_defaults_are_left_out() {
        let filters = FilterState::with_sort(SortField::LastModifiedDate);
        let params = UrlSearchParams::from_filters(&filters, None, SortField::LastModifiedDate);
        assert!(params.is_empty());
        assert_eq!(params.to_string(), "");
        assert!(!params.has_facets());
    }

    #[test]
    fn test_with_page() {
        let params = UrlSearchParams::parse("hash=abc&page=3");
        assert_eq!(params.with_page(1).to_string(), "hash=abc");
        assert_eq!(params.with_page(2).to_string(), "hash=abc&page=2");
        assert!(!params.has_facets());
    }
}
