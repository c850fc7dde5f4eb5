//! Snapshot of the search page published by the controller.

use common::{
    search_query::FilterState,
    search_result::{FacetCount, FacetCounts, SearchResponse},
};

use crate::routes::SearchRoute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Pending,
    Resolved,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FacetCountsState {
    #[default]
    Idle,
    Pending,
    Resolved(FacetCounts),
    /// The count request failed; every facet stays visible.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchViewState {
    /// Settled filters the last request was built from.
    pub filters: FilterState,
    /// Raw text box content, ahead of `filters.query` while debouncing.
    pub query_input: String,
    pub status: SearchStatus,
    /// Most recent successful response; kept through later failures.
    pub results: Option<SearchResponse>,
    pub error: Option<String>,
    pub facet_counts: FacetCountsState,
    pub route: SearchRoute,
}

impl SearchViewState {
    pub fn total_pages(&self) -> u32 {
        self.results.as_ref().map(|r| r.total_pages()).unwrap_or(0)
    }

    pub fn show_pagination(&self) -> bool {
        self.total_pages() > 1
    }

    /// Whether a pagination button for `page` should be enabled.
    pub fn can_go_to_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages() && page != self.filters.page
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(&self.results, Some(r) if r.elements.is_empty())
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Pending
    }

    pub fn counts(&self) -> Option<&FacetCounts> {
        match &self.facet_counts {
            FacetCountsState::Resolved(counts) => Some(counts),
            _ => None,
        }
    }

    pub fn tag_counts(&self) -> &[FacetCount] {
        self.counts().map(|c| c.tag_counts.as_slice()).unwrap_or_default()
    }

    pub fn offer_type_counts(&self) -> &[FacetCount] {
        self.counts().map(|c| c.offer_type_counts.as_slice()).unwrap_or_default()
    }

    pub fn is_tag_visible(&self, tag_id: &str) -> bool {
        let selected = self.filters.selected_tags.iter().any(|t| t == tag_id);
        match self.counts() {
            Some(counts) => counts.is_tag_visible(tag_id, selected),
            None => true,
        }
    }

    pub fn is_offer_type_visible(&self, offer_type: &str) -> bool {
        let selected = self.filters.selected_offer_type.as_deref() == Some(offer_type);
        match self.counts() {
            Some(counts) => counts.is_offer_type_visible(offer_type, selected),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(total: u64, limit: u32) -> SearchViewState {
        SearchViewState {
            results: Some(SearchResponse { elements: vec![], page: 1, limit, total, query: "h".to_string() }),
            status: SearchStatus::Resolved,
            ..Default::default()
        }
    }

    #[test]
    fn test_pagination_bounds() {
        let state = resolved(70, 32);
        assert_eq!(state.total_pages(), 3);
        assert!(state.show_pagination());
        assert!(!state.can_go_to_page(0));
        assert!(!state.can_go_to_page(1));
        assert!(state.can_go_to_page(2));
        assert!(state.can_go_to_page(3));
        assert!(!state.can_go_to_page(4));
    }

    #[test]
    fn test_single_page_hides_pagination() {
        let state = resolved(10, 32);
        assert_eq!(state.total_pages(), 1);
        assert!(!state.show_pagination());
        assert!(state.is_empty_result());
    }

    #[test]
    fn test_degraded_counts_show_everything() {
        let mut state = resolved(10, 32);
        state.facet_counts = FacetCountsState::Degraded;
        assert!(state.tag_counts().is_empty());
        assert!(state.offer_type_counts().is_empty());
        assert!(state.is_tag_visible("1216"));
        assert!(state.is_offer_type_visible("DLC"));
    }
}
