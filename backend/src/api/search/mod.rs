//! Search endpoint wrappers and module exports.

mod search_offers;
pub use search_offers::search_offers;

mod search_counts;
pub use search_counts::search_counts;

mod resolve_query_hash;
pub use resolve_query_hash::resolve_query_hash;

mod search_tags;
pub use search_tags::{search_filter_catalog, search_offer_types, search_tags};
