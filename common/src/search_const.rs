//! Constants shared by the search client and the controller.

/// Number of offers requested per page.
pub const PAGE_SIZE: u32 = 32;

/// Quiet period before typed query text is sent to the server.
pub const QUERY_DEBOUNCE_MS: u64 = 300;
