//! REST endpoint wrappers, one module per resource.

pub mod search;
