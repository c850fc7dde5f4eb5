//! Data-access layer for the remote offer search API.

pub mod api;
pub mod api_utils;
