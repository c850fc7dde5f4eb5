//! Search state controller.

pub mod filter_search_controller;
