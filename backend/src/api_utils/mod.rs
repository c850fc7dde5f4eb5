pub mod api_config;
pub mod rest_utils;
