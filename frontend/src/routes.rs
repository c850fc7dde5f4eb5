use std::{fmt::Display, str::FromStr};

use common::search_query::{FilterState, SortField};

use crate::data_definitions::url_param::UrlSearchParams;

pub const SEARCH_PATH: &str = "/search";

/// Location of the search page, e.g. `/search?hash=abc123&page=2`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRoute {
    pub params: UrlSearchParams,
}

impl SearchRoute {
    pub fn new(params: UrlSearchParams) -> Self {
        Self { params }
    }

    pub fn search_page_from_filters(filters: &FilterState, hash: Option<&str>, default_sort: SortField) -> Self {
        Self::new(UrlSearchParams::from_filters(filters, hash, default_sort))
    }

    pub fn hash(&self) -> Option<&str> {
        self.params.hash.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.params.page.unwrap_or(1)
    }
}

impl Display for SearchRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let query = self.params.to_string();
        if query.is_empty() {
            f.write_str(SEARCH_PATH)
        } else {
            write!(f, "{SEARCH_PATH}?{query}")
        }
    }
}

#[derive(Debug)]
pub enum RouteParseError {
    InvalidUrl(url::ParseError),
    UnknownPath(String),
}

impl std::fmt::Display for RouteParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(err) => write!(f, "Failed to parse url: {}", err),
            Self::UnknownPath(path) => write!(f, "Not a search page: {}", path),
        }
    }
}

impl std::error::Error for RouteParseError {}

// Accepts a bare path (`/search?q=halo`) or an absolute url.
impl FromStr for SearchRoute {
    type Err = RouteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (path, query) = if s.contains("://") {
            let url = url::Url::parse(s).map_err(RouteParseError::InvalidUrl)?;
            (url.path().to_string(), url.query().unwrap_or_default().to_string())
        } else {
            let (path, query) = s.split_once('?').unwrap_or((s, ""));
            (path.to_string(), query.to_string())
        };
        if path.trim_end_matches('/') != SEARCH_PATH {
            return Err(RouteParseError::UnknownPath(path));
        }
        Ok(Self::new(UrlSearchParams::parse(&query)))
    }
}
