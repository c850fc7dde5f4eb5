//! Browser-style history of search routes.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::routes::SearchRoute;

/// Where the controller records the shareable route.
pub trait UrlHistory: Send + 'static {
    fn current(&self) -> SearchRoute;
    /// Adds an entry, so back returns to the previous route.
    fn push(&mut self, route: SearchRoute);
    /// Overwrites the current entry.
    fn replace(&mut self, route: SearchRoute);
}

#[derive(Debug)]
struct HistoryEntries {
    entries: Vec<SearchRoute>,
    index: usize,
}

/// In-process history; clones share the same entries.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    inner: Arc<Mutex<HistoryEntries>>,
}

impl MemoryHistory {
    pub fn new(initial: SearchRoute) -> Self {
        Self { inner: Arc::new(Mutex::new(HistoryEntries { entries: vec![initial], index: 0 })) }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryEntries> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn entries(&self) -> Vec<SearchRoute> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn back(&self) -> Option<SearchRoute> {
        let mut history = self.lock();
        if history.index == 0 {
            return None;
        }
        history.index -= 1;
        Some(history.entries[history.index].clone())
    }

    pub fn forward(&self) -> Option<SearchRoute> {
        let mut history = self.lock();
        if history.index + 1 >= history.entries.len() {
            return None;
        }
        history.index += 1;
        Some(history.entries[history.index].clone())
    }
}

impl UrlHistory for MemoryHistory {
    fn current(&self) -> SearchRoute {
        let history = self.lock();
        history.entries[history.index].clone()
    }

    fn push(&mut self, route: SearchRoute) {
        let mut history = self.lock();
        let next = history.index + 1;
        history.entries.truncate(next);
        history.entries.push(route);
        history.index = next;
    }

    fn replace(&mut self, route: SearchRoute) {
        let mut history = self.lock();
        let index = history.index;
        history.entries[index] = route;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_definitions::url_param::UrlSearchParams;

    fn route(query: &str) -> SearchRoute {
        SearchRoute::new(UrlSearchParams::parse(query))
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut history = MemoryHistory::new(route("q=halo"));
        history.replace(route("q=halo&hash=abc"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), route("q=halo&hash=abc"));
    }

    #[test]
    fn test_push_then_back() {
        let mut history = MemoryHistory::new(route("hash=abc"));
        history.push(route("hash=abc&page=2"));
        let observer = history.clone();
        assert_eq!(observer.len(), 2);
        assert_eq!(observer.back(), Some(route("hash=abc")));
        assert_eq!(observer.back(), None);
        assert_eq!(observer.forward(), Some(route("hash=abc&page=2")));
        assert_eq!(observer.forward(), None);
        assert_eq!(observer.back(), Some(route("hash=abc")));

        // pushing after going back drops the forward entry
        history.push(route("hash=abc&page=3"));
        assert_eq!(history.entries(), vec![route("hash=abc"), route("hash=abc&page=3")]);
    }
}
