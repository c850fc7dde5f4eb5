//! Search controller: keeps the filters, the in-flight search, the facet counts and
//! the URL consistent with each other.
//!
//! The controller runs as a single task. [`SearchControllerHandle`] sends it
//! commands and every change is published as a [`SearchViewState`] snapshot.
//! Searches and count requests run as detached tasks and report back over a
//! channel; a search response is only applied if its cache key is still the
//! latest one dispatched.

use std::sync::Arc;

use common::{
    search_const::{PAGE_SIZE, QUERY_DEBOUNCE_MS},
    search_query::{FilterState, PriceRange, SearchRequest, SortDir, SortField},
    search_result::{FacetCounts, SearchResponse},
};
use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{Duration, Instant},
};

use crate::{
    api::search_api::SearchApi,
    data_definitions::{
        debounce::Debouncer,
        search_view_state::{FacetCountsState, SearchStatus, SearchViewState},
        url_history::UrlHistory,
    },
    routes::SearchRoute,
};

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Quiet period applied to query text.
    pub debounce: Duration,
    /// Page size sent as `limit`.
    pub limit: u32,
    /// Sort field used when the URL names none and after `clear_all`.
    pub default_sort_by: SortField,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(QUERY_DEBOUNCE_MS),
            limit: PAGE_SIZE,
            default_sort_by: SortField::LastModifiedDate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("page {page} is outside 1..={total_pages}")]
    PageOutOfRange { page: u32, total_pages: u32 },
    #[error("results for the new filters have not arrived yet")]
    ResultsPending,
    #[error("search controller is no longer running")]
    ChannelClosed,
}

/// Change to one discrete filter control.
#[derive(Debug, Clone, PartialEq)]
pub enum FacetChange {
    ToggleTag(String),
    SetTags(Vec<String>),
    ToggleCategory(String),
    SetCategories(Vec<String>),
    OfferType(Option<String>),
    SortBy(SortField),
    SortDir(SortDir),
    CodeRedemptionOnly(Option<bool>),
    Sale(Option<bool>),
    MinPrice(Option<u64>),
    MaxPrice(Option<u64>),
    Price(PriceRange),
}

impl FacetChange {
    fn apply(self, filters: &mut FilterState) {
        match self {
            FacetChange::ToggleTag(tag) => filters.toggle_tag(&tag),
            FacetChange::SetTags(tags) => filters.set_tags(tags),
            FacetChange::ToggleCategory(category) => filters.toggle_category(&category),
            FacetChange::SetCategories(categories) => filters.categories = categories,
            FacetChange::OfferType(offer_type) => filters.selected_offer_type = offer_type,
            FacetChange::SortBy(sort_by) => filters.sort_by = sort_by,
            FacetChange::SortDir(sort_dir) => filters.sort_dir = sort_dir,
            FacetChange::CodeRedemptionOnly(flag) => filters.is_code_redemption_only = flag,
            FacetChange::Sale(flag) => filters.is_sale = flag,
            FacetChange::MinPrice(min) => filters.price_range.min = min,
            FacetChange::MaxPrice(max) => filters.price_range.max = max,
            FacetChange::Price(range) => filters.price_range = range,
        }
    }
}

enum Command {
    SetFacet { change: FacetChange, resp: oneshot::Sender<()> },
    SetQueryText { text: String, resp: oneshot::Sender<()> },
    SetPage { page: u32, resp: oneshot::Sender<Result<(), ControllerError>> },
    ClearAll { resp: oneshot::Sender<()> },
    Navigate { route: SearchRoute, resp: oneshot::Sender<()> },
    Shutdown { resp: oneshot::Sender<()> },
}

enum Completion {
    Search { key: SearchRequest, result: anyhow::Result<SearchResponse> },
    Counts { hash: String, result: anyhow::Result<FacetCounts> },
}

#[derive(Clone)]
pub struct SearchControllerHandle {
    cmd_tx: mpsc::Sender<Command>,
    state_rx: watch::Receiver<SearchViewState>,
}

/// Starts the controller on the current runtime, seeded from `history.current()`.
pub fn spawn_search_controller<H: UrlHistory>(
    api: Arc<dyn SearchApi>,
    history: H,
    config: ControllerConfig,
) -> SearchControllerHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(64);
    let (completion_tx, completion_rx) = mpsc::unbounded_channel::<Completion>();
    let initial_route = history.current();
    let (state_tx, state_rx) = watch::channel(SearchViewState {
        filters: FilterState::with_sort(config.default_sort_by),
        route: initial_route,
        ..Default::default()
    });

    let view = state_tx.borrow().clone();
    tokio::spawn(async move {
        let mut controller = SearchController {
            api,
            history,
            debouncer: Debouncer::new(config.debounce),
            view,
            config,
            in_flight: None,
            resolved_key: None,
            counts_hash: None,
            completion_tx,
            state_tx,
        };
        controller.seed().await;
        controller.run(cmd_rx, completion_rx).await;
    });

    SearchControllerHandle { cmd_tx, state_rx }
}

impl SearchControllerHandle {
    pub fn subscribe(&self) -> watch::Receiver<SearchViewState> {
        self.state_rx.clone()
    }

    pub fn view_state(&self) -> SearchViewState {
        self.state_rx.borrow().clone()
    }

    pub fn current_route(&self) -> SearchRoute {
        self.state_rx.borrow().route.clone()
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)
    }

    /// Applies a discrete filter change immediately; the page goes back to 1.
    pub async fn set_facet(&self, change: FacetChange) -> Result<(), ControllerError> {
        self.request(|resp| Command::SetFacet { change, resp }).await
    }

    /// Records typed text; it is searched for once input pauses for the debounce window.
    pub async fn set_query_text(&self, text: impl Into<String>) -> Result<(), ControllerError> {
        let text = text.into();
        self.request(|resp| Command::SetQueryText { text, resp }).await
    }

    pub async fn set_page(&self, page: u32) -> Result<(), ControllerError> {
        self.request(|resp| Command::SetPage { page, resp }).await?
    }

    pub async fn clear_all(&self) -> Result<(), ControllerError> {
        self.request(|resp| Command::ClearAll { resp }).await
    }

    /// Reloads filters and results from `route` after the history moved to it (back, forward).
    pub async fn navigate(&self, route: SearchRoute) -> Result<(), ControllerError> {
        self.request(|resp| Command::Navigate { route, resp }).await
    }

    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }
}

struct SearchController<H> {
    api: Arc<dyn SearchApi>,
    history: H,
    config: ControllerConfig,
    debouncer: Debouncer<String>,
    view: SearchViewState,
    /// Cache key of the latest dispatched search that has not answered yet.
    in_flight: Option<SearchRequest>,
    /// Cache key behind `view.results`.
    resolved_key: Option<SearchRequest>,
    /// Hash whose counts are held or being fetched.
    counts_hash: Option<String>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    state_tx: watch::Sender<SearchViewState>,
}

impl<H: UrlHistory> SearchController<H> {
    async fn seed(&mut self) {
        let route = self.history.current();
        self.load_route(route).await;
    }

    async fn load_route(&mut self, route: SearchRoute) {
        let params = &route.params;
        let mut filters = params.to_filters(self.config.default_sort_by);

        // a bare hash (shared link) is expanded by the server
        if let Some(hash) = params.hash.clone().filter(|_| !params.has_facets()) {
            match self.api.resolve_query_hash(hash.clone()).await {
                Ok(request) => {
                    filters = FilterState::from_search_request(&request);
                    filters.page = route.page();
                }
                Err(err) => tracing::warn!(%hash, "could not resolve search hash: {err:#}"),
            }
        }

        self.debouncer.cancel();
        self.view.query_input = filters.query.clone();
        self.view.filters = filters;
        self.view.route = route;
        self.dispatch_search();
        self.publish();
    }

    async fn run(mut self, mut cmd_rx: mpsc::Receiver<Command>, mut completion_rx: mpsc::UnboundedReceiver<Completion>) {
        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    if self.handle_command(cmd).await {
                        break;
                    }
                }
                Some(completion) = completion_rx.recv() => {
                    self.handle_completion(completion);
                }
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(text) = self.debouncer.take_if_due(Instant::now()) {
                        self.settle_query_text(text);
                    }
                }
            }
        }
        tracing::debug!("search controller stopped");
    }

    /// Returns true on shutdown.
    async fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::SetFacet { change, resp } => {
                self.set_facet(change);
                let _ = resp.send(());
            }
            Command::SetQueryText { text, resp } => {
                self.view.query_input = text.clone();
                self.debouncer.push(text);
                self.publish();
                let _ = resp.send(());
            }
            Command::SetPage { page, resp } => {
                let _ = resp.send(self.set_page(page));
            }
            Command::ClearAll { resp } => {
                self.clear_all();
                let _ = resp.send(());
            }
            Command::Navigate { route, resp } => {
                tracing::info!(%route, "navigated");
                self.load_route(route).await;
                let _ = resp.send(());
            }
            Command::Shutdown { resp } => {
                let _ = resp.send(());
                return true;
            }
        }
        false
    }

    fn set_facet(&mut self, change: FacetChange) {
        let before = self.view.filters.clone();
        change.apply(&mut self.view.filters);
        if self.view.filters.same_facets(&before) {
            self.view.filters = before;
            return;
        }
        self.view.filters.page = 1;
        self.dispatch_search();
        self.publish();
    }

    fn settle_query_text(&mut self, text: String) {
        if self.view.filters.query == text {
            return;
        }
        self.view.filters.query = text;
        self.view.filters.page = 1;
        self.dispatch_search();
        self.publish();
    }

    fn set_page(&mut self, page: u32) -> Result<(), ControllerError> {
        let total_pages = self.view.total_pages();
        if page == 0 || (self.view.results.is_some() && page > total_pages) {
            return Err(ControllerError::PageOutOfRange { page, total_pages });
        }
        if self.results_are_for_other_facets() {
            return Err(ControllerError::ResultsPending);
        }
        if page == self.view.filters.page {
            return Ok(());
        }
        self.view.filters.page = page;
        self.dispatch_search();
        self.publish();
        Ok(())
    }

    /// True while a search for different facets is in flight, so `total_pages` is stale.
    fn results_are_for_other_facets(&self) -> bool {
        match (&self.in_flight, &self.resolved_key) {
            (Some(pending), Some(resolved)) => SearchRequest { page: resolved.page, ..pending.clone() } != *resolved,
            _ => false,
        }
    }

    fn clear_all(&mut self) {
        self.debouncer.cancel();
        self.view.query_input.clear();
        self.view.filters = FilterState::with_sort(self.config.default_sort_by);
        self.dispatch_search();
        self.publish();
    }

    fn dispatch_search(&mut self) {
        let request = self.view.filters.to_search_request(self.config.limit);
        let key = request.cache_key();
        if self.in_flight.as_ref() == Some(&key) {
            tracing::debug!("identical search already in flight");
            return;
        }
        if self.in_flight.is_none()
            && self.view.status == SearchStatus::Resolved
            && self.resolved_key.as_ref() == Some(&key)
        {
            tracing::debug!("identical search already resolved");
            return;
        }

        tracing::debug!(page = request.page, title = ?request.title, "dispatching search");
        self.in_flight = Some(key.clone());
        self.view.status = SearchStatus::Pending;

        let api = self.api.clone();
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = api.search_for_results(request).await;
            let _ = completion_tx.send(Completion::Search { key, result });
        });
    }

    fn fetch_counts(&mut self, hash: String) {
        self.counts_hash = Some(hash.clone());
        self.view.facet_counts = FacetCountsState::Pending;

        let api = self.api.clone();
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = api.search_counts(hash.clone()).await;
            let _ = completion_tx.send(Completion::Counts { hash, result });
        });
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Search { key, result } => {
                if self.in_flight.as_ref() != Some(&key) {
                    tracing::debug!("discarding superseded search response");
                    return;
                }
                self.in_flight = None;
                match result {
                    Ok(response) => self.on_search_resolved(key, response),
                    Err(err) => {
                        tracing::warn!("search failed: {err:#}");
                        self.view.status = SearchStatus::Failed;
                        self.view.error = Some(format!("{err:#}"));
                    }
                }
            }
            Completion::Counts { hash, result } => {
                if self.counts_hash.as_deref() != Some(hash.as_str()) {
                    tracing::debug!(%hash, "discarding counts for stale hash");
                    return;
                }
                self.view.facet_counts = match result {
                    Ok(counts) => FacetCountsState::Resolved(counts),
                    Err(err) => {
                        tracing::warn!(%hash, "facet counts unavailable: {err:#}");
                        FacetCountsState::Degraded
                    }
                };
            }
        }
        self.publish();
    }

    fn on_search_resolved(&mut self, key: SearchRequest, response: SearchResponse) {
        let hash = response.query.clone();
        self.resolved_key = Some(key.clone());
        self.view.status = SearchStatus::Resolved;
        self.view.error = None;
        self.view.results = Some(response);

        if self.counts_hash.as_deref() != Some(hash.as_str()) {
            self.fetch_counts(hash.clone());
        }

        let current = self.history.current();
        match current.hash() {
            Some(url_hash) if url_hash != hash => {
                self.view.filters.page = 1;
                let route = SearchRoute::search_page_from_filters(&self.view.filters, Some(&hash), self.config.default_sort_by);
                tracing::info!(%route, "search hash changed");
                self.history.replace(route);
                if key.page != 1 {
                    self.dispatch_search();
                }
            }
            None => {
                let route = SearchRoute::search_page_from_filters(&self.view.filters, Some(&hash), self.config.default_sort_by);
                tracing::info!(%route, "recording search hash");
                self.history.replace(route);
            }
            Some(_) => {
                if current.page() != self.view.filters.page {
                    let route = SearchRoute::new(current.params.with_page(self.view.filters.page));
                    tracing::info!(%route, "page changed");
                    self.history.push(route);
                }
            }
        }
        self.view.route = self.history.current();
    }

    fn publish(&mut self) {
        self.state_tx.send_replace(self.view.clone());
    }
}
