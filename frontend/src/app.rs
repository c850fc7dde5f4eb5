//! Terminal driver: stdin commands in, rendered search page out.

use std::sync::Arc;

use common::search_result::{OfferTypeCount, Tag};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    api::search_api::SearchApi,
    components::command_input::{HELP, TerminalCommand, parse_command},
    controller::filter_search_controller::{FacetChange, SearchControllerHandle},
    data_definitions::url_history::MemoryHistory,
    pages::search_page::{render_facets, render_search_page},
};

/// What the caller should do after one input line.
#[derive(Debug, PartialEq)]
pub enum LineOutcome {
    Print(String),
    Nothing,
    Quit,
}

pub struct App {
    handle: SearchControllerHandle,
    api: Arc<dyn SearchApi>,
    /// Shared with the controller, which pushes and replaces entries.
    history: MemoryHistory,
    catalog: Option<(Vec<Tag>, Vec<OfferTypeCount>)>,
}

impl App {
    pub fn new(handle: SearchControllerHandle, api: Arc<dyn SearchApi>, history: MemoryHistory) -> Self {
        Self { handle, api, history, catalog: None }
    }

    async fn catalog(&mut self) -> anyhow::Result<&(Vec<Tag>, Vec<OfferTypeCount>)> {
        if self.catalog.is_none() {
            self.catalog = Some(self.api.search_filter_catalog().await?);
        }
        self.catalog.as_ref().ok_or_else(|| anyhow::anyhow!("filter catalog unavailable"))
    }

    pub async fn handle_line(&mut self, line: &str) -> anyhow::Result<LineOutcome> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(message) => return Ok(LineOutcome::Print(message)),
        };
        tracing::debug!(?command, "terminal command");

        let page = self.handle.view_state().filters.page;
        let result = match command {
            TerminalCommand::Query(text) => self.handle.set_query_text(text).await,
            TerminalCommand::Facet(change) => self.handle.set_facet(change).await,
            TerminalCommand::Sort(field, dir) => {
                self.handle.set_facet(FacetChange::SortBy(field)).await?;
                match dir {
                    Some(dir) => self.handle.set_facet(FacetChange::SortDir(dir)).await,
                    None => Ok(()),
                }
            }
            TerminalCommand::Page(page) => self.handle.set_page(page).await,
            TerminalCommand::NextPage => self.handle.set_page(page + 1).await,
            TerminalCommand::PrevPage => self.handle.set_page(page.saturating_sub(1)).await,
            TerminalCommand::Back => match self.history.back() {
                Some(route) => self.handle.navigate(route).await,
                None => return Ok(LineOutcome::Print("no earlier page".to_string())),
            },
            TerminalCommand::Forward => match self.history.forward() {
                Some(route) => self.handle.navigate(route).await,
                None => return Ok(LineOutcome::Print("no later page".to_string())),
            },
            TerminalCommand::ClearAll => self.handle.clear_all().await,
            TerminalCommand::ShowTags => {
                let state = self.handle.view_state();
                let (tags, _) = self.catalog().await?;
                return Ok(LineOutcome::Print(render_facets(&state, tags, &[])));
            }
            TerminalCommand::ShowOfferTypes => {
                let state = self.handle.view_state();
                let (_, offer_types) = self.catalog().await?;
                return Ok(LineOutcome::Print(render_facets(&state, &[], offer_types)));
            }
            TerminalCommand::ShowUrl => return Ok(LineOutcome::Print(self.handle.current_route().to_string())),
            TerminalCommand::Help => return Ok(LineOutcome::Print(HELP.to_string())),
            TerminalCommand::Quit => {
                self.handle.shutdown().await?;
                return Ok(LineOutcome::Quit);
            }
        };
        match result {
            Ok(()) => Ok(LineOutcome::Nothing),
            // out-of-range pages are reported, not fatal
            Err(err) => Ok(LineOutcome::Print(err.to_string())),
        }
    }

    /// Reads commands until `quit` or end of input, printing the page on every state change.
    pub async fn run(mut self, input: impl AsyncBufRead + Unpin) -> anyhow::Result<()> {
        let mut lines = input.lines();
        let mut state_rx = self.handle.subscribe();
        let mut last_render = String::new();

        loop {
            tokio::select! {
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        tracing::info!("search controller stopped");
                        break;
                    }
                    let page = render_search_page(&state_rx.borrow_and_update());
                    if page != last_render {
                        println!("{page}");
                        last_render = page;
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        self.handle.shutdown().await?;
                        break;
                    };
                    match self.handle_line(&line).await {
                        Ok(LineOutcome::Print(text)) => println!("{text}"),
                        Ok(LineOutcome::Nothing) => {}
                        Ok(LineOutcome::Quit) => break,
                        Err(err) => eprintln!("Error: {err:#}"),
                    }
                }
            }
        }
        Ok(())
    }
}
