//! Line commands typed into the terminal search page.

use std::str::FromStr;

use common::search_query::{SortDir, SortField};

use crate::{controller::filter_search_controller::FacetChange, data_definitions::url_param::parse_price};

pub const HELP: &str = "\
commands:
  q <text>                 search text (debounced)
  tag <id>                 toggle a tag
  cat <name>               toggle a category
  type <id>|none           select an offer type
  sort <field> [asc|desc]  sort field, optionally with direction
  dir <asc|desc>           sort direction
  sale <on|off|any>        on-sale filter
  codes <on|off|any>       code redemption filter
  price <min>-<max>        price range, either side may be empty
  page <n> | next | prev   pagination
  back | forward           move through visited pages
  clear                    reset every filter
  tags | types             list facets with counts
  url                      print the shareable url
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum TerminalCommand {
    Query(String),
    Facet(FacetChange),
    Sort(SortField, Option<SortDir>),
    Page(u32),
    NextPage,
    PrevPage,
    Back,
    Forward,
    ClearAll,
    ShowTags,
    ShowOfferTypes,
    ShowUrl,
    Help,
    Quit,
}

fn parse_tri_state(arg: &str) -> Result<Option<bool>, String> {
    match arg {
        "on" | "yes" | "true" => Ok(Some(true)),
        "off" | "no" | "false" => Ok(Some(false)),
        "any" | "" => Ok(None),
        other => Err(format!("expected on, off or any, got {other:?}")),
    }
}

fn require<'a>(command: &str, arg: &'a str) -> Result<&'a str, String> {
    if arg.is_empty() { Err(format!("{command}: missing argument")) } else { Ok(arg) }
}

pub fn parse_command(line: &str) -> Result<TerminalCommand, String> {
    let line = line.trim();
    let (command, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let arg = arg.trim();

    let parsed = match command {
        // `q` alone clears the text
        "q" => TerminalCommand::Query(arg.to_string()),
        "tag" => TerminalCommand::Facet(FacetChange::ToggleTag(require(command, arg)?.to_string())),
        "cat" => TerminalCommand::Facet(FacetChange::ToggleCategory(require(command, arg)?.to_string())),
        "type" => match require(command, arg)? {
            "none" | "any" => TerminalCommand::Facet(FacetChange::OfferType(None)),
            id => TerminalCommand::Facet(FacetChange::OfferType(Some(id.to_string()))),
        },
        "sort" => {
            let mut parts = require(command, arg)?.split_whitespace();
            let field = SortField::from_str(parts.next().unwrap_or_default())?;
            let dir = parts.next().map(SortDir::from_str).transpose()?;
            TerminalCommand::Sort(field, dir)
        }
        "dir" => TerminalCommand::Facet(FacetChange::SortDir(SortDir::from_str(require(command, arg)?)?)),
        "sale" => TerminalCommand::Facet(FacetChange::Sale(parse_tri_state(arg)?)),
        "codes" => TerminalCommand::Facet(FacetChange::CodeRedemptionOnly(parse_tri_state(arg)?)),
        "price" => match arg {
            "" | "any" | "-" => TerminalCommand::Facet(FacetChange::Price(Default::default())),
            range => TerminalCommand::Facet(FacetChange::Price(
                parse_price(range).ok_or_else(|| format!("price: expected <min>-<max>, got {range:?}"))?,
            )),
        },
        "page" => {
            let page = require(command, arg)?.parse::<u32>().map_err(|e| format!("page: {e}"))?;
            TerminalCommand::Page(page)
        }
        "next" => TerminalCommand::NextPage,
        "prev" => TerminalCommand::PrevPage,
        "back" => TerminalCommand::Back,
        "forward" => TerminalCommand::Forward,
        "clear" => TerminalCommand::ClearAll,
        "tags" => TerminalCommand::ShowTags,
        "types" => TerminalCommand::ShowOfferTypes,
        "url" => TerminalCommand::ShowUrl,
        "help" | "?" => TerminalCommand::Help,
        "quit" | "exit" => TerminalCommand::Quit,
        "" => return Err("empty command".to_string()),
        other => return Err(format!("unknown command {other:?}, try `help`")),
    };
    Ok(parsed)
}
