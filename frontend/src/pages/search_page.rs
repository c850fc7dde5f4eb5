//! Plain-text rendering of the search page.

use std::fmt::Write;

use common::search_result::{Offer, OfferPrice, OfferTypeCount, Tag};

use crate::data_definitions::search_view_state::{SearchStatus, SearchViewState};

fn title_ellipsis(title: &str) -> String {
    if title.chars().count() > 60 {
        title.chars().take(58).collect::<String>() + "..."
    } else {
        title.to_string()
    }
}

fn format_minor_units(amount: u64) -> String {
    format!("{}.{:02}", amount / 100, amount % 100)
}

fn format_price(price: &OfferPrice) -> String {
    if price.is_discounted() {
        format!(
            "{} {} (was {})",
            price.currency_code,
            format_minor_units(price.discount_price),
            format_minor_units(price.original_price)
        )
    } else {
        format!("{} {}", price.currency_code, format_minor_units(price.original_price))
    }
}

fn offer_line(index: u64, offer: &Offer) -> String {
    let mut line = format!("{:>4}. {}", index, title_ellipsis(&offer.title));
    if let Some(offer_type) = &offer.offer_type {
        let _ = write!(line, " [{offer_type}]");
    }
    if let Some(price) = &offer.price {
        let _ = write!(line, " {}", format_price(price));
    }
    line
}

/// Active filters shown as pills above the results.
fn filter_pills(state: &SearchViewState) -> Vec<String> {
    let filters = &state.filters;
    let mut pills = Vec::new();
    if !filters.query.is_empty() {
        pills.push(format!("\"{}\"", filters.query));
    }
    pills.extend(filters.selected_tags.iter().map(|t| format!("tag:{t}")));
    pills.extend(filters.categories.iter().map(|c| format!("category:{c}")));
    if let Some(offer_type) = &filters.selected_offer_type {
        pills.push(format!("type:{offer_type}"));
    }
    if let Some(on_sale) = filters.is_sale {
        pills.push(if on_sale { "on sale".to_string() } else { "not on sale".to_string() });
    }
    if let Some(codes) = filters.is_code_redemption_only {
        pills.push(if codes { "code redemption only".to_string() } else { "no code redemption".to_string() });
    }
    let range = filters.price_range;
    if !range.is_unbounded() {
        let side = |v: Option<u64>| v.map(|v| v.to_string()).unwrap_or("*".to_string());
        pills.push(format!("price:{}-{}", side(range.min), side(range.max)));
    }
    pills
}

pub fn render_search_page(state: &SearchViewState) -> String {
    let mut out = String::new();
    let filters = &state.filters;

    let _ = writeln!(out, "== {} ==", state.route);
    let _ = write!(out, "sort: {} {}", filters.sort_by.display_name(), filters.sort_dir);
    if let Some(results) = &state.results {
        let _ = write!(out, " | {} results | page {}/{}", results.total, filters.page, state.total_pages().max(1));
    }
    out.push('\n');

    let pills = filter_pills(state);
    if !pills.is_empty() {
        let _ = writeln!(out, "filters: {}", pills.join(", "));
    }
    if state.query_input != filters.query {
        let _ = writeln!(out, "typing: {}", state.query_input);
    }

    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error: {error}");
    }

    match &state.results {
        None if state.status == SearchStatus::Pending => out.push_str("Loading...\n"),
        None => {}
        Some(results) if results.elements.is_empty() => out.push_str("No results found\n"),
        Some(results) => {
            if state.is_loading() {
                out.push_str("(refreshing)\n");
            }
            let offset = (results.page.max(1) as u64 - 1) * results.limit as u64;
            for (i, offer) in results.elements.iter().enumerate() {
                let _ = writeln!(out, "{}", offer_line(offset + i as u64 + 1, offer));
            }
        }
    }

    if state.show_pagination() {
        let page = filters.page;
        let prev = if state.can_go_to_page(page.saturating_sub(1)) { "< prev" } else { "      " };
        let next = if state.can_go_to_page(page + 1) { "next >" } else { "" };
        let _ = writeln!(out, "{prev}  page {page} of {}  {next}", state.total_pages());
    }
    out
}

/// Tag and offer-type lists, hiding facets with no matches for the current hash.
pub fn render_facets(state: &SearchViewState, tags: &[Tag], offer_types: &[OfferTypeCount]) -> String {
    let mut out = String::new();
    let counts = state.counts();

    out.push_str("tags:\n");
    for tag in tags.iter().filter(|t| state.is_tag_visible(&t.id)) {
        let selected = if state.filters.selected_tags.contains(&tag.id) { "x" } else { " " };
        let _ = write!(out, "  [{selected}] {} ({})", tag.name, tag.id);
        if let Some(count) = counts.and_then(|c| c.tag_count(&tag.id)) {
            let _ = write!(out, " {count}");
        }
        out.push('\n');
    }

    out.push_str("offer types:\n");
    for offer_type in offer_types.iter().filter(|o| state.is_offer_type_visible(&o.id)) {
        let selected = if state.filters.selected_offer_type.as_deref() == Some(offer_type.id.as_str()) { "x" } else { " " };
        let count = counts.and_then(|c| c.offer_type_count(&offer_type.id)).unwrap_or(offer_type.count);
        let _ = writeln!(out, "  [{selected}] {} {}", offer_type.id, count);
    }
    out
}
