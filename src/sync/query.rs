//! Canonical query-string codec for facet state
//!
//! Keys whose value equals its default are omitted, so the default state
//! serializes to the empty string. Hydration accepts `chain` as an alias
//! of `network` and resolves missing or invalid values to defaults, so it
//! cannot fail.

use std::collections::BTreeSet;

use url::form_urlencoded;

use crate::domain::record::{Mode, Stage};
use crate::domain::sort::{is_known_column, SortDirection, SortSpec};
use crate::filter::FilterState;

/// Serialize state to its canonical query string.
pub fn serialize_query(state: &FilterState, universe: &BTreeSet<String>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if !state.all_networks(universe) && !state.network.is_empty() {
        let joined = state
            .network
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        query.append_pair("network", &joined);
    }
    if let Some(stage) = state.stage {
        query.append_pair("stage", stage.as_query());
    }
    if state.mode != Mode::default_for(state.stage) {
        query.append_pair("mode", state.mode.as_query());
    }
    if let Some(category) = &state.category {
        query.append_pair("category", category);
    }
    if state.favorites_only {
        query.append_pair("favorites", "1");
    }
    if !state.search.is_empty() {
        query.append_pair("search", &state.search);
    }
    let default_sort = SortSpec::primary();
    if state.sort.column != default_sort.column {
        query.append_pair("sort", &state.sort.column);
    }
    if state.sort.direction != SortDirection::Descending {
        query.append_pair("direction", state.sort.direction.as_query());
    }
    if state.page > 1 {
        query.append_pair("page", &state.page.to_string());
    }

    query.finish()
}

/// Hydrate state from a query string.
pub fn parse_query(query: &str, universe: &BTreeSet<String>) -> FilterState {
    let mut state = FilterState::new(universe);
    let mut mode = None;

    let query = query.trim_start_matches('?');
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "network" | "chain" => {
                if value.trim().eq_ignore_ascii_case("all") {
                    continue;
                }
                let selected: BTreeSet<String> = value
                    .split(',')
                    .map(|part| part.trim().to_lowercase())
                    .filter(|part| universe.contains(part))
                    .collect();
                if !selected.is_empty() {
                    state.network = selected;
                }
            }
            "stage" => state.stage = Stage::parse(&value),
            "mode" => mode = Mode::parse(&value),
            "category" => {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    state.category = Some(trimmed.to_string());
                }
            }
            "favorites" => {
                state.favorites_only = matches!(value.as_ref(), "1" | "true");
            }
            "search" => state.search = value.into_owned(),
            "sort" => {
                if is_known_column(&value) {
                    state.sort.column = value.into_owned();
                }
            }
            "direction" => {
                if let Some(direction) = SortDirection::parse(&value) {
                    state.sort.direction = direction;
                }
            }
            "page" => {
                if let Ok(page) = value.trim().parse::<u32>() {
                    if page >= 1 {
                        state.page = page;
                    }
                }
            }
            _ => {}
        }
    }

    state.mode = mode.unwrap_or(Mode::default_for(state.stage));
    state
}
