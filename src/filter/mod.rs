//! Facet state and predicate application

use std::collections::BTreeSet;

use crate::core::FacetChange;
use crate::domain::record::{MarketRecord, Mode, Stage};
use crate::domain::sort::SortSpec;
use crate::store::FavoritesStore;

/// The canonical in-memory representation of every active facet.
///
/// All mutation flows through [`FilterState::apply`]; fields are public for
/// rendering active-facet affordances, not for direct assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Selected networks. The full universe means "all".
    pub network: BTreeSet<String>,
    /// Lifecycle stage, `None` for all stages.
    pub stage: Option<Stage>,
    pub mode: Mode,
    /// Free-text needle matched against name and symbol.
    pub search: String,
    /// Category, `None` for all categories.
    pub category: Option<String>,
    pub favorites_only: bool,
    pub sort: SortSpec,
    /// 1-based; never below 1.
    pub page: u32,
}

impl FilterState {
    pub fn new(universe: &BTreeSet<String>) -> Self {
        Self {
            network: universe.clone(),
            stage: None,
            mode: Mode::default_for(None),
            search: String::new(),
            category: None,
            favorites_only: false,
            sort: SortSpec::primary(),
            page: 1,
        }
    }

    /// Apply one facet change. Every change except an explicit page change
    /// resets the page to 1.
    pub fn apply(&mut self, change: FacetChange, universe: &BTreeSet<String>) {
        match change {
            FacetChange::Page(page) => {
                self.page = page.max(1);
                return;
            }
            FacetChange::Stage(stage) => {
                self.stage = stage;
                self.mode = Mode::default_for(stage);
            }
            FacetChange::Mode(mode) => self.mode = mode,
            FacetChange::Category(category) => self.category = category,
            FacetChange::ToggleNetwork(network) => self.toggle_network(&network, universe),
            FacetChange::Search(text) => self.search = text,
            FacetChange::FavoritesOnly(flag) => self.favorites_only = flag,
            FacetChange::Sort(column) => self.sort = self.sort.toggled(&column),
        }
        self.page = 1;
    }

    /// True when every network is selected.
    pub fn all_networks(&self, universe: &BTreeSet<String>) -> bool {
        self.network == *universe
    }

    /// Flip one network. Starting from "all" narrows to just that network;
    /// removing the sole remaining selection re-expands to "all", so the
    /// selection can never reach an empty set.
    fn toggle_network(&mut self, network: &str, universe: &BTreeSet<String>) {
        let network = network.trim().to_lowercase();
        if !universe.contains(&network) {
            return;
        }
        if self.all_networks(universe) {
            self.network = BTreeSet::from([network]);
            return;
        }
        if self.network.contains(&network) {
            self.network.remove(&network);
            if self.network.is_empty() {
                self.network = universe.clone();
            }
        } else {
            self.network.insert(network);
        }
    }

    /// Predicates compose by logical AND.
    pub fn matches(
        &self,
        record: &MarketRecord,
        favorites: &FavoritesStore,
        universe: &BTreeSet<String>,
    ) -> bool {
        if !self.all_networks(universe) && !self.network.contains(&record.network.to_lowercase()) {
            return false;
        }
        if let Some(stage) = self.stage {
            if record.stage != stage {
                return false;
            }
        }
        if record.mode != self.mode {
            return false;
        }
        if let Some(category) = &self.category {
            if !record.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if self.favorites_only && !favorites.has(&record.id) {
            return false;
        }
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !contains_case_insensitive(&record.name, &needle)
                && !contains_case_insensitive(&record.symbol, &needle)
            {
                return false;
            }
        }
        true
    }
}

/// Needle is expected lowercased already.
fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
