//! Central board state: records in, visible views out
//!
//! `Board` wires the engine together the way a page uses it: the data
//! layer supplies records, every UI event lands on one method, and the
//! presentation layer reads back visible slices plus the state it needs
//! for active-facet affordances. URL pushes are harvested by the host via
//! [`Board::take_pending_push`] rather than performed here.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use tracing::debug;

use crate::config::Config;
use crate::core::{FacetChange, ViewMode};
use crate::domain::group::{group_records, sort_groups_by_aggregate, MarketGroup};
use crate::domain::record::{MarketRecord, Mode, Stage};
use crate::domain::sort::{sort_member_indices, SortDirection, SortSpec};
use crate::filter::FilterState;
use crate::reveal::RevealWindow;
use crate::store::FavoritesStore;
use crate::sync::{parse_query, serialize_query, UrlSync};

/// One group as handed to the presentation layer: already filtered,
/// already sorted, members borrowed from the board's records.
#[derive(Debug)]
pub struct GroupView<'a> {
    pub key: &'a str,
    pub display_name: &'a str,
    pub aggregate: &'a str,
    pub members: Vec<&'a MarketRecord>,
}

#[derive(Debug)]
pub struct Board {
    records: Vec<MarketRecord>,
    /// Groups and their aggregates, rebuilt once per data refresh.
    groups: Vec<MarketGroup>,
    universe: BTreeSet<String>,
    merge_networks: bool,
    filter: FilterState,
    /// Group-local sort overrides; a group without one follows the global
    /// sort. Session-only display preference, not a facet.
    group_sorts: BTreeMap<String, SortSpec>,
    view: ViewMode,
    flat_window: RevealWindow,
    group_window: RevealWindow,
    prev_flat_len: usize,
    prev_group_len: usize,
    favorites: FavoritesStore,
    sync: UrlSync,
}

impl Board {
    pub fn new(config: &Config) -> Self {
        let universe = config.network_universe();
        Self {
            records: Vec::new(),
            groups: Vec::new(),
            filter: FilterState::new(&universe),
            group_sorts: BTreeMap::new(),
            view: ViewMode::Grouped,
            flat_window: RevealWindow::new(config.flat_page_size, config.flat_page_size),
            group_window: RevealWindow::new(config.group_page_size, config.group_step),
            prev_flat_len: 0,
            prev_group_len: 0,
            favorites: FavoritesStore::new(),
            sync: UrlSync::new(config.search_quiet_period()),
            merge_networks: config.merge_networks_in_groups,
            universe,
        }
    }

    // === Data refresh ===

    /// Replace the record set, as on each load. Groups and their
    /// aggregates are computed here, once, not per sort.
    pub fn set_records(&mut self, records: Vec<MarketRecord>) {
        self.records = records;
        self.groups = group_records(&self.records, self.merge_networks);
        self.note_result_lengths();
        debug!(
            records = self.records.len(),
            groups = self.groups.len(),
            "record set refreshed"
        );
    }

    /// Accept records the data layer already clustered. Grouping is
    /// derived, so flattening and regrouping reproduces the clusters.
    pub fn set_grouped_records(&mut self, grouped: Vec<Vec<MarketRecord>>) {
        self.set_records(grouped.into_iter().flatten().collect());
    }

    /// Re-order display groups by their locked-value aggregate.
    pub fn order_groups_by_aggregate(&mut self) {
        sort_groups_by_aggregate(&mut self.groups);
    }

    // === Facet events ===

    pub fn set_stage(&mut self, stage: Option<Stage>) {
        self.apply_facet(FacetChange::Stage(stage));
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.apply_facet(FacetChange::Mode(mode));
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.apply_facet(FacetChange::Category(category));
    }

    pub fn toggle_network(&mut self, network: &str) {
        self.apply_facet(FacetChange::ToggleNetwork(network.to_string()));
    }

    pub fn toggle_favorites_only(&mut self) {
        let flag = !self.filter.favorites_only;
        self.apply_facet(FacetChange::FavoritesOnly(flag));
    }

    /// Choose the global sort column; choosing the active one flips
    /// direction.
    pub fn sort_by(&mut self, column: &str) {
        self.apply_facet(FacetChange::Sort(column.to_string()));
    }

    /// Search edits update in-memory state immediately so the UI stays
    /// responsive; the URL write waits out the quiet period and each
    /// keystroke cancels the previous pending write.
    pub fn set_search(&mut self, text: impl Into<String>, now: Instant) {
        self.filter
            .apply(FacetChange::Search(text.into()), &self.universe);
        self.reset_windows_if_results_changed();
        self.sync.schedule_search_write(now);
    }

    // === Pagination ===

    pub fn set_page(&mut self, page: u32) {
        self.filter.apply(FacetChange::Page(page), &self.universe);
        self.flat_window.set_page_count(self.filter.page);
        self.push_current_state();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.filter.page + 1);
    }

    /// The host reports scroll proximity to the end of rendered content.
    /// The active view's window advances by its own step; the flat view
    /// keeps the page parameter aligned with its reveal depth.
    pub fn near_end_reached(&mut self) {
        match self.view {
            ViewMode::Grouped => {
                let available = self.visible_group_len();
                self.group_window.advance(available);
            }
            ViewMode::Flat => {
                let available = self.filtered_indices().len();
                self.flat_window.advance(available);
                let page = self.flat_window.page_count();
                if page != self.filter.page {
                    self.filter.apply(FacetChange::Page(page), &self.universe);
                    self.push_current_state();
                }
            }
        }
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    // === Favorites ===

    /// Independent of every facet; never blocked by in-flight pushes or
    /// anything else. Returns whether the id is now a favorite.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let favored = self.favorites.toggle(id);
        self.note_result_lengths();
        favored
    }

    // === Per-group sort ===

    /// Group-local sort override, same toggle semantics as the global
    /// sort. Does not touch facets, the page, or the URL.
    pub fn sort_group_by(&mut self, group_key: &str, column: &str) {
        let next = match self.group_sorts.get(group_key) {
            Some(spec) => spec.toggled(column),
            None => SortSpec::default_for(column),
        };
        self.group_sorts.insert(group_key.to_string(), next);
    }

    // === URL synchronization ===

    /// An external URL change: initial load or back/forward navigation.
    /// Echoes of this board's own push are absorbed.
    pub fn url_changed(&mut self, query: &str) {
        if !self.sync.observe_external(query) {
            return;
        }
        self.filter = parse_query(query, &self.universe);
        self.reset_windows_if_results_changed();
        self.flat_window.set_page_count(self.filter.page);
        debug!(%query, "hydrated facet state from url");
    }

    /// Next navigation for the host to perform, if any. The host should
    /// issue it without scrolling and report back via
    /// [`Board::push_settled`].
    pub fn take_pending_push(&mut self) -> Option<String> {
        self.sync.take_pending_push()
    }

    /// The host's navigation resolved.
    pub fn push_settled(&mut self) {
        self.sync.push_settled();
    }

    /// Drive time-based completions; the engine owns no timer. Fires the
    /// debounced search write once its quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if self.sync.search_write_due(now) {
            self.sync.cancel_search_write();
            self.push_current_state();
        }
    }

    // === Outbound views ===

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Direction marker for a column header, when that column is the
    /// active global sort.
    pub fn sort_indicator(&self, column: &str) -> Option<SortDirection> {
        (self.filter.sort.column == column).then_some(self.filter.sort.direction)
    }

    pub fn group_sort_indicator(&self, group_key: &str, column: &str) -> Option<SortDirection> {
        let spec = self.effective_group_sort(group_key);
        (spec.column == column).then_some(spec.direction)
    }

    /// The flat view: filtered, sorted, cut to the reveal window.
    pub fn visible_flat(&self) -> Vec<&MarketRecord> {
        let indices = self.filtered_indices();
        sort_member_indices(&self.records, &indices, &self.filter.sort)
            .into_iter()
            .take(self.flat_window.count())
            .filter_map(|idx| self.records.get(idx))
            .collect()
    }

    /// The grouped view: groups with at least one matching member, in
    /// display order, cut to the grouped reveal window, each group's
    /// members sorted by its effective sort.
    pub fn visible_groups(&self) -> Vec<GroupView<'_>> {
        let filtered: BTreeSet<usize> = self.filtered_indices().into_iter().collect();
        self.groups
            .iter()
            .filter_map(|group| {
                let members: Vec<usize> = group
                    .member_indices
                    .iter()
                    .copied()
                    .filter(|idx| filtered.contains(idx))
                    .collect();
                if members.is_empty() {
                    return None;
                }
                let spec = self.effective_group_sort(&group.key);
                let members = sort_member_indices(&self.records, &members, &spec)
                    .into_iter()
                    .filter_map(|idx| self.records.get(idx))
                    .collect();
                Some(GroupView {
                    key: group.key.as_str(),
                    display_name: group.display_name.as_str(),
                    aggregate: group.aggregate_display.as_str(),
                    members,
                })
            })
            .take(self.group_window.count())
            .collect()
    }

    /// Whether the active view has results beyond its reveal window.
    pub fn has_more(&self) -> bool {
        match self.view {
            ViewMode::Flat => self.flat_window.count() < self.filtered_indices().len(),
            ViewMode::Grouped => self.group_window.count() < self.visible_group_len(),
        }
    }

    // === Internals ===

    fn apply_facet(&mut self, change: FacetChange) {
        self.filter.apply(change, &self.universe);
        self.reset_windows_if_results_changed();
        self.push_current_state();
    }

    fn push_current_state(&mut self) {
        self.sync
            .request_push(serialize_query(&self.filter, &self.universe));
    }

    fn filtered_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.filter.matches(record, &self.favorites, &self.universe))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn visible_group_len(&self) -> usize {
        let filtered: BTreeSet<usize> = self.filtered_indices().into_iter().collect();
        self.groups
            .iter()
            .filter(|group| {
                group
                    .member_indices
                    .iter()
                    .any(|idx| filtered.contains(idx))
            })
            .count()
    }

    fn effective_group_sort(&self, group_key: &str) -> SortSpec {
        self.group_sorts
            .get(group_key)
            .cloned()
            .unwrap_or_else(|| self.filter.sort.clone())
    }

    /// A facet-driven recompute resets a view's window only when the
    /// result length it feeds actually changed; reveal steps never reset.
    fn reset_windows_if_results_changed(&mut self) {
        let flat_len = self.filtered_indices().len();
        let group_len = self.visible_group_len();
        if flat_len != self.prev_flat_len {
            self.flat_window.reset();
        }
        if group_len != self.prev_group_len {
            self.group_window.reset();
        }
        self.prev_flat_len = flat_len;
        self.prev_group_len = group_len;
    }

    /// Track result lengths without resetting, for recomputes that are
    /// not facet-driven (data refresh, favorite toggles).
    fn note_result_lengths(&mut self) {
        self.prev_flat_len = self.filtered_indices().len();
        self.prev_group_len = self.visible_group_len();
    }
}
