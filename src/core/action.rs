//! Facet-change vocabulary routed through the filter transition function

use crate::domain::record::{Mode, Stage};

/// One discrete facet mutation. Every mutation site builds one of these
/// and hands it to `FilterState::apply`, which owns the page-reset rule,
/// so no call site can forget it.
#[derive(Debug, Clone, PartialEq)]
pub enum FacetChange {
    /// Select a lifecycle stage, or `None` for all stages.
    Stage(Option<Stage>),
    Mode(Mode),
    /// Select a category, or `None` for all categories.
    Category(Option<String>),
    /// Flip one network in or out of the selection.
    ToggleNetwork(String),
    Search(String),
    FavoritesOnly(bool),
    /// Choose a sort column; choosing the active one flips direction.
    Sort(String),
    Page(u32),
}

/// Which projection of the result set is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Flat,
    Grouped,
}
