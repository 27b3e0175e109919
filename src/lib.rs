//! State engine for a token-launch board and its yield-market tables.
//!
//! The host page supplies market records and forwards discrete UI events
//! (facet clicks, search keystrokes, scroll proximity, navigation
//! callbacks); the engine answers with visible record/group slices, active
//! facet state, and the canonical URL query to push. Rendering and data
//! fetching stay outside.

pub mod board;
pub mod config;
pub mod core;
pub mod domain;
pub mod filter;
pub mod reveal;
pub mod store;
pub mod sync;

pub use crate::board::{Board, GroupView};
pub use crate::config::Config;
pub use crate::core::{FacetChange, ViewMode};
pub use crate::domain::record::{MarketRecord, Mode, Stage, YieldComponents};
pub use crate::domain::sort::{columns, SortDirection, SortSpec};
pub use crate::domain::value::{format_magnitude, parse_display_value};
pub use crate::filter::FilterState;
pub use crate::reveal::RevealWindow;
pub use crate::store::FavoritesStore;
pub use crate::sync::{parse_query, serialize_query, UrlSync};
