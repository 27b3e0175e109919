pub mod action;

pub use action::{FacetChange, ViewMode};
