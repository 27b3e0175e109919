pub mod group;
pub mod record;
pub mod sort;
pub mod value;

pub use group::{group_records, sort_groups_by_aggregate, MarketGroup};
pub use record::{MarketRecord, Mode, Stage, YieldComponents};
pub use sort::{sort_member_indices, sort_records, ColumnKind, SortDirection, SortSpec};
pub use value::{format_magnitude, parse_display_value};
