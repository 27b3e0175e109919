//! Ordering of market records by display columns

use std::cmp::Ordering;

use super::record::MarketRecord;
use super::value::parse_display_value;

/// Column names shared between the data layer and the sort engine.
pub mod columns {
    pub const MARKET_CAP: &str = "marketCap";
    pub const TOTAL_LOCKED: &str = "totalLocked";
    pub const VOLUME_24H: &str = "volume24h";
    pub const PRICE: &str = "price";
    pub const CHANGE_24H: &str = "change24h";
    pub const APY: &str = "apy";
    pub const YT_REDEEMABLE: &str = "ytRedeemable";
}

/// How a column's comparable value is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Parse the display string as a currency magnitude.
    ParsedMagnitude,
    /// Parse the display string as a signed percentage.
    ParsedPercent,
    /// Compute from the record's raw yield components.
    ComputedRatio,
}

const COLUMN_TABLE: [(&str, ColumnKind); 7] = [
    (columns::MARKET_CAP, ColumnKind::ParsedMagnitude),
    (columns::TOTAL_LOCKED, ColumnKind::ParsedMagnitude),
    (columns::VOLUME_24H, ColumnKind::ParsedMagnitude),
    (columns::PRICE, ColumnKind::ParsedMagnitude),
    (columns::CHANGE_24H, ColumnKind::ParsedPercent),
    (columns::APY, ColumnKind::ParsedPercent),
    (columns::YT_REDEEMABLE, ColumnKind::ComputedRatio),
];

pub fn is_known_column(name: &str) -> bool {
    COLUMN_TABLE.iter().any(|(column, _)| *column == name)
}

/// Resolve a column's kind once per sort call. Unknown columns compare as
/// plain magnitudes, which degrades to all-zero keys and original order.
pub fn column_kind(name: &str) -> ColumnKind {
    COLUMN_TABLE
        .iter()
        .find(|(column, _)| *column == name)
        .map(|(_, kind)| *kind)
        .unwrap_or(ColumnKind::ParsedMagnitude)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<SortDirection> {
        match value.trim().to_lowercase().as_str() {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Active sort column and direction for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Default sort for a freshly chosen column: magnitude columns rank
    /// largest first.
    pub fn default_for(column: &str) -> SortSpec {
        SortSpec {
            column: column.to_string(),
            direction: SortDirection::Descending,
        }
    }

    /// The sort every table starts from: locked value, largest first.
    pub fn primary() -> SortSpec {
        SortSpec::default_for(columns::TOTAL_LOCKED)
    }

    /// Choosing the active column again flips direction; choosing a new
    /// column starts from that column's default.
    pub fn toggled(&self, column: &str) -> SortSpec {
        if self.column == column {
            SortSpec {
                column: self.column.clone(),
                direction: self.direction.reversed(),
            }
        } else {
            SortSpec::default_for(column)
        }
    }
}

fn sort_key(record: &MarketRecord, column: &str, kind: ColumnKind) -> f64 {
    match kind {
        ColumnKind::ComputedRatio => record
            .yield_components
            .map(|components| components.redeemable_value())
            .unwrap_or(0.0),
        ColumnKind::ParsedMagnitude | ColumnKind::ParsedPercent => record
            .display_column(column)
            .map(parse_display_value)
            .unwrap_or(0.0),
    }
}

/// Order a set of member indices by the spec's column.
///
/// Stable for equal keys via an explicit position tie-break, so the result
/// does not depend on the host sort's stability guarantee.
pub fn sort_member_indices(
    records: &[MarketRecord],
    members: &[usize],
    spec: &SortSpec,
) -> Vec<usize> {
    let kind = column_kind(&spec.column);
    let mut keyed: Vec<(usize, f64)> = members
        .iter()
        .filter_map(|idx| records.get(*idx).map(|record| (*idx, sort_key(record, &spec.column, kind))))
        .collect();
    keyed.sort_by(|a, b| {
        let ordering = match spec.direction {
            SortDirection::Ascending => a.1.partial_cmp(&b.1),
            SortDirection::Descending => b.1.partial_cmp(&a.1),
        };
        ordering.unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0))
    });
    keyed.into_iter().map(|(idx, _)| idx).collect()
}

/// Order a whole collection by the spec's column.
pub fn sort_records(records: &[MarketRecord], spec: &SortSpec) -> Vec<usize> {
    let members: Vec<usize> = (0..records.len()).collect();
    sort_member_indices(records, &members, spec)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::record::{Mode, Stage, YieldComponents};
    use super::*;

    fn record(id: &str, locked: &str) -> MarketRecord {
        let mut cols = BTreeMap::new();
        cols.insert(columns::TOTAL_LOCKED.to_string(), locked.to_string());
        MarketRecord {
            id: id.to_string(),
            name: format!("asset-{id}"),
            symbol: id.to_uppercase(),
            network: "base".into(),
            stage: Stage::Genesis,
            mode: Mode::Normal,
            category: "meme".into(),
            columns: cols,
            yield_components: None,
        }
    }

    #[test]
    fn descending_with_original_order_tie_break() {
        let records = vec![
            record("1", "$900K"),
            record("2", "$1.20M"),
            record("3", "$1.20M"),
        ];
        let spec = SortSpec::default_for(columns::TOTAL_LOCKED);
        assert_eq!(sort_records(&records, &spec), vec![1, 2, 0]);

        let spec = SortSpec {
            direction: SortDirection::Ascending,
            ..spec
        };
        assert_eq!(sort_records(&records, &spec), vec![0, 1, 2]);
    }

    #[test]
    fn sorting_is_deterministic_and_reversible_without_ties() {
        let records = vec![
            record("1", "$3M"),
            record("2", "$900K"),
            record("3", "$7.5M"),
            record("4", "$12K"),
        ];
        let desc = SortSpec::primary();
        let first = sort_records(&records, &desc);
        assert_eq!(first, sort_records(&records, &desc));

        let asc = SortSpec {
            direction: SortDirection::Ascending,
            ..desc
        };
        let mut reversed = sort_records(&records, &asc);
        reversed.reverse();
        assert_eq!(first, reversed);
    }

    #[test]
    fn toggle_flips_direction_only_for_same_column() {
        let spec = SortSpec::primary();
        let flipped = spec.toggled(columns::TOTAL_LOCKED);
        assert_eq!(flipped.direction, SortDirection::Ascending);
        assert_eq!(flipped.column, columns::TOTAL_LOCKED);

        let switched = flipped.toggled(columns::APY);
        assert_eq!(switched.column, columns::APY);
        assert_eq!(switched.direction, SortDirection::Descending);
    }

    #[test]
    fn computed_column_ignores_display_strings() {
        let mut rich = record("1", "$1");
        rich.yield_components = Some(YieldComponents {
            accumulated_value: 10_000.0,
            unit_price: 3.0,
            outstanding_supply: 100.0,
        });
        let mut broke = record("2", "$999M");
        broke.yield_components = Some(YieldComponents {
            accumulated_value: 10_000.0,
            unit_price: 3.0,
            outstanding_supply: 0.0,
        });
        let records = vec![broke, rich];
        let spec = SortSpec::default_for(columns::YT_REDEEMABLE);
        assert_eq!(sort_records(&records, &spec), vec![1, 0]);
    }

    #[test]
    fn missing_column_sorts_to_the_bottom_descending() {
        let mut no_column = record("1", "$5M");
        no_column.columns.clear();
        let records = vec![no_column, record("2", "$1K")];
        let spec = SortSpec::primary();
        assert_eq!(sort_records(&records, &spec), vec![1, 0]);
    }
}
