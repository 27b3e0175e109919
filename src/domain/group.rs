//! Grouping of market records by asset identity

use std::collections::BTreeMap;

use super::record::MarketRecord;
use super::value::{format_magnitude, parse_display_value};

/// A cluster of records sharing an asset identity, displayed and sortable
/// as a unit. Members stay leaf records; only the display group merges.
#[derive(Debug, Clone)]
pub struct MarketGroup {
    pub key: String,
    pub display_name: String,
    /// Indices into the record collection the group was built from.
    pub member_indices: Vec<usize>,
    /// Summed locked value, formatted once at grouping time.
    pub aggregate_display: String,
}

/// Partition records into groups, in insertion order of first occurrence.
///
/// The grouping key is derived from each record, never stored redundantly,
/// so regrouping a flattening of the result reproduces identical groups.
pub fn group_records(records: &[MarketRecord], merge_networks: bool) -> Vec<MarketGroup> {
    let mut groups: Vec<MarketGroup> = Vec::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();

    for (idx, record) in records.iter().enumerate() {
        let key = record.group_key(merge_networks);
        let pos = match positions.get(&key) {
            Some(pos) => *pos,
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(MarketGroup {
                    key,
                    display_name: record.name.clone(),
                    member_indices: Vec::new(),
                    aggregate_display: String::new(),
                });
                groups.len() - 1
            }
        };
        groups[pos].member_indices.push(idx);
    }

    for group in &mut groups {
        let total: f64 = group
            .member_indices
            .iter()
            .filter_map(|idx| records.get(*idx))
            .map(MarketRecord::locked_value)
            .sum();
        group.aggregate_display = format_magnitude(total);
    }

    groups
}

/// Re-order groups by their locked-value aggregate, largest first, keeping
/// insertion order between equals.
pub fn sort_groups_by_aggregate(groups: &mut [MarketGroup]) {
    let mut keyed: Vec<(usize, f64)> = groups
        .iter()
        .enumerate()
        .map(|(idx, group)| (idx, parse_display_value(&group.aggregate_display)))
        .collect();
    keyed.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    let order: Vec<usize> = keyed.into_iter().map(|(idx, _)| idx).collect();
    let mut reordered: Vec<MarketGroup> = order.iter().map(|idx| groups[*idx].clone()).collect();
    groups.swap_with_slice(&mut reordered);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::record::{Mode, Stage};
    use super::super::sort::columns;
    use super::*;

    fn record(name: &str, network: &str, locked: &str) -> MarketRecord {
        let mut cols = BTreeMap::new();
        cols.insert(columns::TOTAL_LOCKED.to_string(), locked.to_string());
        MarketRecord {
            id: format!("{name}-{network}"),
            name: name.to_string(),
            symbol: name.to_uppercase(),
            network: network.to_string(),
            stage: Stage::Genesis,
            mode: Mode::Normal,
            category: "meme".into(),
            columns: cols,
            yield_components: None,
        }
    }

    #[test]
    fn merged_groups_fold_networks_and_sum_aggregates() {
        let records = vec![
            record("Mooncat", "base", "$600K"),
            record("Pixel", "base", "$1M"),
            record("Mooncat", "ethereum", "$400K"),
        ];
        let groups = group_records(&records, true);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "mooncat");
        assert_eq!(groups[0].member_indices, vec![0, 2]);
        assert_eq!(groups[0].aggregate_display, "$1M");
        assert_eq!(groups[1].member_indices, vec![1]);
    }

    #[test]
    fn unmerged_groups_stay_distinct_per_network() {
        let records = vec![
            record("Mooncat", "base", "$600K"),
            record("Mooncat", "ethereum", "$400K"),
        ];
        let groups = group_records(&records, false);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn regrouping_a_flattening_is_idempotent() {
        let records = vec![
            record("Mooncat", "base", "$600K"),
            record("Pixel", "base", "$1M"),
            record("Mooncat", "ethereum", "$400K"),
        ];
        let groups = group_records(&records, true);
        let flattened: Vec<MarketRecord> = groups
            .iter()
            .flat_map(|group| group.member_indices.iter().map(|idx| records[*idx].clone()))
            .collect();
        let regrouped = group_records(&flattened, true);
        assert_eq!(regrouped.len(), groups.len());
        for (a, b) in groups.iter().zip(regrouped.iter()) {
            assert_eq!(a.key, b.key);
            assert_eq!(a.member_indices.len(), b.member_indices.len());
            assert_eq!(a.aggregate_display, b.aggregate_display);
        }
    }

    #[test]
    fn aggregate_ordering_is_largest_first() {
        let records = vec![
            record("Small", "base", "$100K"),
            record("Large", "base", "$9M"),
            record("Mid", "base", "$1M"),
        ];
        let mut groups = group_records(&records, true);
        sort_groups_by_aggregate(&mut groups);
        let names: Vec<&str> = groups.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(names, vec!["Large", "Mid", "Small"]);
    }
}
