//! Grouped aggregation and ranked partitioning over closure rows.
//!
//! These are the set operations the retract path and the integrity
//! check run against the table: group rows by their logical key with
//! summed multiplicity, and partition physical duplicates of one key
//! into a stable id-ordered ranking.

use std::collections::HashMap;

use crate::model::{ClosureRow, EdgeId, RowKey};

/// Sums multiplicities per logical key.
pub(crate) fn group_counts<'a>(
    rows: impl Iterator<Item = &'a ClosureRow>,
) -> HashMap<RowKey, u64> {
    let mut groups: HashMap<RowKey, u64> = HashMap::new();
    for row in rows {
        *groups.entry(row.key()).or_default() += row.count;
    }
    groups
}

/// Partitions rows by key, ranking members of each group by id.
///
/// A healthy table has exactly one physical row per key; any group with
/// more than one member is a duplicate that must be merged.
pub(crate) fn ranked_partition<'a>(
    rows: impl Iterator<Item = &'a ClosureRow>,
) -> Vec<(RowKey, Vec<EdgeId>)> {
    let mut groups: HashMap<RowKey, Vec<EdgeId>> = HashMap::new();
    for row in rows {
        groups.entry(row.key()).or_default().push(row.id);
    }
    let mut partitions: Vec<(RowKey, Vec<EdgeId>)> = groups.into_iter().collect();
    for (_, ids) in partitions.iter_mut() {
        ids.sort_unstable();
    }
    partitions.sort_by_key(|(key, _)| (key.from, key.to));
    partitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeightVector;

    fn row(id: EdgeId, from: u64, to: u64, weights: Vec<u32>, count: u64) -> ClosureRow {
        ClosureRow {
            id,
            from,
            to,
            weights: WeightVector::from_columns(weights),
            count,
        }
    }

    #[test]
    fn group_counts_sums_per_key() {
        let rows = vec![
            row(1, 1, 3, vec![2, 0], 1),
            row(2, 1, 3, vec![2, 0], 2),
            row(3, 1, 3, vec![0, 2], 1),
        ];
        let groups = group_counts(rows.iter());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&rows[0].key()], 3);
        assert_eq!(groups[&rows[2].key()], 1);
    }

    #[test]
    fn ranked_partition_orders_duplicates_by_id() {
        let rows = vec![
            row(7, 1, 3, vec![2, 0], 1),
            row(2, 1, 3, vec![2, 0], 1),
            row(5, 2, 3, vec![1, 0], 1),
        ];
        let partitions = ranked_partition(rows.iter());
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].1, vec![2, 7]);
        assert_eq!(partitions[1].1, vec![5]);
    }
}
