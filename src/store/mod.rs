//! The closure row store.
//!
//! [`RowTable`] is the single relation everything else reads and writes:
//! an id-keyed map of [`ClosureRow`]s with secondary indexes by each
//! endpoint, so the maintenance joins can select rows ending or starting
//! at a node without scanning the table. A version counter is bumped on
//! every mutation; rebuild uses it to detect concurrent writers between
//! its snapshot and apply phases.
//!
//! The table itself performs no locking. The owning [`Dag`](crate::Dag)
//! wraps it in a `parking_lot::RwLock` and takes one write guard for
//! each edge operation, which is the atomicity boundary of the engine.

pub(crate) mod group;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::{ClosureRow, EdgeId, NodeId, RowKey, WeightVector};

#[derive(Debug, Default)]
pub(crate) struct RowTable {
    rows: BTreeMap<EdgeId, ClosureRow>,
    by_from: HashMap<NodeId, BTreeSet<EdgeId>>,
    by_to: HashMap<NodeId, BTreeSet<EdgeId>>,
    next_id: EdgeId,
    version: u64,
}

impl RowTable {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Mutation counter, bumped once per row-level write.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, id: EdgeId) -> Option<&ClosureRow> {
        self.rows.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClosureRow> {
        self.rows.values()
    }

    /// Rows starting at `node`, in id order.
    pub fn rows_from(&self, node: NodeId) -> impl Iterator<Item = &ClosureRow> {
        self.by_from
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(|id| self.rows.get(id))
    }

    /// Rows ending at `node`, in id order.
    pub fn rows_to(&self, node: NodeId) -> impl Iterator<Item = &ClosureRow> {
        self.by_to
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(|id| self.rows.get(id))
    }

    /// Rows whose weight vector totals exactly one.
    pub fn direct_rows(&self) -> impl Iterator<Item = &ClosureRow> {
        self.rows.values().filter(|row| row.is_direct())
    }

    /// Equality selection by endpoints and full weight vector.
    pub fn find_key(&self, key: &RowKey) -> Option<EdgeId> {
        self.rows_from(key.from)
            .find(|row| row.to == key.to && row.weights == key.weights)
            .map(|row| row.id)
    }

    pub fn insert(
        &mut self,
        from: NodeId,
        to: NodeId,
        weights: WeightVector,
        count: u64,
    ) -> EdgeId {
        let id = self.next_id;
        self.next_id += 1;
        self.by_from.entry(from).or_default().insert(id);
        self.by_to.entry(to).or_default().insert(id);
        self.rows.insert(
            id,
            ClosureRow {
                id,
                from,
                to,
                weights,
                count,
            },
        );
        self.version += 1;
        id
    }

    /// Re-inserts a row under its original id, used when loading a
    /// snapshot. Fails on id collisions.
    pub fn restore(&mut self, row: ClosureRow) -> Result<(), EdgeId> {
        if self.rows.contains_key(&row.id) {
            return Err(row.id);
        }
        self.next_id = self.next_id.max(row.id + 1);
        self.by_from.entry(row.from).or_default().insert(row.id);
        self.by_to.entry(row.to).or_default().insert(row.id);
        self.rows.insert(row.id, row);
        self.version += 1;
        Ok(())
    }

    pub fn remove(&mut self, id: EdgeId) -> Option<ClosureRow> {
        let row = self.rows.remove(&id)?;
        if let Some(ids) = self.by_from.get_mut(&row.from) {
            ids.remove(&id);
        }
        if let Some(ids) = self.by_to.get_mut(&row.to) {
            ids.remove(&id);
        }
        self.version += 1;
        Some(row)
    }

    /// Adds `delta` to a row's multiplicity.
    pub fn add_count(&mut self, id: EdgeId, delta: u64) {
        if let Some(row) = self.rows.get_mut(&id) {
            row.count += delta;
            self.version += 1;
        }
    }

    pub fn set_count(&mut self, id: EdgeId, count: u64) {
        if let Some(row) = self.rows.get_mut(&id) {
            row.count = count;
            self.version += 1;
        }
    }

    /// Subtracts `delta` from a row's multiplicity, removing the row
    /// when it reaches zero. Callers must have verified `delta` does not
    /// exceed the stored count.
    pub fn retract_count(&mut self, id: EdgeId, delta: u64) {
        let Some(row) = self.rows.get_mut(&id) else {
            return;
        };
        if row.count > delta {
            row.count -= delta;
            self.version += 1;
        } else {
            self.remove(id);
        }
    }

    /// Re-points a direct row in place, keeping its id.
    pub fn update_row(
        &mut self,
        id: EdgeId,
        from: NodeId,
        to: NodeId,
        weights: WeightVector,
    ) -> Option<ClosureRow> {
        let old = self.rows.get(&id)?.clone();
        if let Some(ids) = self.by_from.get_mut(&old.from) {
            ids.remove(&id);
        }
        if let Some(ids) = self.by_to.get_mut(&old.to) {
            ids.remove(&id);
        }
        self.by_from.entry(from).or_default().insert(id);
        self.by_to.entry(to).or_default().insert(id);
        let row = self.rows.get_mut(&id)?;
        row.from = from;
        row.to = to;
        row.weights = weights;
        self.version += 1;
        Some(old)
    }

    /// Bulk upsert with count accumulation: each key's contribution is
    /// added to the existing row's multiplicity, or inserted as a new
    /// row when the key is absent.
    pub fn apply_additions(&mut self, additions: HashMap<RowKey, u64>) -> usize {
        let mut inserted = 0;
        for (key, contributed) in additions {
            match self.find_key(&key) {
                Some(id) => self.add_count(id, contributed),
                None => {
                    self.insert(key.from, key.to, key.weights, contributed);
                    inserted += 1;
                }
            }
        }
        inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(a: u32, b: u32) -> WeightVector {
        WeightVector::from_columns(vec![a, b])
    }

    #[test]
    fn indexes_track_inserts_and_removals() {
        let mut table = RowTable::new();
        let ab = table.insert(1, 2, vec2(1, 0), 1);
        let bc = table.insert(2, 3, vec2(1, 0), 1);

        assert_eq!(table.rows_from(2).count(), 1);
        assert_eq!(table.rows_to(2).count(), 1);

        table.remove(ab);
        assert_eq!(table.rows_to(2).count(), 0);
        assert!(table.get(bc).is_some());
    }

    #[test]
    fn find_key_matches_full_vector() {
        let mut table = RowTable::new();
        table.insert(1, 2, vec2(1, 0), 1);
        table.insert(1, 2, vec2(0, 1), 1);

        let key = RowKey {
            from: 1,
            to: 2,
            weights: vec2(0, 1),
        };
        let id = table.find_key(&key).expect("row");
        assert_eq!(table.get(id).expect("row").weights, vec2(0, 1));
    }

    #[test]
    fn retract_count_removes_at_zero() {
        let mut table = RowTable::new();
        let id = table.insert(1, 3, vec2(2, 0), 2);

        table.retract_count(id, 1);
        assert_eq!(table.get(id).expect("row").count, 1);

        table.retract_count(id, 1);
        assert!(table.get(id).is_none());
    }

    #[test]
    fn apply_additions_merges_existing_keys() {
        let mut table = RowTable::new();
        let id = table.insert(1, 3, vec2(2, 0), 1);

        let mut additions = HashMap::new();
        additions.insert(
            RowKey {
                from: 1,
                to: 3,
                weights: vec2(2, 0),
            },
            2,
        );
        additions.insert(
            RowKey {
                from: 1,
                to: 4,
                weights: vec2(3, 0),
            },
            1,
        );

        let inserted = table.apply_additions(additions);
        assert_eq!(inserted, 1);
        assert_eq!(table.get(id).expect("row").count, 3);
    }

    #[test]
    fn update_row_reindexes_endpoints() {
        let mut table = RowTable::new();
        let id = table.insert(1, 2, vec2(1, 0), 1);

        table.update_row(id, 4, 2, vec2(1, 0)).expect("update");
        assert_eq!(table.rows_from(1).count(), 0);
        assert_eq!(table.rows_from(4).count(), 1);
        assert_eq!(table.get(id).expect("row").from, 4);
    }
}
