//! Full closure reconstruction and integrity checking.
//!
//! Rebuild is the recovery path for a table suspected to be out of
//! sync, typically after raw mutation bypassed the engine. Each attempt
//! snapshots the direct edges under the read lock, derives the expected
//! closure to a fixed point in memory, then re-takes the write lock and
//! applies the difference only if no concurrent mutation moved the
//! table's version in between. An attempt either fully applies or is
//! discarded whole; exhausting the budget is fatal.

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use super::Dag;
use crate::error::{DagError, Result};
use crate::model::{ClosureRow, NodeId, RowKey, WeightVector};
use crate::store::group;

/// Outcome of a successful [`Dag::rebuild`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Attempts consumed, including the successful one.
    pub attempts: usize,
    /// Derived rows inserted because they were missing.
    pub inserted: usize,
    /// Rows removed because no direct-edge combination justifies them.
    pub removed: usize,
    /// Rows whose multiplicity was corrected in place.
    pub updated: usize,
}

impl RebuildReport {
    /// True when the table was already consistent.
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.removed == 0 && self.updated == 0
    }
}

/// A row whose stored multiplicity disagrees with the derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMismatch {
    /// Logical key of the affected row.
    pub key: RowKey,
    /// Multiplicity held by the stored row.
    pub stored: u64,
    /// Multiplicity the direct edges justify.
    pub expected: u64,
}

/// Read-only diff between the live table and the derived closure.
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    /// Justified keys with no stored row.
    pub missing: Vec<RowKey>,
    /// Stored derived rows no direct-edge combination justifies.
    pub unexpected: Vec<RowKey>,
    /// Rows present with the wrong multiplicity.
    pub count_mismatches: Vec<CountMismatch>,
    /// Keys stored as more than one physical row.
    pub duplicate_keys: Vec<RowKey>,
}

impl IntegrityReport {
    /// True when no discrepancy of any kind was found.
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty()
            && self.unexpected.is_empty()
            && self.count_mismatches.is_empty()
            && self.duplicate_keys.is_empty()
    }
}

impl Dag {
    /// Rebuilds with the configured attempt budget.
    pub fn rebuild(&self) -> Result<RebuildReport> {
        self.rebuild_with(self.config.rebuild_max_attempts)
    }

    /// Reconstructs the derived closure from the direct edges alone.
    ///
    /// On an already-consistent table the returned report is a no-op:
    /// zero inserts, removals and updates.
    pub fn rebuild_with(&self, max_attempts: usize) -> Result<RebuildReport> {
        if max_attempts == 0 {
            return Err(DagError::InvalidArgument(
                "rebuild needs at least one attempt".into(),
            ));
        }

        for attempt in 1..=max_attempts {
            let (version, direct) = {
                let table = self.table.read();
                (
                    table.version(),
                    table.direct_rows().cloned().collect::<Vec<_>>(),
                )
            };
            let expected = derive_closure(&direct)?;

            let mut table = self.table.write();
            if table.version() != version {
                warn!(attempt, "rebuild snapshot raced a concurrent writer, retrying");
                continue;
            }

            let mut report = RebuildReport {
                attempts: attempt,
                ..RebuildReport::default()
            };

            let mut seen: HashSet<RowKey> = HashSet::new();
            let mut to_remove = Vec::new();
            let mut to_fix = Vec::new();
            for row in table.iter() {
                if row.is_direct() {
                    if row.count != 1 {
                        to_fix.push((row.id, 1));
                    }
                    continue;
                }
                let key = row.key();
                if !seen.insert(key.clone()) {
                    // later duplicate of a key already accounted for
                    to_remove.push(row.id);
                    continue;
                }
                match expected.get(&key) {
                    None => to_remove.push(row.id),
                    Some(&count) if count != row.count => to_fix.push((row.id, count)),
                    Some(_) => {}
                }
            }

            for id in to_remove {
                table.remove(id);
                report.removed += 1;
            }
            for (id, count) in to_fix {
                table.set_count(id, count);
                report.updated += 1;
            }
            for (key, count) in expected {
                if !seen.contains(&key) {
                    table.insert(key.from, key.to, key.weights, count);
                    report.inserted += 1;
                }
            }

            info!(
                attempt,
                inserted = report.inserted,
                removed = report.removed,
                updated = report.updated,
                "rebuild applied"
            );
            return Ok(report);
        }

        Err(DagError::RebuildAttemptsExceeded {
            attempts: max_attempts,
        })
    }

    /// Diffs the live table against the closure derived from its direct
    /// edges, without mutating anything.
    pub fn check_integrity(&self) -> Result<IntegrityReport> {
        let table = self.table.read();
        let direct: Vec<ClosureRow> = table.direct_rows().cloned().collect();
        let expected = derive_closure(&direct)?;

        let mut report = IntegrityReport::default();
        for (key, ids) in group::ranked_partition(table.iter()) {
            if ids.len() > 1 {
                report.duplicate_keys.push(key);
            }
        }

        // stored multiplicity per key, duplicates summed together
        let stored = group::group_counts(table.iter().filter(|row| !row.is_direct()));
        for (key, count) in &stored {
            match expected.get(key) {
                None => report.unexpected.push(key.clone()),
                Some(&justified) if justified != *count => {
                    report.count_mismatches.push(CountMismatch {
                        key: key.clone(),
                        stored: *count,
                        expected: justified,
                    })
                }
                Some(_) => {}
            }
        }
        for key in expected.keys() {
            if !stored.contains_key(key) {
                report.missing.push(key.clone());
            }
        }
        Ok(report)
    }
}

/// Derives the full closure from direct edges by iterated depth joins:
/// rows of depth `d` are concatenated with direct rows to produce depth
/// `d + 1`, until an iteration produces nothing. Multiplicities are the
/// per-key sums of path products.
///
/// Surfaces [`DagError::Corruption`] when the direct edges contain a
/// cycle, either directly (a derived row would point at its own tail)
/// or by the depth exceeding the number of direct edges.
fn derive_closure(direct: &[ClosureRow]) -> Result<HashMap<RowKey, u64>> {
    let mut by_from: HashMap<NodeId, Vec<&ClosureRow>> = HashMap::new();
    for row in direct {
        by_from.entry(row.from).or_default().push(row);
    }

    // Each physical direct row is one justification regardless of its
    // stored count; rebuild resets direct counts to one.
    let mut expected: HashMap<RowKey, u64> = HashMap::new();
    let mut frontier: HashMap<RowKey, u64> = HashMap::new();
    for row in direct {
        *frontier.entry(row.key()).or_default() += 1;
    }

    let max_depth = direct.len();
    let mut depth = 1usize;
    while !frontier.is_empty() {
        if depth > max_depth {
            return Err(DagError::Corruption(
                "direct edges contain a cycle: rebuild found no fixed point".into(),
            ));
        }
        let mut next: HashMap<RowKey, u64> = HashMap::new();
        for (key, count) in &frontier {
            for edge in by_from.get(&key.to).into_iter().flatten() {
                if edge.to == key.from {
                    return Err(DagError::Corruption(format!(
                        "direct edges contain a cycle through {} and {}",
                        key.from, edge.to
                    )));
                }
                let weights = WeightVector::concat(&key.weights, &edge.weights);
                let derived = RowKey {
                    from: key.from,
                    to: edge.to,
                    weights,
                };
                *next.entry(derived).or_default() += count;
            }
        }
        for (key, count) in &next {
            *expected.entry(key.clone()).or_default() += count;
        }
        frontier = next;
        depth += 1;
    }

    Ok(expected)
}
