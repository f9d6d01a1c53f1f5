//! Incremental closure maintenance.
//!
//! `add_closure` and `truncate_closure` are the two halves of the
//! engine: both evaluate the same pair of joins for one direct edge and
//! either assert or retract exactly the multiplicity that edge is
//! responsible for. An endpoint update is always a full retract of the
//! old contribution followed by a re-assert of the new one, never a
//! delta.

use std::collections::HashMap;

use tracing::debug;

use super::Dag;
use crate::error::{DagError, Result};
use crate::model::{ClosureRow, EdgeId, RowKey, WeightVector};
use crate::store::RowTable;

impl Dag {
    /// Asserts every closure row implied by the direct edge `edge`,
    /// which must already be stored. Returns the number of newly
    /// inserted rows (merges into existing keys are not counted).
    pub(crate) fn add_closure(table: &mut RowTable, edge: EdgeId) -> usize {
        let Some(edge_row) = table.get(edge).cloned() else {
            return 0;
        };
        let additions = joined_contributions(table, &edge_row);
        let total = additions.len();
        let inserted = table.apply_additions(additions);
        debug!(
            edge,
            asserted = total,
            inserted,
            "closure rows asserted for direct edge"
        );
        inserted
    }

    /// Retracts exactly the multiplicity contributed by `edge`, given
    /// with its pre-mutation values and still present in the table.
    ///
    /// Retraction is a matched delete: candidate keys with no stored
    /// row are skipped, so retracting from a table holding rows written
    /// under an older vector scheme removes only what matches. A
    /// matched row holding less multiplicity than the edge contributed
    /// means the table is corrupt; everything is staged first and
    /// nothing is applied in that case.
    pub(crate) fn truncate_closure(table: &mut RowTable, edge: &ClosureRow) -> Result<usize> {
        let retractions = joined_contributions(table, edge);

        let mut staged: Vec<(EdgeId, u64)> = Vec::with_capacity(retractions.len());
        for (key, contributed) in &retractions {
            let Some(id) = table.find_key(key) else {
                debug!(
                    edge = edge.id,
                    from = key.from,
                    to = key.to,
                    "no stored row matches a retraction candidate, skipping"
                );
                continue;
            };
            let stored = table.get(id).map(|row| row.count).unwrap_or(0);
            if stored < *contributed {
                return Err(DagError::Corruption(format!(
                    "closure row {} -> {} holds multiplicity {stored} but edge {} contributed {contributed}",
                    key.from, key.to, edge.id
                )));
            }
            staged.push((id, *contributed));
        }

        let retracted = staged.len();
        for (id, contributed) in staged {
            table.retract_count(id, contributed);
        }
        debug!(
            edge = edge.id,
            retracted, "closure rows retracted for direct edge"
        );
        Ok(retracted)
    }
}

/// The `(key, multiplicity)` tuples one direct edge is responsible for.
///
/// Two joins over the live table, with the edge's own row present:
///
/// - *combine*: `r1.to == edge.from && r2.from == edge.to` - a path
///   into the edge's tail bridged to a path out of its head, the edge
///   itself crossing between them and charging its own hop.
/// - *extends*: `r1.to == r2.from` where one of the pair is the edge's
///   own row - the edge extending an existing path at either end.
///
/// Contributions are grouped by logical key; each pair contributes the
/// product of its rows' multiplicities. Every candidate vector is the
/// column sum of the direct edges along the path it represents, so the
/// same keys come out regardless of the order the edges went in.
fn joined_contributions(table: &RowTable, edge: &ClosureRow) -> HashMap<RowKey, u64> {
    let incoming: Vec<&ClosureRow> = table
        .rows_to(edge.from)
        .filter(|row| row.id != edge.id)
        .collect();
    let outgoing: Vec<&ClosureRow> = table
        .rows_from(edge.to)
        .filter(|row| row.id != edge.id)
        .collect();

    let mut contributions: HashMap<RowKey, u64> = HashMap::new();
    let mut record = |from, to, weights: WeightVector, count: u64| {
        let key = RowKey { from, to, weights };
        *contributions.entry(key).or_default() += count;
    };

    for r1 in &incoming {
        for r2 in &outgoing {
            let weights = WeightVector::bridged(&r1.weights, &edge.weights, &r2.weights);
            record(r1.from, r2.to, weights, r1.count * r2.count);
        }
    }

    for r1 in &incoming {
        let weights = WeightVector::concat(&r1.weights, &edge.weights);
        record(r1.from, edge.to, weights, r1.count * edge.count);
    }
    for r2 in &outgoing {
        let weights = WeightVector::concat(&edge.weights, &r2.weights);
        record(edge.from, r2.to, weights, edge.count * r2.count);
    }

    contributions
}
