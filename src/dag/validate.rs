//! Point-in-time validation of a proposed direct edge.
//!
//! The cycle guard is a necessary-but-not-sufficient check: it rejects
//! an edge whose literal inverse pair is already stored. Because it
//! runs on every direct-edge write and the closure is complete between
//! mutations, the inverse of any transitive path is always materialized
//! as a row, which turns the point check into a full acyclicity
//! guarantee.

use super::Dag;
use crate::error::{DagError, Result};
use crate::model::{EdgeId, NodeId};
use crate::registry::TypeRegistry;
use crate::store::RowTable;

impl Dag {
    /// Validates a direct edge `(from, to)` of the given type against
    /// the current table. `exclude` names the row being updated, which
    /// must not count against itself.
    pub(crate) fn validate_direct(
        registry: &TypeRegistry,
        table: &RowTable,
        from: NodeId,
        to: NodeId,
        type_index: usize,
        exclude: Option<EdgeId>,
    ) -> Result<()> {
        if from == to {
            return Err(DagError::CircularDependency { from, to });
        }

        // Cycle guard: the inverse pair must not be reachable.
        if table
            .rows_from(to)
            .any(|row| row.to == from && Some(row.id) != exclude)
        {
            return Err(DagError::CircularDependency { from, to });
        }

        // Direct-edge uniqueness, scoped to rows with weight total <= 1:
        // derived rows of mixed type between the same pair are tolerated,
        // a second direct edge of the same type is not.
        if table.rows_from(from).any(|row| {
            row.to == to
                && row.weights.total() <= 1
                && row.weights.get(type_index) == 1
                && Some(row.id) != exclude
        }) {
            return Err(DagError::DuplicateEdge {
                from,
                to,
                type_name: type_name(registry, type_index),
            });
        }

        if let Some(limit) = registry.get(type_index).and_then(|ty| ty.fan_in_limit) {
            let existing = table
                .rows_to(to)
                .filter(|row| {
                    row.is_direct()
                        && row.weights.get(type_index) == 1
                        && Some(row.id) != exclude
                })
                .count() as u32;
            if existing >= limit {
                return Err(DagError::FanInExceeded {
                    node: to,
                    type_name: type_name(registry, type_index),
                    limit,
                });
            }
        }

        Ok(())
    }
}

fn type_name(registry: &TypeRegistry, type_index: usize) -> String {
    registry
        .get(type_index)
        .map(|ty| ty.name.clone())
        .unwrap_or_else(|| format!("type#{type_index}"))
}
