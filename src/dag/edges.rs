//! Direct-edge lifecycle entry points.
//!
//! The legal transitions for a direct edge are absent -> present
//! (`connect`), present -> present' (`update_edge`) and
//! present -> absent (`disconnect`). Each runs validation and closure
//! maintenance under a single write guard, so concurrent readers never
//! observe a half-maintained closure.

use tracing::debug;

use super::Dag;
use crate::error::{DagError, Result};
use crate::model::{ClosureRow, EdgeChange, EdgeId, NodeId, WeightVector};

impl Dag {
    /// Creates a direct edge `from -> to` of the named relation type.
    ///
    /// Fails with [`DagError::CircularDependency`] when the edge would
    /// close a cycle, [`DagError::DuplicateEdge`] when an identical
    /// direct edge exists, or [`DagError::FanInExceeded`] when the
    /// type's fan-in limit is reached at `to`. On failure nothing is
    /// written.
    pub fn connect(&self, from: NodeId, to: NodeId, type_name: &str) -> Result<EdgeId> {
        let type_index = self.registry.index_of(type_name)?;
        let mut table = self.table.write();

        Self::validate_direct(&self.registry, &table, from, to, type_index, None)?;

        let weights = WeightVector::direct(type_index, self.registry.arity());
        let id = table.insert(from, to, weights, 1);
        let inserted = Self::add_closure(&mut table, id);
        debug!(from, to, type_name, edge = id, inserted, "direct edge connected");
        Ok(id)
    }

    /// Destroys a direct edge, retracting its closure contribution
    /// first. Returns the removed row.
    pub fn disconnect(&self, edge: EdgeId) -> Result<ClosureRow> {
        let mut table = self.table.write();
        let row = table
            .get(edge)
            .cloned()
            .ok_or(DagError::NotFound("edge"))?;
        if !row.is_direct() {
            return Err(DagError::InvalidArgument(
                "only direct edges can be disconnected".into(),
            ));
        }

        Self::truncate_closure(&mut table, &row)?;
        let removed = table.remove(edge).ok_or(DagError::NotFound("edge"))?;
        debug!(edge, from = removed.from, to = removed.to, "direct edge disconnected");
        Ok(removed)
    }

    /// Re-points or re-types a direct edge in place.
    ///
    /// Implemented as a full retract of the old contribution followed
    /// by a re-assert of the new one: the old closure rows are
    /// truncated with the pre-mutation snapshot, the row is updated,
    /// the new state is validated, and the new closure is asserted. If
    /// validation rejects the new state the old edge and its closure
    /// contribution are restored and the error is returned; the whole
    /// sequence holds one write guard.
    pub fn update_edge(&self, edge: EdgeId, change: EdgeChange) -> Result<()> {
        let mut table = self.table.write();
        let old = table
            .get(edge)
            .cloned()
            .ok_or(DagError::NotFound("edge"))?;
        let old_type = old.weights.direct_type().ok_or_else(|| {
            DagError::InvalidArgument("only direct edges can be updated".into())
        })?;

        let new_from = change.from.unwrap_or(old.from);
        let new_to = change.to.unwrap_or(old.to);
        let new_type = match &change.edge_type {
            Some(name) => self.registry.index_of(name)?,
            None => old_type,
        };
        if new_from == old.from && new_to == old.to && new_type == old_type {
            return Ok(());
        }

        Self::truncate_closure(&mut table, &old)?;
        let weights = WeightVector::direct(new_type, self.registry.arity());
        table.update_row(edge, new_from, new_to, weights);

        match Self::validate_direct(&self.registry, &table, new_from, new_to, new_type, Some(edge))
        {
            Ok(()) => {
                let inserted = Self::add_closure(&mut table, edge);
                debug!(
                    edge,
                    from = new_from,
                    to = new_to,
                    inserted,
                    "direct edge updated"
                );
                Ok(())
            }
            Err(err) => {
                table.update_row(edge, old.from, old.to, old.weights.clone());
                Self::add_closure(&mut table, edge);
                Err(err)
            }
        }
    }
}
