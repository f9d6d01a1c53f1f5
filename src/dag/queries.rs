//! Node-view queries over the closure table.
//!
//! The typed relations (`ancestors`, `descendants`, `children`,
//! `parent`) follow pure chains of a single relation type: a row
//! participates when its column for that type is positive and every
//! other column is zero. Mixed-type derived rows are visible through
//! [`Dag::closure_between`] and [`Dag::in_closure`].

use std::collections::BTreeSet;

use super::Dag;
use crate::error::Result;
use crate::model::{ClosureRow, NodeId};

impl Dag {
    /// All stored rows, direct and derived, in id order.
    pub fn closure_rows(&self) -> Vec<ClosureRow> {
        self.table.read().iter().cloned().collect()
    }

    /// The direct edges only.
    pub fn direct_edges(&self) -> Vec<ClosureRow> {
        self.table.read().direct_rows().cloned().collect()
    }

    /// Every stored row between the ordered pair, any type mix.
    pub fn closure_between(&self, from: NodeId, to: NodeId) -> Vec<ClosureRow> {
        self.table
            .read()
            .rows_from(from)
            .filter(|row| row.to == to)
            .cloned()
            .collect()
    }

    /// Nodes reachable from `node` along pure chains of the type.
    pub fn descendants(&self, node: NodeId, type_name: &str) -> Result<Vec<NodeId>> {
        let type_index = self.registry.index_of(type_name)?;
        let table = self.table.read();
        let nodes: BTreeSet<NodeId> = table
            .rows_from(node)
            .filter(|row| row.weights.is_pure(type_index))
            .map(|row| row.to)
            .collect();
        Ok(nodes.into_iter().collect())
    }

    /// Nodes reaching `node` along pure chains of the type.
    pub fn ancestors(&self, node: NodeId, type_name: &str) -> Result<Vec<NodeId>> {
        let type_index = self.registry.index_of(type_name)?;
        let table = self.table.read();
        let nodes: BTreeSet<NodeId> = table
            .rows_to(node)
            .filter(|row| row.weights.is_pure(type_index))
            .map(|row| row.from)
            .collect();
        Ok(nodes.into_iter().collect())
    }

    /// Heads of direct edges of the type leaving `node`.
    pub fn children(&self, node: NodeId, type_name: &str) -> Result<Vec<NodeId>> {
        let type_index = self.registry.index_of(type_name)?;
        let table = self.table.read();
        let nodes: BTreeSet<NodeId> = table
            .rows_from(node)
            .filter(|row| row.is_direct() && row.weights.get(type_index) == 1)
            .map(|row| row.to)
            .collect();
        Ok(nodes.into_iter().collect())
    }

    /// Tail of the first direct edge of the type entering `node`.
    ///
    /// For fan-in-limited types this is the unique parent; otherwise
    /// the lowest-id incoming direct edge wins.
    pub fn parent(&self, node: NodeId, type_name: &str) -> Result<Option<NodeId>> {
        let type_index = self.registry.index_of(type_name)?;
        let table = self.table.read();
        let parent = table
            .rows_to(node)
            .find(|row| row.is_direct() && row.weights.get(type_index) == 1)
            .map(|row| row.from);
        Ok(parent)
    }

    /// Whether `node` has no outgoing relations of the type.
    pub fn is_leaf(&self, node: NodeId, type_name: &str) -> Result<bool> {
        let type_index = self.registry.index_of(type_name)?;
        let table = self.table.read();
        let has_outgoing = table
            .rows_from(node)
            .any(|row| row.weights.is_pure(type_index));
        Ok(!has_outgoing)
    }

    /// Whether `node` has a parent of the type.
    pub fn is_child(&self, node: NodeId, type_name: &str) -> Result<bool> {
        Ok(self.parent(node, type_name)?.is_some())
    }

    /// Whether the two nodes are related in either direction, any type.
    pub fn in_closure(&self, a: NodeId, b: NodeId) -> bool {
        let table = self.table.read();
        table.rows_from(a).any(|row| row.to == b) || table.rows_from(b).any(|row| row.to == a)
    }
}
