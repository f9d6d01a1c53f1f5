//! Core row model for the closure table.
//!
//! A [`ClosureRow`] is the single entity the engine manages: one stored
//! reachability fact `(from, to, weight-vector, count)`. Direct edges
//! are the rows whose weight vector totals exactly one; every other row
//! is derived and owned by the maintenance engine.

use serde::{Deserialize, Serialize};

/// Opaque node identifier. Nodes carry no attributes in this subsystem.
pub type NodeId = u64;

/// Identifier of a stored closure row. Direct edges are addressed by
/// their row id.
pub type EdgeId = u64;

/// Per-type hop counts on a closure row.
///
/// The vector length equals the registry arity; column order follows
/// the registry. A zero column means the type does not participate in
/// the row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeightVector(Vec<u32>);

impl WeightVector {
    /// All-zero vector of the given arity.
    pub fn zeros(arity: usize) -> Self {
        Self(vec![0; arity])
    }

    /// Vector of a direct edge: a single 1 in the given type column.
    pub fn direct(type_index: usize, arity: usize) -> Self {
        let mut weights = vec![0; arity];
        weights[type_index] = 1;
        Self(weights)
    }

    /// Builds a vector from explicit column values.
    pub fn from_columns(columns: Vec<u32>) -> Self {
        Self(columns)
    }

    /// Number of type columns.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Hop count in the given type column.
    pub fn get(&self, type_index: usize) -> u32 {
        self.0[type_index]
    }

    /// Sum across all type columns.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Whether this is the vector of a direct edge (total weight 1).
    pub fn is_direct(&self) -> bool {
        self.total() == 1
    }

    /// The single participating type of a direct vector.
    pub fn direct_type(&self) -> Option<usize> {
        if self.is_direct() {
            self.0.iter().position(|&w| w == 1)
        } else {
            None
        }
    }

    /// Whether exactly the `type_index` column participates.
    pub fn is_pure(&self, type_index: usize) -> bool {
        self.0[type_index] > 0
            && self
                .0
                .iter()
                .enumerate()
                .all(|(i, &w)| i == type_index || w == 0)
    }

    /// Concatenation of two path vectors: per-type column sums. Used
    /// when the left row ends exactly where the right row begins.
    pub fn concat(left: &Self, right: &Self) -> Self {
        let columns = left.0.iter().zip(&right.0).map(|(&a, &b)| a + b).collect();
        Self(columns)
    }

    /// Vector of a path handed off across `bridge` between two rows
    /// that do not touch. The bridging edge charges its own hop in its
    /// own type column, so the result is independent of the order the
    /// underlying direct edges were inserted in.
    pub fn bridged(left: &Self, bridge: &Self, right: &Self) -> Self {
        Self::concat(&Self::concat(left, bridge), right)
    }
}

/// One stored reachability fact.
///
/// `count` is the multiplicity: the number of distinct direct-edge
/// combinations justifying this exact `(from, to, weights)` key. Two
/// different paths can produce the same logical row; the count keeps
/// retraction from deleting facts that other paths still justify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureRow {
    /// Physical row id; direct edges are addressed by it.
    pub id: EdgeId,
    /// Tail node.
    pub from: NodeId,
    /// Head node.
    pub to: NodeId,
    /// Per-type hop counts of the represented path shape.
    pub weights: WeightVector,
    /// Number of distinct path combinations justifying this key.
    pub count: u64,
}

impl ClosureRow {
    /// Whether this row is a direct edge.
    pub fn is_direct(&self) -> bool {
        self.weights.is_direct()
    }

    /// The logical grouping key of this row.
    pub fn key(&self) -> RowKey {
        RowKey {
            from: self.from,
            to: self.to,
            weights: self.weights.clone(),
        }
    }
}

/// Logical identity of a closure fact: endpoints plus weight vector.
///
/// Any two physical rows sharing a key are the same fact and must be
/// merged into one row with summed count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowKey {
    /// Tail node.
    pub from: NodeId,
    /// Head node.
    pub to: NodeId,
    /// Per-type hop counts.
    pub weights: WeightVector,
}

/// Requested change to a direct edge.
///
/// Unset fields keep their current value. Applying a change triggers a
/// full retract of the edge's old contribution followed by a re-assert
/// of the new one.
#[derive(Debug, Clone, Default)]
pub struct EdgeChange {
    /// New tail node, if re-pointed.
    pub from: Option<NodeId>,
    /// New head node, if re-pointed.
    pub to: Option<NodeId>,
    /// New relation type name, if re-typed.
    pub edge_type: Option<String>,
}

impl EdgeChange {
    /// Change that moves the tail to `from`.
    pub fn repoint_from(from: NodeId) -> Self {
        Self {
            from: Some(from),
            ..Self::default()
        }
    }

    /// Change that moves the head to `to`.
    pub fn repoint_to(to: NodeId) -> Self {
        Self {
            to: Some(to),
            ..Self::default()
        }
    }

    /// Change that switches the edge to another relation type.
    pub fn retype(edge_type: &str) -> Self {
        Self {
            edge_type: Some(edge_type.into()),
            ..Self::default()
        }
    }
}
