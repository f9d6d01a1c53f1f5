//! Static description of the relation types a table carries.
//!
//! Every closure row stores one integer weight column per registered
//! relation type. The registry fixes the set of types, their derived
//! relation names (direct-up/down, transitive-up/down) and optional
//! fan-in limits at construction time; it is immutable afterwards and
//! shared by reference between the table and its callers.
//!
//! # Example
//!
//! ```rust
//! use trellis::{RelationType, TypeRegistry};
//!
//! let registry = TypeRegistry::new(vec![
//!     RelationType::hierarchy(),
//!     RelationType::new("invalidate", "invalidated_by", "invalidates"),
//! ]).unwrap();
//! assert_eq!(registry.arity(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{DagError, Result};

/// One relation type and the names its derived relations go by.
///
/// The up/down naming follows the convention of the edge direction:
/// an edge runs `from -> to`, so looking "up" from a node follows
/// incoming edges and "down" follows outgoing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationType {
    /// Canonical type name, also the name of its weight column.
    pub name: String,
    /// Name of the direct up relation (e.g. `parent`).
    pub up_name: String,
    /// Name of the direct down relation (e.g. `children`).
    pub down_name: String,
    /// Name of the transitive up relation (e.g. `ancestors`).
    pub all_up_name: String,
    /// Name of the transitive down relation (e.g. `descendants`).
    pub all_down_name: String,
    /// Maximum number of direct edges of this type into a single node,
    /// if limited. `Some(1)` models a single-parent hierarchy.
    pub fan_in_limit: Option<u32>,
}

impl RelationType {
    /// Creates a type with derived relation names prefixed `all_`.
    pub fn new(name: &str, up_name: &str, down_name: &str) -> Self {
        Self {
            name: name.into(),
            up_name: up_name.into(),
            down_name: down_name.into(),
            all_up_name: format!("all_{up_name}"),
            all_down_name: format!("all_{down_name}"),
            fan_in_limit: None,
        }
    }

    /// Restricts the number of direct incoming edges of this type per node.
    pub fn with_fan_in_limit(mut self, limit: u32) -> Self {
        self.fan_in_limit = Some(limit);
        self
    }

    /// The conventional single-parent hierarchy type.
    pub fn hierarchy() -> Self {
        Self {
            name: "hierarchy".into(),
            up_name: "parent".into(),
            down_name: "children".into(),
            all_up_name: "ancestors".into(),
            all_down_name: "descendants".into(),
            fan_in_limit: Some(1),
        }
    }
}

/// Immutable set of relation types backing one closure table.
///
/// The registry's order is significant: it fixes the index of each
/// type's weight column in every [`WeightVector`](crate::WeightVector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRegistry {
    types: Vec<RelationType>,
}

impl TypeRegistry {
    /// Builds a registry, rejecting empty type sets and duplicate names.
    pub fn new(types: Vec<RelationType>) -> Result<Self> {
        if types.is_empty() {
            return Err(DagError::InvalidArgument(
                "registry needs at least one relation type".into(),
            ));
        }
        for (i, ty) in types.iter().enumerate() {
            if types[..i].iter().any(|other| other.name == ty.name) {
                return Err(DagError::InvalidArgument(format!(
                    "duplicate relation type name: {}",
                    ty.name
                )));
            }
        }
        Ok(Self { types })
    }

    /// Number of relation types, and therefore weight columns per row.
    pub fn arity(&self) -> usize {
        self.types.len()
    }

    /// Index of the weight column for `name`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.types
            .iter()
            .position(|ty| ty.name == name)
            .ok_or_else(|| DagError::InvalidArgument(format!("unknown relation type: {name}")))
    }

    /// The type at column `index`.
    pub fn get(&self, index: usize) -> Option<&RelationType> {
        self.types.get(index)
    }

    /// Iterates types in column order.
    pub fn iter(&self) -> impl Iterator<Item = &RelationType> {
        self.types.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_registry() {
        assert!(matches!(
            TypeRegistry::new(vec![]),
            Err(DagError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = TypeRegistry::new(vec![
            RelationType::hierarchy(),
            RelationType::new("hierarchy", "up", "down"),
        ]);
        assert!(matches!(result, Err(DagError::InvalidArgument(_))));
    }

    #[test]
    fn resolves_column_indexes() {
        let registry = TypeRegistry::new(vec![
            RelationType::hierarchy(),
            RelationType::new("invalidate", "invalidated_by", "invalidates"),
        ])
        .expect("registry");

        assert_eq!(registry.index_of("hierarchy").expect("index"), 0);
        assert_eq!(registry.index_of("invalidate").expect("index"), 1);
        assert!(registry.index_of("precedes").is_err());
        assert_eq!(registry.get(1).expect("type").all_down_name, "all_invalidates");
        assert_eq!(registry.get(0).expect("type").fan_in_limit, Some(1));
    }
}
