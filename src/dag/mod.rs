//! The closure-table engine facade.
//!
//! [`Dag`] owns the row table and the type registry and exposes the
//! three direct-edge lifecycle operations (`connect`, `update_edge`,
//! `disconnect`), the node-view queries derived from them, and the
//! out-of-band recovery surface (`rebuild`, `check_integrity`,
//! snapshots). The implementation is split across purpose-named files,
//! all `impl Dag` blocks:
//!
//! - `edges.rs` - lifecycle entry points
//! - `closure.rs` - the add/truncate closure maintenance joins
//! - `validate.rs` - cycle guard, uniqueness and fan-in checks
//! - `rebuild.rs` - fixed-point reconstruction and integrity checking
//! - `queries.rs` - ancestors/descendants/children/parent views
//! - `snapshot.rs` - serde snapshot persistence

mod closure;
mod edges;
mod queries;
mod rebuild;
mod snapshot;
mod validate;


pub use rebuild::{CountMismatch, IntegrityReport, RebuildReport};

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::model::{ClosureRow, EdgeId};
use crate::registry::TypeRegistry;
use crate::store::RowTable;

/// A typed-DAG closure table.
///
/// Direct edges are created, re-pointed and destroyed through this
/// type; every derived closure row is maintained incrementally by the
/// engine and never written by callers. Each mutation runs as one
/// atomic unit under the table's write lock.
///
/// # Example
///
/// ```rust
/// use trellis::{Dag, RelationType, TypeRegistry};
///
/// let registry = TypeRegistry::new(vec![RelationType::hierarchy()]).unwrap();
/// let dag = Dag::new(registry);
///
/// let ab = dag.connect(1, 2, "hierarchy").unwrap();
/// dag.connect(2, 3, "hierarchy").unwrap();
/// assert_eq!(dag.descendants(1, "hierarchy").unwrap(), vec![2, 3]);
///
/// dag.disconnect(ab).unwrap();
/// assert!(dag.descendants(1, "hierarchy").unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct Dag {
    pub(crate) registry: Arc<TypeRegistry>,
    pub(crate) config: Config,
    pub(crate) table: RwLock<RowTable>,
}

impl Dag {
    /// Creates an empty table over the given registry with defaults.
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_config(registry, Config::default())
    }

    /// Creates an empty table over the given registry and config.
    pub fn with_config(registry: TypeRegistry, config: Config) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
            table: RwLock::new(RowTable::new()),
        }
    }

    /// The relation types this table is configured with.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of stored rows, direct and derived.
    pub fn row_count(&self) -> usize {
        self.table.read().len()
    }

    /// The row with the given id, if live.
    pub fn edge(&self, id: EdgeId) -> Option<ClosureRow> {
        self.table.read().get(id).cloned()
    }
}
