//! Trellis is an incremental transitive-closure engine for directed
//! acyclic graphs whose edges are partitioned into typed relations.
//!
//! Every reachability fact is materialized as a closure row carrying
//! one integer weight column per relation type plus a multiplicity
//! count, and the table is kept consistent under edge insertion,
//! re-pointing and deletion without ever recomputing from scratch on
//! the hot path. A bounded-attempt rebuild reconstructs the closure
//! from the direct edges when the table is suspected to have drifted.
//!
//! # Quick start
//!
//! ```rust
//! use trellis::{Dag, RelationType, TypeRegistry};
//!
//! let registry = TypeRegistry::new(vec![
//!     RelationType::hierarchy(),
//!     RelationType::new("invalidate", "invalidated_by", "invalidates"),
//! ])?;
//! let dag = Dag::new(registry);
//!
//! dag.connect(1, 2, "hierarchy")?;
//! dag.connect(2, 3, "hierarchy")?;
//!
//! // The closure row 1 -> 3 is maintained automatically.
//! assert_eq!(dag.descendants(1, "hierarchy")?, vec![2, 3]);
//! assert!(dag.connect(3, 1, "hierarchy").is_err()); // would close a cycle
//! # Ok::<(), trellis::DagError>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod registry;

mod dag;
mod store;

pub use config::Config;
pub use dag::{CountMismatch, Dag, IntegrityReport, RebuildReport};
pub use error::{DagError, Result};
pub use logging::init_logging;
pub use model::{ClosureRow, EdgeChange, EdgeId, NodeId, RowKey, WeightVector};
pub use registry::{RelationType, TypeRegistry};
