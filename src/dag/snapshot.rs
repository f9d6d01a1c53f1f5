//! Snapshot persistence for the closure table.
//!
//! A snapshot is a JSON document embedding the registry and every
//! stored row, so a table can be carried across processes. Loading
//! verifies the rows against the registry arity and, when the config
//! asks for it, against a full closure derivation.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Dag;
use crate::config::Config;
use crate::error::{DagError, Result};
use crate::model::ClosureRow;
use crate::registry::TypeRegistry;
use crate::store::RowTable;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    registry: TypeRegistry,
    rows: Vec<ClosureRow>,
}

impl Dag {
    /// Writes the registry and all rows to `path` as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = {
            let table = self.table.read();
            Snapshot {
                registry: (*self.registry).clone(),
                rows: table.iter().cloned().collect(),
            }
        };
        let file = File::create(path.as_ref())?;
        serde_json::to_writer(BufWriter::new(file), &snapshot)
            .map_err(|e| DagError::Serialization(e.to_string()))?;
        info!(rows = snapshot.rows.len(), path = %path.as_ref().display(), "snapshot saved");
        Ok(())
    }

    /// Restores a table from a snapshot written by [`Dag::save`].
    pub fn load(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DagError::Serialization(e.to_string()))?;

        let arity = snapshot.registry.arity();
        let mut table = RowTable::new();
        for row in snapshot.rows {
            if row.weights.arity() != arity {
                return Err(DagError::Corruption(format!(
                    "row {} carries {} weight columns, registry has {arity}",
                    row.id,
                    row.weights.arity()
                )));
            }
            table
                .restore(row)
                .map_err(|id| DagError::Corruption(format!("duplicate row id {id} in snapshot")))?;
        }

        let dag = Self {
            registry: Arc::new(snapshot.registry),
            config,
            table: RwLock::new(table),
        };
        if dag.config.verify_on_load {
            let report = dag.check_integrity()?;
            if !report.is_consistent() {
                return Err(DagError::Corruption(
                    "snapshot failed integrity verification".into(),
                ));
            }
        }
        Ok(dag)
    }
}
