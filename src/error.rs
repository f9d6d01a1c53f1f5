//! Error handling for trellis operations.
//!
//! This module defines the error types used throughout the closure
//! engine. All public APIs return `Result<T, DagError>`.
//!
//! # Error Types
//!
//! - [`DagError`] - Main error enum with variants for different failure modes
//! - [`Result`] - Result type alias for convenience

use std::io;
use thiserror::Error;

/// Result type for trellis operations.
///
/// All public APIs return `Result<T, DagError>` for error handling.
pub type Result<T> = std::result::Result<T, DagError>;

/// Errors that can occur during closure-table operations.
#[derive(Debug, Error)]
pub enum DagError {
    /// The proposed direct edge would close a cycle.
    ///
    /// Raised by the cycle guard when the reverse of the edge is already
    /// reachable, or when the edge is a self-loop. The edge is not
    /// created and no closure row is touched.
    #[error("circular dependency: {to} already reaches {from}")]
    CircularDependency {
        /// Tail of the rejected edge.
        from: u64,
        /// Head of the rejected edge.
        to: u64,
    },

    /// A direct edge with the same endpoints and type already exists.
    #[error("duplicate {type_name} edge {from} -> {to}")]
    DuplicateEdge {
        /// Tail of the rejected edge.
        from: u64,
        /// Head of the rejected edge.
        to: u64,
        /// Relation type of the existing edge.
        type_name: String,
    },

    /// The relation type's fan-in limit is already reached at the head node.
    #[error("fan-in limit {limit} exceeded for {type_name} edges into {node}")]
    FanInExceeded {
        /// Head node already at its limit.
        node: u64,
        /// Relation type being limited.
        type_name: String,
        /// The configured fan-in limit.
        limit: u32,
    },

    /// Requested resource was not found.
    ///
    /// This occurs when an edge id does not refer to a live row.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Invalid argument or operation.
    ///
    /// Unknown relation type names, empty registries, updates that
    /// target a derived row, and similar misuse.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The closure table is internally inconsistent.
    ///
    /// Raised when a retract finds less multiplicity than the edge being
    /// removed contributed, or when rebuild derives a self-referential
    /// row from the stored direct edges. Usually the aftermath of raw
    /// mutation bypassing the engine; `rebuild` is the recovery path.
    #[error("corruption detected: {0}")]
    Corruption(String),

    /// Rebuild gave up after racing concurrent writers.
    ///
    /// Every attempt either fully applied or was discarded; no partial
    /// closure state is left behind.
    #[error("rebuild abandoned after {attempts} attempts")]
    RebuildAttemptsExceeded {
        /// Attempts consumed before giving up.
        attempts: usize,
    },

    /// I/O error from the underlying filesystem during snapshot save/load.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during serialization or deserialization of a snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),
}
