//! Engine configuration options.
//!
//! Config controls recovery and snapshot behavior. The defaults are
//! suitable for single-writer use; [`Config::resilient()`] raises the
//! rebuild retry budget for tables shared with concurrent writers.
//!
//! # Example
//!
//! ```rust
//! use trellis::Config;
//!
//! let mut config = Config::default();
//! config.rebuild_max_attempts = 5;
//! ```

/// Configuration options for [`Dag`](crate::Dag) behavior.
#[derive(Debug, Clone)]
pub struct Config {
    /// Retry budget for [`rebuild`](crate::Dag::rebuild) when concurrent
    /// mutation invalidates an attempt's snapshot.
    pub rebuild_max_attempts: usize,

    /// Whether snapshot loading verifies the closure against the direct
    /// edges and fails on drift.
    pub verify_on_load: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rebuild_max_attempts: 3,
            verify_on_load: false,
        }
    }
}

impl Config {
    /// Creates a configuration for tables shared with concurrent writers.
    ///
    /// Rebuild retries more before giving up, and snapshots are verified
    /// when loaded.
    pub fn resilient() -> Self {
        Self {
            rebuild_max_attempts: 10,
            verify_on_load: true,
        }
    }
}
