//! Tracing subscriber setup for embedding applications.

use crate::error::{DagError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global tracing subscriber filtered by `level`, which
/// accepts any `EnvFilter` directive (e.g. `"info"` or
/// `"trellis=debug"`). Fails if a subscriber is already installed.
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_new(level)
                .map_err(|e| DagError::InvalidArgument(format!("Invalid log level: {e}")))?,
        )
        .with_target(true)
        .try_init()
        .map_err(|_| DagError::InvalidArgument("Logging already initialized".into()))
}
