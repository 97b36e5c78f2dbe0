//! Simulator error definitions.
//!
//! Every error here is a caller input error surfaced before the first step runs.
//! Once a simulation has started with a valid configuration and a known policy,
//! stepping is total and never fails.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors reported by configuration, policy selection, and the lifecycle API.
#[derive(Error, Debug)]
pub enum SimError {
    /// A size or page-size input was non-positive, unparsable, or produced an empty geometry.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The policy selector is not one of `FIFO`, `LRU`, or `Second Chance`.
    #[error("unknown replacement policy: {0:?} (expected \"FIFO\", \"LRU\" or \"Second Chance\")")]
    UnknownPolicy(String),

    /// A configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigIo {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration document was not valid JSON for [`Config`](crate::config::Config).
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// `run` was called while no simulation is active.
    #[error("no simulation is running; call start() first")]
    NotStarted,
}

impl SimError {
    /// Returns `true` for errors caused by size or config-file input.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_) | Self::ConfigIo { .. } | Self::ConfigParse(_)
        )
    }
}
