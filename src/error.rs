//! Error types for the voxel engine.

use std::io;

use thiserror::Error;

/// Errors raised while configuring or starting the engine.
///
/// Block access never fails: out-of-range reads return `None` and out-of-range writes are
/// ignored.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),

    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker {name}: {source}")]
    WorkerSpawn {
        /// Name of the worker.
        name: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}
