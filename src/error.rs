//! Crate-wide error taxonomy.
//!
//! Pipeline failures never propagate past the write boundary; they are
//! converted into [`SyncStatus`](crate::types::SyncStatus) events. But
//! storage and preset APIs surface these variants directly.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the Equalizer Master core.
#[derive(Debug, Error)]
pub enum Error {
    /// No target config file has been selected yet. The user must pick one
    /// before live sync can do anything.
    #[error("no config file selected")]
    ConfigurationMissing,

    /// The config file could not be written (permissions, disk full, path
    /// removed). Local to one write attempt; the pipeline stays servable.
    #[error("failed to write config to {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A genre name that is not in the built-in curve table.
    #[error("unknown genre preset: {0}")]
    UnknownPreset(String),

    /// A named user preset that does not exist in the preset store.
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// The platform Documents folder could not be determined.
    #[error("could not find Documents folder")]
    DocumentsDirUnavailable,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
