//! Error types for artifact generation and manifest assembly.
//!
//! Unknown targets are a configuration error the CLI answers with a usage
//! summary. Write failures are fatal: artifacts written earlier in the same
//! run are left in place, so every message tells the user to re-run.

use camino::Utf8PathBuf;
use distkit_common::ConfigError;
use thiserror::Error;

/// Errors raised by the generator and manifest builder.
#[derive(Debug, Error)]
pub enum DistError {
    /// The requested target is not one of the known values.
    #[error("unknown target {name:?}; expected one of web, mobile, alt-os-notes, installer, all")]
    UnknownTarget {
        /// The rejected value.
        name: String,
    },

    /// An artifact could not be written.
    #[error(
        "failed to write {path}: {source}; files written earlier in this run were kept, re-run to regenerate them"
    )]
    ArtifactWrite {
        /// Destination of the failed write.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The packaging manifest could not be written.
    #[error("failed to write packaging manifest {path}: {source}")]
    ManifestWrite {
        /// Destination of the failed write.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The packaging manifest could not be serialised.
    #[error("failed to serialise packaging manifest: {0}")]
    ManifestEncode(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An I/O operation outside artifact writes failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`DistError`].
pub type Result<T> = std::result::Result<T, DistError>;
