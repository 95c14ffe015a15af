//! Error types for the installer.
//!
//! Each variant carries enough context to tell the user what to do next.
//! Preflight failures are always fatal; dependency and build failures are
//! fatal or downgraded to warnings depending on the dependency policy.

use camino::Utf8PathBuf;
use distkit_common::ConfigError;
use thiserror::Error;

/// Errors that can occur during installation.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// No interpreter candidate could be run.
    #[error(
        "Python not found (tried {candidates}); install Python {minimum} or later from https://www.python.org/downloads/ and re-run"
    )]
    InterpreterNotFound {
        /// Candidates tried, comma separated.
        candidates: String,
        /// Minimum supported version.
        minimum: String,
    },

    /// Every interpreter found is older than the supported minimum.
    #[error("{command} reports Python {found}, but {minimum} or later is required; upgrade Python and re-run")]
    InterpreterTooOld {
        /// Newest interpreter command found.
        command: String,
        /// Version it reported.
        found: String,
        /// Minimum supported version.
        minimum: String,
    },

    /// The menu selection is not one of the listed options.
    #[error("invalid choice {input:?}; enter 1, 2 or 3")]
    InvalidMenuChoice {
        /// The rejected input, trimmed.
        input: String,
    },

    /// The package installer exited unsuccessfully.
    #[error("dependency installation from {requirements} failed: {message}; check your network connection and run: pip install -r {requirements}")]
    DependencyInstall {
        /// Requirements file handed to the package installer.
        requirements: Utf8PathBuf,
        /// Trimmed stderr of the failed command.
        message: String,
    },

    /// The native bundler exited unsuccessfully.
    #[error("bundle build failed: {message}; inspect the bundler output above and re-run")]
    BuildFailed {
        /// Trimmed stderr of the failed command.
        message: String,
    },

    /// The main application script is not where the build expects it.
    #[error("{path} not found; run the installer from the project directory")]
    MainScriptMissing {
        /// Resolved location of the main script.
        path: Utf8PathBuf,
    },

    /// A built application is missing from the bundler's output directory.
    #[error("{path} not found; {dist} contains: {available}; build the application first (menu option 1)")]
    ArtifactMissing {
        /// Expected location of the built application.
        path: Utf8PathBuf,
        /// Bundler output directory.
        dist: Utf8PathBuf,
        /// Entries found in the output directory, comma separated.
        available: String,
    },

    /// No install location is known for the host.
    #[error("no install location is known for {os}; set install.install_dir in distkit.toml")]
    InstallLocationUnknown {
        /// Detected platform.
        os: String,
    },

    /// The built application could not be copied into place.
    #[error("could not install {path}: {reason}; check permissions on the install location and re-run")]
    ApplicationInstall {
        /// Destination of the copy.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The desktop entry could not be created.
    #[error("could not create desktop entry at {path}: {reason}")]
    ShortcutCreation {
        /// Intended location of the entry.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
