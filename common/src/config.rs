//! Project configuration loaded from `distkit.toml`.
//!
//! The file is optional. Every table and key falls back to the identity of
//! the GitHub Account Manager application, so an empty or missing file yields
//! the same artifacts the project has always shipped. Unknown keys are
//! rejected to surface typos early.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

/// Default configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "distkit.toml";

/// Bundler input written by `distkit-manifest` and read by the build step.
pub const BUNDLER_SPEC_FILE: &str = "github_account_manager.spec";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid configuration in {path}: {reason}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Parser message.
        reason: String,
    },
}

/// Root of `distkit.toml`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Application identity shared by every artifact.
    pub app: AppIdentity,
    /// Installer pipeline settings.
    pub install: InstallSettings,
    /// Packaging manifest overrides.
    pub manifest: ManifestSettings,
}

/// Identity of the packaged application.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppIdentity {
    /// Executable and bundle base name.
    pub name: String,
    /// Human readable name.
    pub display_name: String,
    /// Reverse-DNS bundle identifier.
    pub bundle_identifier: String,
    /// Release version.
    pub version: String,
    /// Main application script, relative to the project directory.
    pub main_script: Utf8PathBuf,
    /// One-line description used in desktop entries.
    pub description: String,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            name: "GitHubAccountManager".to_owned(),
            display_name: "GitHub Account Manager".to_owned(),
            bundle_identifier: "com.example.githubaccountmanager".to_owned(),
            version: "1.0.0".to_owned(),
            main_script: Utf8PathBuf::from("github_account_manager.py"),
            description: "Manage multiple GitHub accounts and repositories".to_owned(),
        }
    }
}

/// Settings consumed by the install pipeline.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InstallSettings {
    /// Dependency manifest handed to the package installer.
    pub requirements: Utf8PathBuf,
    /// Auxiliary version-control executable checked before installing.
    pub vcs_tool: String,
    /// File name of the Linux desktop entry.
    pub desktop_entry: String,
    /// Arguments passed to the interpreter to run the native bundler.
    pub bundler_args: Vec<String>,
    /// Where the prebuilt application is copied. Relative paths resolve
    /// against the working directory; unset picks the platform default.
    pub install_dir: Option<Utf8PathBuf>,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            requirements: Utf8PathBuf::from("requirements.txt"),
            vcs_tool: "git".to_owned(),
            desktop_entry: "github-account-manager.desktop".to_owned(),
            bundler_args: [
                "-m",
                "PyInstaller",
                "--clean",
                "--noconfirm",
                BUNDLER_SPEC_FILE,
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            install_dir: None,
        }
    }
}

/// Additions to the static module lists of the packaging manifest.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestSettings {
    /// Modules added to the explicit list.
    pub extra_modules: Vec<String>,
    /// Modules added to the exclusion list.
    pub extra_excludes: Vec<String>,
}

impl ProjectConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML or
    /// contains unknown keys. `origin` is only used in the message.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use distkit_common::config::ProjectConfig;
    ///
    /// let config = ProjectConfig::from_toml_str(
    ///     "[app]\nversion = \"2.0.0\"\n",
    ///     Utf8Path::new("distkit.toml"),
    /// )?;
    /// assert_eq!(config.app.version, "2.0.0");
    /// assert_eq!(config.app.name, "GitHubAccountManager");
    /// # Ok::<(), distkit_common::config::ConfigError>(())
    /// ```
    pub fn from_toml_str(contents: &str, origin: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: origin.to_owned(),
            reason: e.message().to_owned(),
        })
    }

    /// Loads configuration from `path`, returning defaults when the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                log::debug!("loading configuration from {path}");
                Self::from_toml_str(&contents, path)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no configuration at {path}; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Loads `distkit.toml` from `dir`.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_from_dir(dir: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load(&dir.join(CONFIG_FILE_NAME))
    }
}
