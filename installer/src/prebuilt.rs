//! Built application artifacts and their installation.
//!
//! The native bundler leaves its output in `dist/` under the project
//! directory: a single executable on Windows and Linux, plus an `.app`
//! bundle directory on macOS. Installing copies that output into a per-user
//! or system location.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use distkit_common::{AppIdentity, HostEnvironment, OsFamily};
use std::fmt;
use std::fs;
use walkdir::WalkDir;

/// Bundler output directory, relative to the project directory.
pub const DIST_DIR: &str = "dist";

const MIB: u64 = 1024 * 1024;

/// A built application found in the bundler output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArtifact {
    /// Location of the executable or bundle directory.
    pub path: Utf8PathBuf,
    /// Size in bytes; the sum of every file for bundle directories.
    pub size: u64,
}

impl fmt::Display for BuiltArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, format_size(self.size))
    }
}

/// Name of the executable the bundler produces on `os`.
///
/// # Examples
///
/// ```
/// use distkit_common::{AppIdentity, OsFamily};
/// use distkit_installer::prebuilt::executable_name;
///
/// let app = AppIdentity::default();
/// assert_eq!(executable_name(&app, OsFamily::Windows), "GitHubAccountManager.exe");
/// assert_eq!(executable_name(&app, OsFamily::Linux), "GitHubAccountManager");
/// ```
#[must_use]
pub fn executable_name(app: &AppIdentity, os: OsFamily) -> String {
    match os {
        OsFamily::Windows => format!("{}.exe", app.name),
        OsFamily::MacOs | OsFamily::Linux | OsFamily::Unknown => app.name.clone(),
    }
}

/// Name of the artifact that gets installed on `os`: the application
/// bundle on macOS, the executable elsewhere.
#[must_use]
pub fn installable_name(app: &AppIdentity, os: OsFamily) -> String {
    match os {
        OsFamily::MacOs => format!("{}.app", app.name),
        OsFamily::Windows | OsFamily::Linux | OsFamily::Unknown => executable_name(app, os),
    }
}

/// Platform install location used when none is configured.
///
/// Windows installs per user under `%APPDATA%`; macOS into `/Applications`;
/// Linux into `/opt/<name>`. Returns `None` when the platform is not
/// recognised or `APPDATA` is unset.
#[must_use]
pub fn default_install_dir(
    app: &AppIdentity,
    os: OsFamily,
    env: &dyn HostEnvironment,
) -> Option<Utf8PathBuf> {
    match os {
        OsFamily::Windows => env
            .var("APPDATA")
            .filter(|value| !value.trim().is_empty())
            .map(|appdata| Utf8PathBuf::from(appdata).join(&app.name)),
        OsFamily::MacOs => Some(Utf8PathBuf::from("/Applications")),
        OsFamily::Linux => Some(Utf8PathBuf::from("/opt").join(app.name.to_lowercase())),
        OsFamily::Unknown => None,
    }
}

/// Finds `name` in `dist` and measures it.
///
/// # Errors
///
/// Returns [`InstallerError::ArtifactMissing`], listing what `dist` does
/// contain, when `name` is absent.
pub fn locate_artifact(dist: &Utf8Path, name: &str) -> Result<BuiltArtifact> {
    let path = dist.join(name);
    if !path.exists() {
        return Err(InstallerError::ArtifactMissing {
            path,
            dist: dist.to_path_buf(),
            available: list_entries(dist),
        });
    }
    let size = measure(&path)?;
    log::debug!("found {path} ({size} bytes)");
    Ok(BuiltArtifact { path, size })
}

fn list_entries(dir: &Utf8Path) -> String {
    let mut names: Vec<String> = dir
        .read_dir_utf8()
        .map(|entries| {
            entries
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.file_name().to_owned())
                .collect()
        })
        .unwrap_or_default();
    if names.is_empty() {
        return String::from("nothing");
    }
    names.sort();
    names.join(", ")
}

fn measure(path: &Utf8Path) -> Result<u64> {
    if !path.is_dir() {
        return Ok(fs::metadata(path)?.len());
    }
    let mut total = 0;
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            total += entry.metadata().map_err(std::io::Error::from)?.len();
        }
    }
    Ok(total)
}

/// Formats a byte count in mebibytes with one decimal.
///
/// # Examples
///
/// ```
/// use distkit_installer::prebuilt::format_size;
///
/// assert_eq!(format_size(12 * 1024 * 1024 + 314_573), "12.3 MB");
/// assert_eq!(format_size(0), "0.0 MB");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    let tenths = bytes.saturating_mul(10) / MIB;
    format!("{}.{} MB", tenths / 10, tenths % 10)
}

/// Copies `artifact` into `install_dir`, replacing an earlier install.
///
/// Bundle directories are copied recursively. Executables are marked
/// `rwxr-xr-x` on Unix.
///
/// # Errors
///
/// Returns [`InstallerError::ApplicationInstall`] when the directory cannot
/// be created or any file cannot be copied.
pub fn install_artifact(artifact: &Utf8Path, install_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let name = artifact.file_name().unwrap_or(artifact.as_str());
    let dest = install_dir.join(name);
    let fail = |reason: String| InstallerError::ApplicationInstall {
        path: dest.clone(),
        reason,
    };

    fs::create_dir_all(install_dir)
        .map_err(|e| fail(format!("failed to create {install_dir}: {e}")))?;

    if artifact.is_dir() {
        if dest.exists() {
            fs::remove_dir_all(&dest)
                .map_err(|e| fail(format!("failed to remove previous install: {e}")))?;
        }
        copy_tree(artifact, &dest).map_err(fail)?;
    } else {
        fs::copy(artifact, &dest).map_err(|e| fail(format!("failed to copy {artifact}: {e}")))?;
        mark_executable(&dest).map_err(|e| fail(format!("failed to set permissions: {e}")))?;
    }

    log::info!("installed {artifact} to {dest}");
    Ok(dest)
}

fn copy_tree(from: &Utf8Path, to: &Utf8Path) -> std::result::Result<(), String> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| format!("failed to read {from}: {e}"))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| format!("unexpected entry {}: {e}", entry.path().display()))?;
        let dest = to.as_std_path().join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)
                .map_err(|e| format!("failed to create {}: {e}", dest.display()))?;
        } else {
            fs::copy(entry.path(), &dest)
                .map_err(|e| format!("failed to copy {}: {e}", entry.path().display()))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn mark_executable(path: &Utf8Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn mark_executable(_path: &Utf8Path) -> std::io::Result<()> {
    Ok(())
}
