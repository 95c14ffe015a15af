//! Host environment queries.
//!
//! Every read of process-wide state (OS type, environment variables, the
//! working directory and the user's desktop folder) goes through
//! [`HostEnvironment`] so callers can be exercised against a simulated
//! platform.

use camino::Utf8PathBuf;
use std::io;

/// Read-only view of the host environment.
pub trait HostEnvironment {
    /// Returns the OS type indicator string.
    fn os_type(&self) -> String;

    /// Returns the value of an environment variable, if set and valid UTF-8.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or is not UTF-8.
    fn current_dir(&self) -> io::Result<Utf8PathBuf>;

    /// Returns the invoking user's desktop directory, if one is known.
    fn desktop_dir(&self) -> Option<Utf8PathBuf>;
}

/// Environment backed by the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl HostEnvironment for SystemEnvironment {
    fn os_type(&self) -> String {
        self.var("OSTYPE")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| std::env::consts::OS.to_owned())
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn current_dir(&self) -> io::Result<Utf8PathBuf> {
        let cwd = std::env::current_dir()?;
        Utf8PathBuf::try_from(cwd).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("current directory is not valid UTF-8: {e}"),
            )
        })
    }

    fn desktop_dir(&self) -> Option<Utf8PathBuf> {
        directories_next::UserDirs::new()
            .and_then(|dirs| dirs.desktop_dir().map(std::path::Path::to_path_buf))
            .and_then(|path| Utf8PathBuf::try_from(path).ok())
    }
}

/// Fixed environment for tests.
///
/// # Examples
///
/// ```ignore
/// use distkit_common::env::{HostEnvironment, StubEnvironment};
///
/// let env = StubEnvironment::new("windows").with_var("SYSTEMROOT", r"C:\Windows");
/// assert_eq!(env.os_type(), "windows");
/// assert_eq!(env.var("SYSTEMROOT").as_deref(), Some(r"C:\Windows"));
/// assert!(env.desktop_dir().is_none());
/// ```
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Default)]
pub struct StubEnvironment {
    os_type: String,
    vars: std::collections::HashMap<String, String>,
    current_dir: Option<Utf8PathBuf>,
    desktop_dir: Option<Utf8PathBuf>,
}

#[cfg(any(test, feature = "test-support"))]
impl StubEnvironment {
    /// Creates a stub reporting the given OS type.
    #[must_use]
    pub fn new(os_type: &str) -> Self {
        Self {
            os_type: os_type.to_owned(),
            ..Self::default()
        }
    }

    /// Adds an environment variable.
    #[must_use]
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn with_current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Sets the desktop directory.
    #[must_use]
    pub fn with_desktop_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.desktop_dir = Some(dir.into());
        self
    }
}

#[cfg(any(test, feature = "test-support"))]
impl HostEnvironment for StubEnvironment {
    fn os_type(&self) -> String {
        self.os_type.clone()
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn current_dir(&self) -> io::Result<Utf8PathBuf> {
        self.current_dir
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no working directory stubbed"))
    }

    fn desktop_dir(&self) -> Option<Utf8PathBuf> {
        self.desktop_dir.clone()
    }
}
