//! Python interpreter detection.
//!
//! Candidates are tried in order with `--version`. The first one reporting
//! a supported version wins. Python 2 prints its version on stderr, so both
//! streams are searched.

use crate::deps::CommandExecutor;
use crate::error::{InstallerError, Result};
use distkit_common::OsFamily;
use std::fmt;

/// Oldest supported interpreter release.
pub const MINIMUM_VERSION: PythonVersion = PythonVersion::new(3, 7, 0);

/// A `major.minor.patch` interpreter version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonVersion {
    /// Major release.
    pub major: u32,
    /// Minor release.
    pub minor: u32,
    /// Patch release; zero when not reported.
    pub patch: u32,
}

impl PythonVersion {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extracts the version from `Python X.Y[.Z]` output.
    ///
    /// Pre-release suffixes such as `3.13.0rc1` are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use distkit_installer::interpreter::PythonVersion;
    ///
    /// let version = PythonVersion::parse("Python 3.11.4\n").expect("valid version");
    /// assert_eq!(version, PythonVersion::new(3, 11, 4));
    /// assert!(PythonVersion::parse("command not found").is_none());
    /// ```
    #[must_use]
    pub fn parse(output: &str) -> Option<Self> {
        let rest = output.trim().strip_prefix("Python ")?;
        let token = rest.split_whitespace().next()?;
        let mut parts = token.split('.');
        let major = leading_number(parts.next()?)?;
        let minor = leading_number(parts.next()?)?;
        let patch = parts.next().and_then(leading_number).unwrap_or(0);
        Some(Self::new(major, minor, patch))
    }

    /// Returns whether this version meets [`MINIMUM_VERSION`].
    #[must_use]
    pub fn is_supported(self) -> bool {
        self >= MINIMUM_VERSION
    }
}

fn leading_number(part: &str) -> Option<u32> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A usable interpreter command and the version it reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    /// Command used to start the interpreter.
    pub command: String,
    /// Reported version.
    pub version: PythonVersion,
}

/// Interpreter commands tried on `os`, in preference order.
#[must_use]
pub fn candidates(os: OsFamily) -> &'static [&'static str] {
    match os {
        OsFamily::Windows => &["py", "python3", "python"],
        _ => &["python3", "python"],
    }
}

/// Finds the first candidate reporting a supported version.
///
/// # Errors
///
/// Returns [`InstallerError::InterpreterNotFound`] when no candidate runs,
/// or [`InstallerError::InterpreterTooOld`] naming the newest interpreter
/// found when every candidate is below [`MINIMUM_VERSION`].
pub fn detect(executor: &dyn CommandExecutor, os: OsFamily) -> Result<Interpreter> {
    let tried = candidates(os);
    let mut newest_unsupported: Option<Interpreter> = None;

    for command in tried {
        let Some(version) = query_version(executor, command) else {
            continue;
        };
        let found = Interpreter {
            command: (*command).to_owned(),
            version,
        };
        if version.is_supported() {
            log::info!("using {command} (Python {version})");
            return Ok(found);
        }
        log::debug!("{command} reports unsupported Python {version}");
        if newest_unsupported
            .as_ref()
            .is_none_or(|current| current.version < version)
        {
            newest_unsupported = Some(found);
        }
    }

    Err(match newest_unsupported {
        Some(old) => InstallerError::InterpreterTooOld {
            command: old.command,
            found: old.version.to_string(),
            minimum: minimum_label(),
        },
        None => InstallerError::InterpreterNotFound {
            candidates: tried.join(", "),
            minimum: minimum_label(),
        },
    })
}

fn query_version(executor: &dyn CommandExecutor, command: &str) -> Option<PythonVersion> {
    let output = match executor.run(command, &["--version"]) {
        Ok(output) => output,
        Err(e) => {
            log::debug!("{command} is not available: {e}");
            return None;
        }
    };
    if !output.status.success() {
        log::debug!("{command} --version exited with {}", output.status);
        return None;
    }
    PythonVersion::parse(&String::from_utf8_lossy(&output.stdout))
        .or_else(|| PythonVersion::parse(&String::from_utf8_lossy(&output.stderr)))
}

fn minimum_label() -> String {
    format!("{}.{}", MINIMUM_VERSION.major, MINIMUM_VERSION.minor)
}
