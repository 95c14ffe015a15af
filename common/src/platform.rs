//! Operating system classification.
//!
//! Downstream consumers treat [`OsFamily::Unknown`] as "skip OS-specific
//! steps", so classification never fails.

use crate::env::HostEnvironment;
use std::fmt;

/// Operating system family of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Linux distributions.
    Linux,
    /// Apple macOS.
    MacOs,
    /// Microsoft Windows, including MSYS and Cygwin shells.
    Windows,
    /// Anything that could not be recognised.
    Unknown,
}

const LINUX_PREFIXES: &[&str] = &["linux"];
const MACOS_PREFIXES: &[&str] = &["darwin", "macos", "mac os x", "osx"];
const WINDOWS_PREFIXES: &[&str] = &["windows", "win32", "win64", "msys", "cygwin", "mingw"];

impl OsFamily {
    /// Classify an OS type string such as `$OSTYPE`, `std::env::consts::OS`
    /// or `platform.system()` style output.
    ///
    /// Matching is case-insensitive and prefix based, so `linux-gnu` and
    /// `darwin23` are recognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use distkit_common::platform::OsFamily;
    ///
    /// assert_eq!(OsFamily::classify("linux-gnu"), OsFamily::Linux);
    /// assert_eq!(OsFamily::classify("Darwin"), OsFamily::MacOs);
    /// assert_eq!(OsFamily::classify("msys"), OsFamily::Windows);
    /// assert_eq!(OsFamily::classify("plan9"), OsFamily::Unknown);
    /// ```
    #[must_use]
    pub fn classify(os_type: &str) -> Self {
        let normalised = os_type.trim().to_ascii_lowercase();
        let matches = |prefixes: &[&str]| prefixes.iter().any(|p| normalised.starts_with(p));

        if normalised.is_empty() {
            Self::Unknown
        } else if matches(LINUX_PREFIXES) {
            Self::Linux
        } else if matches(MACOS_PREFIXES) {
            Self::MacOs
        } else if matches(WINDOWS_PREFIXES) {
            Self::Windows
        } else {
            Self::Unknown
        }
    }

    /// Classify the OS reported by the given host environment.
    #[must_use]
    pub fn detect(env: &dyn HostEnvironment) -> Self {
        let os_type = env.os_type();
        let family = Self::classify(&os_type);
        log::debug!("classified OS type {os_type:?} as {family}");
        family
    }

    /// Short lowercase name of the family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
