//! Artifact targets selectable from the command line.

use crate::error::DistError;
use std::fmt;
use std::str::FromStr;

/// A named category of output artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Web entry point stub and landing page.
    Web,
    /// Mobile build configuration.
    Mobile,
    /// Notes on alternative delivery channels.
    AltOsNotes,
    /// Platform installer script.
    Installer,
    /// Every other target, in [`Target::MEMBERS`] order.
    All,
}

impl Target {
    /// Concrete targets expanded by [`Target::All`], in generation order.
    pub const MEMBERS: [Self; 4] = [Self::Web, Self::Mobile, Self::AltOsNotes, Self::Installer];

    /// Every accepted command-line value.
    pub const NAMES: [&'static str; 5] = ["web", "mobile", "alt-os-notes", "installer", "all"];

    /// Command-line name of the target.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Mobile => "mobile",
            Self::AltOsNotes => "alt-os-notes",
            Self::Installer => "installer",
            Self::All => "all",
        }
    }

    /// One-line description for usage output.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Web => "web server entry point and landing page under web/",
            Self::Mobile => "buildozer.spec for Android and iOS builds",
            Self::AltOsNotes => "ALTERNATIVE_PLATFORMS.md delivery notes",
            Self::Installer => "install.sh and requirements files",
            Self::All => "all of the above",
        }
    }

    /// Expands the target into the concrete targets it stands for.
    ///
    /// # Examples
    ///
    /// ```
    /// use distkit::target::Target;
    ///
    /// assert_eq!(Target::Web.expand(), &[Target::Web]);
    /// assert_eq!(Target::All.expand().len(), 4);
    /// ```
    #[must_use]
    pub fn expand(self) -> &'static [Self] {
        match self {
            Self::All => &Self::MEMBERS,
            Self::Web => &[Self::Web],
            Self::Mobile => &[Self::Mobile],
            Self::AltOsNotes => &[Self::AltOsNotes],
            Self::Installer => &[Self::Installer],
        }
    }
}

impl FromStr for Target {
    type Err = DistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(Self::Web),
            "mobile" => Ok(Self::Mobile),
            "alt-os-notes" => Ok(Self::AltOsNotes),
            "installer" => Ok(Self::Installer),
            "all" => Ok(Self::All),
            other => Err(DistError::UnknownTarget {
                name: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
