//! Embedded artifact templates keyed by target.
//!
//! Template bodies live under `assets/` and are compiled into the binary, so
//! generation never depends on files next to the executable.

use crate::target::Target;

/// One generated file: destination relative to the output root and its
/// literal content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Artifact {
    /// Destination relative to the output root, `/`-separated.
    pub relative_path: &'static str,
    /// File body, written verbatim.
    pub content: &'static str,
    /// Whether the written file is marked executable.
    pub executable: bool,
}

const WEB_APP: Artifact = Artifact {
    relative_path: "web/app.py",
    content: include_str!("../assets/web/app.py"),
    executable: false,
};

const WEB_INDEX: Artifact = Artifact {
    relative_path: "web/templates/index.html",
    content: include_str!("../assets/web/templates/index.html"),
    executable: false,
};

const BUILDOZER_SPEC: Artifact = Artifact {
    relative_path: "buildozer.spec",
    content: include_str!("../assets/mobile/buildozer.spec"),
    executable: false,
};

const PLATFORM_NOTES: Artifact = Artifact {
    relative_path: "ALTERNATIVE_PLATFORMS.md",
    content: include_str!("../assets/docs/ALTERNATIVE_PLATFORMS.md"),
    executable: false,
};

const INSTALL_SCRIPT: Artifact = Artifact {
    relative_path: "install.sh",
    content: include_str!("../assets/installer/install.sh"),
    executable: true,
};

const REQUIREMENTS: Artifact = Artifact {
    relative_path: "requirements.txt",
    content: include_str!("../assets/installer/requirements.txt"),
    executable: false,
};

const WINDOWS_REQUIREMENTS: Artifact = Artifact {
    relative_path: "requirements-windows.txt",
    content: include_str!("../assets/installer/requirements-windows.txt"),
    executable: false,
};

const DEV_REQUIREMENTS: Artifact = Artifact {
    relative_path: "requirements-dev.txt",
    content: include_str!("../assets/installer/requirements-dev.txt"),
    executable: false,
};

/// Maps each concrete target to its ordered artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRegistry;

impl TemplateRegistry {
    /// Returns the artifacts for `target`, expanding `all` into every member
    /// target in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use distkit::registry::TemplateRegistry;
    /// use distkit::target::Target;
    ///
    /// let paths: Vec<_> = TemplateRegistry
    ///     .artifacts_for(Target::Installer)
    ///     .iter()
    ///     .map(|artifact| artifact.relative_path)
    ///     .collect();
    /// assert_eq!(
    ///     paths,
    ///     ["install.sh", "requirements.txt", "requirements-windows.txt", "requirements-dev.txt"]
    /// );
    /// ```
    #[must_use]
    pub fn artifacts_for(self, target: Target) -> Vec<Artifact> {
        target
            .expand()
            .iter()
            .flat_map(|member| Self::member_artifacts(*member))
            .copied()
            .collect()
    }

    fn member_artifacts(target: Target) -> &'static [Artifact] {
        match target {
            Target::Web => &[WEB_APP, WEB_INDEX],
            Target::Mobile => &[BUILDOZER_SPEC],
            Target::AltOsNotes => &[PLATFORM_NOTES],
            Target::Installer => &[
                INSTALL_SCRIPT,
                REQUIREMENTS,
                WINDOWS_REQUIREMENTS,
                DEV_REQUIREMENTS,
            ],
            Target::All => &[],
        }
    }
}
