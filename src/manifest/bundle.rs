//! macOS application bundle record.

use distkit_common::AppIdentity;
use serde::Serialize;

/// `Info.plist` keys the bundler writes into the `.app` wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoPlist {
    /// Short bundle name.
    #[serde(rename = "CFBundleName")]
    pub bundle_name: String,
    /// Name shown in Finder and the menu bar.
    #[serde(rename = "CFBundleDisplayName")]
    pub display_name: String,
    /// Build version.
    #[serde(rename = "CFBundleVersion")]
    pub bundle_version: String,
    /// Marketing version.
    #[serde(rename = "CFBundleShortVersionString")]
    pub short_version: String,
    /// Retina rendering opt-in; always set.
    #[serde(rename = "NSHighResolutionCapable")]
    pub high_resolution_capable: bool,
}

/// Wraps the executable in a `<name>.app` directory structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleMetadata {
    /// Bundle directory name, e.g. `GitHubAccountManager.app`.
    pub name: String,
    /// Reverse-DNS bundle identifier.
    pub bundle_identifier: String,
    /// Bundle icon; none by default.
    pub icon: Option<String>,
    /// `Info.plist` entries.
    pub info_plist: InfoPlist,
}

impl BundleMetadata {
    /// Derives the bundle record from the application identity.
    ///
    /// # Examples
    ///
    /// ```
    /// use distkit::manifest::bundle::BundleMetadata;
    /// use distkit_common::AppIdentity;
    ///
    /// let bundle = BundleMetadata::for_app(&AppIdentity::default());
    /// assert_eq!(bundle.name, "GitHubAccountManager.app");
    /// assert!(bundle.info_plist.high_resolution_capable);
    /// ```
    #[must_use]
    pub fn for_app(app: &AppIdentity) -> Self {
        Self {
            name: format!("{}.app", app.name),
            bundle_identifier: app.bundle_identifier.clone(),
            icon: None,
            info_plist: InfoPlist {
                bundle_name: app.name.clone(),
                display_name: app.display_name.clone(),
                bundle_version: app.version.clone(),
                short_version: app.version.clone(),
                high_resolution_capable: true,
            },
        }
    }
}
