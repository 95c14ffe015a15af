//! Packaging manifest assembly.
//!
//! A [`PackagingManifest`] is the declarative input of the native bundler:
//! which modules to force in, which to keep out, where to look for system
//! libraries and how to wrap the executable. The builder only describes the
//! build; it never runs the bundler.
//!
//! The final module set is `(explicit ∪ discovered) \ excluded`. An
//! exclusion also removes the excluded module's dotted descendants.

pub mod bundle;
pub mod bundler_spec;
pub mod discovery;
pub mod version_info;

use crate::error::{DistError, Result};
use bundle::BundleMetadata;
use bundler_spec::{BUNDLER_SPEC_FILE, render_bundler_spec};
use camino::{Utf8Path, Utf8PathBuf};
use discovery::SubmoduleDiscovery;
use distkit_common::output::write_line;
use distkit_common::{AppIdentity, HostEnvironment, ManifestSettings, OsFamily};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;
use version_info::{VERSION_INFO_FILE, render_version_info};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "packaging-manifest.json";

/// Modules the application imports dynamically and the bundler cannot see.
pub const EXPLICIT_MODULES: &[&str] = &[
    // version control bindings
    "git",
    "git.repo",
    "git.repo.base",
    "git.remote",
    "git.config",
    "git.objects",
    "git.objects.blob",
    "git.objects.tree",
    "git.objects.commit",
    "git.refs",
    "git.refs.head",
    "git.refs.remote",
    "git.refs.tag",
    "git.index",
    "git.index.base",
    "git.index.typ",
    "git.util",
    "git.exc",
    "git.cmd",
    // network
    "requests",
    "requests.exceptions",
    "requests.auth",
    "requests.models",
    "urllib3",
    "urllib3.util",
    "urllib3.util.retry",
    "certifi",
    // GUI
    "tkinter",
    "tkinter.ttk",
    "tkinter.messagebox",
    "tkinter.filedialog",
    "tkinter.scrolledtext",
    "tkinter.simpledialog",
    // standard library
    "json",
    "re",
    "subprocess",
    "platform",
    "pathlib",
    "os",
    "sys",
    "threading",
    "queue",
    "datetime",
    "base64",
    "hashlib",
    "email",
    "email.mime",
    "email.mime.text",
    "http",
    "http.client",
    "ssl",
    "socket",
];

/// Packages whose submodules are discovered and included wholesale.
pub const DISCOVERED_PACKAGES: &[&str] = &["git", "requests"];

/// Heavy packages kept out of the bundle regardless of how they were found.
pub const EXCLUDED_MODULES: &[&str] = &[
    "matplotlib",
    "numpy",
    "scipy",
    "pandas",
    "PIL",
    "cv2",
    "tensorflow",
    "torch",
    "IPython",
    "jupyter",
];

/// Windows API-set forwarders that must never be bundled.
pub const WINDOWS_DENY_PREFIXES: &[&str] = &["api-ms-win-"];

/// Declarative bundler input. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagingManifest {
    /// Operating system family the manifest was built for.
    pub target_os: &'static str,
    /// Script the bundler analyses.
    pub entry_script: Utf8PathBuf,
    /// Base name of the produced executable.
    pub executable_name: String,
    /// Modules named explicitly.
    pub explicit_modules: BTreeSet<String>,
    /// Packages expanded through submodule discovery.
    pub discovered_module_prefixes: Vec<String>,
    /// Modules kept out of the bundle.
    pub excluded_modules: BTreeSet<String>,
    /// Final module set handed to the bundler.
    pub modules: BTreeSet<String>,
    /// Extra directories searched for native libraries.
    pub search_paths: Vec<String>,
    /// Binaries whose name starts with one of these are dropped.
    pub platform_binary_deny_prefixes: Vec<String>,
    /// Whether the executable opens a console window.
    pub console: bool,
    /// Whether the bundler compresses binaries with UPX.
    pub upx: bool,
    /// Version resource file; set on Windows only.
    pub version: Option<String>,
    /// Executable icon; none by default.
    pub icon: Option<String>,
    /// Application bundle wrapper; set on macOS only.
    pub bundle: Option<BundleMetadata>,
}

impl PackagingManifest {
    /// Removes every binary whose name starts with a deny prefix, keeping
    /// the others in their original order.
    ///
    /// # Examples
    ///
    /// ```
    /// use distkit::manifest::{ManifestBuilder, discovery::StaticDiscovery};
    /// use distkit_common::{AppIdentity, OsFamily, StubEnvironment};
    ///
    /// let app = AppIdentity::default();
    /// let discovery = StaticDiscovery::new();
    /// let env = StubEnvironment::new("win32").with_var("SYSTEMROOT", r"C:\Windows");
    /// let manifest = ManifestBuilder::new(&app, &discovery).build(OsFamily::Windows, &env);
    ///
    /// let kept = manifest.filter_binaries(["python3.dll", "api-ms-win-core-path-l1-1-0.dll"]);
    /// assert_eq!(kept, ["python3.dll"]);
    /// ```
    #[must_use]
    pub fn filter_binaries<I, S>(&self, binaries: I) -> Vec<S>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        filter_binaries(binaries, &self.platform_binary_deny_prefixes)
    }

    /// Returns whether `module` ends up in the bundle.
    #[must_use]
    pub fn includes_module(&self, module: &str) -> bool {
        self.modules.contains(module)
    }
}

/// Drops binaries whose name starts with any of `deny_prefixes`.
pub fn filter_binaries<I, S, P>(binaries: I, deny_prefixes: &[P]) -> Vec<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    P: AsRef<str>,
{
    binaries
        .into_iter()
        .filter(|binary| {
            let name = binary.as_ref();
            let denied = deny_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_ref()));
            if denied {
                log::debug!("dropping denied binary {name}");
            }
            !denied
        })
        .collect()
}

fn is_excluded(module: &str, excluded: &BTreeSet<String>) -> bool {
    excluded.iter().any(|ex| {
        module == ex
            || module
                .strip_prefix(ex.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// Assembles a [`PackagingManifest`] for one host OS.
pub struct ManifestBuilder<'a> {
    app: &'a AppIdentity,
    discovery: &'a dyn SubmoduleDiscovery,
    explicit: Vec<String>,
    discover: Vec<String>,
    excluded: Vec<String>,
}

impl<'a> ManifestBuilder<'a> {
    /// Creates a builder seeded with the built-in module lists.
    #[must_use]
    pub fn new(app: &'a AppIdentity, discovery: &'a dyn SubmoduleDiscovery) -> Self {
        let owned = |names: &[&str]| names.iter().map(|n| (*n).to_owned()).collect();
        Self {
            app,
            discovery,
            explicit: owned(EXPLICIT_MODULES),
            discover: owned(DISCOVERED_PACKAGES),
            excluded: owned(EXCLUDED_MODULES),
        }
    }

    /// Appends configured modules and exclusions.
    #[must_use]
    pub fn with_settings(mut self, settings: &ManifestSettings) -> Self {
        self.explicit.extend(settings.extra_modules.iter().cloned());
        self.excluded.extend(settings.extra_excludes.iter().cloned());
        self
    }

    /// Builds the manifest for `os`, consulting `env` for Windows search
    /// paths.
    #[must_use]
    pub fn build(&self, os: OsFamily, env: &dyn HostEnvironment) -> PackagingManifest {
        let explicit_modules: BTreeSet<String> = self.explicit.iter().cloned().collect();
        let excluded_modules: BTreeSet<String> = self.excluded.iter().cloned().collect();

        let discovered: BTreeSet<String> = self
            .discover
            .iter()
            .flat_map(|package| self.discovery.submodules(package))
            .collect();

        let modules: BTreeSet<String> = explicit_modules
            .iter()
            .chain(&discovered)
            .filter(|module| !is_excluded(module, &excluded_modules))
            .cloned()
            .collect();
        log::info!(
            "manifest for {os}: {} module(s), {} discovered, {} exclusion(s)",
            modules.len(),
            discovered.len(),
            excluded_modules.len()
        );

        let (search_paths, deny_prefixes, version) = match os {
            OsFamily::Windows => (
                windows_search_paths(env),
                WINDOWS_DENY_PREFIXES
                    .iter()
                    .map(|p| (*p).to_owned())
                    .collect(),
                Some(VERSION_INFO_FILE.to_owned()),
            ),
            _ => (Vec::new(), Vec::new(), None),
        };

        let bundle = (os == OsFamily::MacOs).then(|| BundleMetadata::for_app(self.app));

        PackagingManifest {
            target_os: os.as_str(),
            entry_script: self.app.main_script.clone(),
            executable_name: self.app.name.clone(),
            explicit_modules,
            discovered_module_prefixes: self.discover.clone(),
            excluded_modules,
            modules,
            search_paths,
            platform_binary_deny_prefixes: deny_prefixes,
            console: false,
            upx: false,
            version,
            icon: None,
            bundle,
        }
    }
}

fn windows_search_paths(env: &dyn HostEnvironment) -> Vec<String> {
    match env.var("SYSTEMROOT").filter(|root| !root.trim().is_empty()) {
        Some(root) => {
            let root = root.trim_end_matches(['\\', '/']);
            vec![format!(r"{root}\System32"), format!(r"{root}\SysWOW64")]
        }
        None => {
            log::warn!("SYSTEMROOT is not set; system library search paths were not added");
            Vec::new()
        }
    }
}

/// Writes `manifest` as pretty JSON to `output`, with the bundler spec and,
/// when the manifest names a version resource, the version resource next to
/// it. Prints one confirmation line per file.
///
/// # Errors
///
/// Returns [`DistError::ManifestWrite`] naming the file that could not be
/// written, or [`DistError::ManifestEncode`] if serialisation fails.
pub fn write_manifest(
    manifest: &PackagingManifest,
    app: &AppIdentity,
    output: &Utf8Path,
    out: &mut dyn Write,
) -> Result<Vec<Utf8PathBuf>> {
    let mut written = Vec::new();
    let dir = output
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf);

    if let Some(version_file) = &manifest.version {
        let path = dir.join(version_file);
        write_file(&path, &render_version_info(app))?;
        write_line(out, format_args!("✓ Created {path}"));
        written.push(path);
    }

    let spec = dir.join(BUNDLER_SPEC_FILE);
    write_file(&spec, &render_bundler_spec(manifest))?;
    write_line(out, format_args!("✓ Created {spec}"));
    written.push(spec);

    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    write_file(output, &json)?;
    write_line(out, format_args!("✓ Created {output}"));
    written.push(output.to_path_buf());

    Ok(written)
}

fn write_file(path: &Utf8Path, content: &str) -> Result<()> {
    let wrap = |source| DistError::ManifestWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    std::fs::write(path, content).map_err(wrap)
}
