//! Submodule discovery for packages bundled into the manifest.
//!
//! The bundler needs every submodule of a dynamically imported package named
//! up front. [`SitePackagesDiscovery`] walks installed package trees on disk;
//! [`StaticDiscovery`] serves a fixed table for tests and offline runs.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, BTreeSet};
use walkdir::WalkDir;

/// Enumerates the dotted submodule names of a package, the package included.
///
/// An unknown or malformed package yields an empty set rather than an error.
#[cfg_attr(test, mockall::automock)]
pub trait SubmoduleDiscovery {
    /// Returns `package` and all of its submodules.
    fn submodules(&self, package: &str) -> BTreeSet<String>;
}

/// Discovers submodules by walking site-packages directories.
#[derive(Debug, Clone, Default)]
pub struct SitePackagesDiscovery {
    roots: Vec<Utf8PathBuf>,
}

impl SitePackagesDiscovery {
    /// Creates a discovery over the given package roots, searched in order.
    #[must_use]
    pub fn new(roots: Vec<Utf8PathBuf>) -> Self {
        Self { roots }
    }

    fn discover_in(root: &Utf8Path, package: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();

        let single_file = root.join(format!("{package}.py"));
        if single_file.is_file() {
            found.insert(package.to_owned());
        }

        let package_dir = root.join(package);
        if !package_dir.join("__init__.py").is_file() {
            return found;
        }

        let walker = WalkDir::new(&package_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !entry.file_type().is_dir() || entry.path().join("__init__.py").is_file()
            });
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("skipping unreadable entry below {package_dir}: {e}");
                    continue;
                }
            };
            let Some(path) = Utf8Path::from_path(entry.path()) else {
                log::debug!("skipping non UTF-8 path {}", entry.path().display());
                continue;
            };
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            if let Some(name) = module_name(relative, entry.file_type().is_dir()) {
                found.insert(name);
            }
        }
        found
    }
}

/// Maps a path relative to a package root onto a dotted module name.
///
/// The walk only descends into directories carrying an `__init__.py`, so
/// every directory seen here is a package. `__init__.py` names its directory,
/// which is recorded separately.
fn module_name(relative: &Utf8Path, is_dir: bool) -> Option<String> {
    let source = if is_dir {
        relative.to_path_buf()
    } else if relative.extension() == Some("py") && relative.file_name() != Some("__init__.py") {
        relative.with_extension("")
    } else {
        return None;
    };
    let name = source
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(".");
    is_module_path(&name).then_some(name)
}

fn is_module_path(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

impl SubmoduleDiscovery for SitePackagesDiscovery {
    fn submodules(&self, package: &str) -> BTreeSet<String> {
        let found: BTreeSet<String> = self
            .roots
            .iter()
            .flat_map(|root| Self::discover_in(root, package))
            .collect();
        if found.is_empty() {
            log::debug!("no submodules found for {package}");
        } else {
            log::debug!("discovered {} module(s) for {package}", found.len());
        }
        found
    }
}

/// Discovery backed by a fixed package table.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    table: BTreeMap<String, BTreeSet<String>>,
}

impl StaticDiscovery {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the submodules reported for `package`.
    ///
    /// # Examples
    ///
    /// ```
    /// use distkit::manifest::discovery::{StaticDiscovery, SubmoduleDiscovery};
    ///
    /// let discovery = StaticDiscovery::new().with_package("git", ["git", "git.cmd"]);
    /// assert!(discovery.submodules("git").contains("git.cmd"));
    /// assert!(discovery.submodules("requests").is_empty());
    /// ```
    #[must_use]
    pub fn with_package<I, S>(mut self, package: &str, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table
            .entry(package.to_owned())
            .or_default()
            .extend(modules.into_iter().map(Into::into));
        self
    }
}

impl SubmoduleDiscovery for StaticDiscovery {
    fn submodules(&self, package: &str) -> BTreeSet<String> {
        self.table.get(package).cloned().unwrap_or_default()
    }
}
