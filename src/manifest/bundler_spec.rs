//! Bundler spec file rendering.
//!
//! The native bundler does not read the JSON manifest; it executes a spec
//! file written in Python literal syntax. Every list and flag in the spec is
//! taken from the [`PackagingManifest`], so the module set, exclusions,
//! search paths, binary filter and bundle wrapper reach the bundler exactly
//! as the manifest describes them.

use super::PackagingManifest;
use super::bundle::BundleMetadata;
use distkit_common::render_template;

pub use distkit_common::BUNDLER_SPEC_FILE;

const SPEC_TEMPLATE: &str = r"# -*- mode: python ; coding: utf-8 -*-
# Bundler spec for {target_os}, written by distkit-manifest.
# Change distkit.toml and re-run distkit-manifest instead of editing this file.

a = Analysis(
    [{entry_script}],
    pathex={pathex},
    binaries=[],
    datas=[],
    hiddenimports={hiddenimports},
    hookspath=[],
    hooksconfig={},
    runtime_hooks=[],
    excludes={excludes},
    noarchive=False,
)
{binary_filter}
pyz = PYZ(a.pure, a.zipped_data)

exe = EXE(
    pyz,
    a.scripts,
    a.binaries,
    a.zipfiles,
    a.datas,
    [],
    name={name},
    debug=False,
    bootloader_ignore_signals=False,
    strip=False,
    upx={upx},
    upx_exclude=[],
    runtime_tmpdir=None,
    console={console},
    disable_windowed_traceback=False,
    target_arch=None,
    codesign_identity=None,
    entitlements_file=None,
    icon={icon},
    version={version},
)
{bundle}";

const BINARY_FILTER_TEMPLATE: &str = r"
# Binaries the host must provide itself.
a.binaries = [x for x in a.binaries if not x[0].startswith({prefixes})]
";

const BUNDLE_TEMPLATE: &str = r"
app = BUNDLE(
    exe,
    name={name},
    icon={icon},
    bundle_identifier={bundle_identifier},
    info_plist={
        'CFBundleName': {bundle_name},
        'CFBundleDisplayName': {display_name},
        'CFBundleVersion': {bundle_version},
        'CFBundleShortVersionString': {short_version},
        'NSHighResolutionCapable': {high_resolution},
    },
)
";

/// Renders the bundler spec for `manifest`.
///
/// # Examples
///
/// ```
/// use distkit::manifest::ManifestBuilder;
/// use distkit::manifest::bundler_spec::render_bundler_spec;
/// use distkit::manifest::discovery::StaticDiscovery;
/// use distkit_common::{AppIdentity, OsFamily, StubEnvironment};
///
/// let app = AppIdentity::default();
/// let discovery = StaticDiscovery::new();
/// let manifest = ManifestBuilder::new(&app, &discovery)
///     .build(OsFamily::Linux, &StubEnvironment::new("linux"));
///
/// let spec = render_bundler_spec(&manifest);
/// assert!(spec.contains("    ['github_account_manager.py'],\n"));
/// assert!(spec.contains("name='GitHubAccountManager',"));
/// assert!(!spec.contains("BUNDLE("));
/// ```
#[must_use]
pub fn render_bundler_spec(manifest: &PackagingManifest) -> String {
    let binary_filter = if manifest.platform_binary_deny_prefixes.is_empty() {
        String::new()
    } else {
        render_template(
            BINARY_FILTER_TEMPLATE,
            &[(
                "prefixes",
                &py_tuple(&manifest.platform_binary_deny_prefixes),
            )],
        )
    };
    let bundle = manifest
        .bundle
        .as_ref()
        .map(render_bundle)
        .unwrap_or_default();

    render_template(
        SPEC_TEMPLATE,
        &[
            ("target_os", manifest.target_os),
            ("entry_script", &py_str(manifest.entry_script.as_str())),
            ("pathex", &py_list(&manifest.search_paths)),
            ("hiddenimports", &py_list(&manifest.modules)),
            ("excludes", &py_list(&manifest.excluded_modules)),
            ("binary_filter", &binary_filter),
            ("name", &py_str(&manifest.executable_name)),
            ("upx", py_bool(manifest.upx)),
            ("console", py_bool(manifest.console)),
            ("icon", &py_optional(manifest.icon.as_deref())),
            ("version", &py_optional(manifest.version.as_deref())),
            ("bundle", &bundle),
        ],
    )
}

fn render_bundle(bundle: &BundleMetadata) -> String {
    let plist = &bundle.info_plist;
    render_template(
        BUNDLE_TEMPLATE,
        &[
            ("name", &py_str(&bundle.name)),
            ("icon", &py_optional(bundle.icon.as_deref())),
            ("bundle_identifier", &py_str(&bundle.bundle_identifier)),
            ("bundle_name", &py_str(&plist.bundle_name)),
            ("display_name", &py_str(&plist.display_name)),
            ("bundle_version", &py_str(&plist.bundle_version)),
            ("short_version", &py_str(&plist.short_version)),
            ("high_resolution", py_bool(plist.high_resolution_capable)),
        ],
    )
}

/// Quotes `value` as a single-quoted Python string literal.
fn py_str(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str(r"\\"),
            '\'' => quoted.push_str(r"\'"),
            '\n' => quoted.push_str(r"\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

fn py_optional(value: Option<&str>) -> String {
    value.map_or_else(|| String::from("None"), py_str)
}

const fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// One item per line, indented for a keyword argument of a top-level call.
fn py_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<String> = items
        .into_iter()
        .map(|item| format!("        {},\n", py_str(item.as_ref())))
        .collect();
    if lines.is_empty() {
        String::from("[]")
    } else {
        format!("[\n{}    ]", lines.concat())
    }
}

fn py_tuple(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| py_str(item)).collect();
    format!("({},)", quoted.join(", "))
}
