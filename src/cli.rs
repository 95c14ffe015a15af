//! Command-line definitions for the `distkit` and `distkit-manifest`
//! binaries.
//!
//! The generator takes its target as a free-form string so an unknown value
//! can be answered with a usage summary instead of a clap error.

use crate::target::Target;
use camino::Utf8PathBuf;
use clap::Parser;

/// Generate distribution artifacts for the GitHub Account Manager.
#[derive(Parser, Debug)]
#[command(name = "distkit")]
#[command(version, about)]
#[command(after_help = concat!(
    "TARGETS:\n",
    "  web            web server entry point and landing page under web/\n",
    "  mobile         buildozer.spec for Android and iOS builds\n",
    "  alt-os-notes   ALTERNATIVE_PLATFORMS.md delivery notes\n",
    "  installer      install.sh and requirements files\n",
    "  all            all of the above\n\n",
    "EXAMPLES:\n",
    "  Generate the installer script in the current directory:\n",
    "    $ distkit installer\n\n",
    "  Generate everything into dist/:\n",
    "    $ distkit --output-dir dist all",
))]
pub struct GenerateCli {
    /// Artifact target to generate.
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Directory artifacts are written under.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: Utf8PathBuf,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Write the packaging manifest consumed by the native bundler.
#[derive(Parser, Debug)]
#[command(name = "distkit-manifest")]
#[command(version, about)]
pub struct ManifestCli {
    /// Project configuration file [default: ./distkit.toml].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Site-packages directory searched for submodules; repeatable.
    #[arg(long = "site-packages", value_name = "DIR")]
    pub site_packages: Vec<Utf8PathBuf>,

    /// Manifest destination.
    #[arg(short, long, value_name = "FILE", default_value = "packaging-manifest.json")]
    pub output: Utf8PathBuf,

    /// Operating system to build for [default: detected host].
    #[arg(long, value_name = "NAME")]
    pub os: Option<String>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Usage summary printed when the target is missing or unknown.
///
/// # Examples
///
/// ```
/// let usage = distkit::cli::usage_text();
/// assert!(usage.starts_with("Usage: distkit"));
/// assert!(usage.contains("alt-os-notes"));
/// ```
#[must_use]
pub fn usage_text() -> String {
    let mut text = format!(
        "Usage: distkit [--output-dir DIR] <{}>\n\nTargets:\n",
        Target::NAMES.join("|")
    );
    for name in Target::NAMES {
        if let Ok(target) = name.parse::<Target>() {
            text.push_str(&format!("  {name:<14} {}\n", target.summary()));
        }
    }
    text
}

/// Default `log` filter for the given verbosity.
#[must_use]
pub const fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn target_is_optional() {
        let cli = GenerateCli::try_parse_from(["distkit"]).expect("parse");
        assert!(cli.target.is_none());
        assert_eq!(cli.output_dir, ".");
    }

    #[test]
    fn unknown_target_still_parses() {
        let cli = GenerateCli::try_parse_from(["distkit", "desktop"]).expect("parse");
        assert_eq!(cli.target.as_deref(), Some("desktop"));
    }

    #[test]
    fn output_dir_and_verbose() {
        let cli = GenerateCli::try_parse_from(["distkit", "-v", "--output-dir", "dist", "all"])
            .expect("parse");
        assert!(cli.verbose);
        assert_eq!(cli.output_dir, "dist");
        assert_eq!(cli.target.as_deref(), Some("all"));
    }

    #[test]
    fn manifest_cli_collects_repeated_site_packages() {
        let cli = ManifestCli::try_parse_from([
            "distkit-manifest",
            "--site-packages",
            "/a",
            "--site-packages",
            "/b",
            "--os",
            "darwin",
        ])
        .expect("parse");
        assert_eq!(cli.site_packages, ["/a", "/b"]);
        assert_eq!(cli.os.as_deref(), Some("darwin"));
        assert_eq!(cli.output, "packaging-manifest.json");
        assert!(cli.config.is_none());
    }

    #[test]
    fn usage_lists_every_target() {
        let usage = usage_text();
        for name in Target::NAMES {
            assert!(usage.contains(name), "{name} missing from usage");
        }
    }

    #[rstest]
    #[case(true, "debug")]
    #[case(false, "warn")]
    fn log_filter_follows_verbosity(#[case] verbose: bool, #[case] expected: &str) {
        assert_eq!(default_log_filter(verbose), expected);
    }
}
